use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use validator::Validate;

use super::json_body;
use crate::dtos::PreferencesRequest;
use crate::middleware::UserId;
use crate::models::Preferences;
use crate::startup::AppState;

/// Saved preferences, or the defaults for a user who never saved any.
pub async fn get_preferences(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<impl IntoResponse, AppError> {
    let preferences = state
        .store
        .get_preferences(user_id)
        .await?
        .unwrap_or_else(|| Preferences::defaults(user_id));
    Ok(Json(preferences))
}

pub async fn save_preferences(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    payload: Result<Json<PreferencesRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = json_body(payload)?;
    request.validate()?;

    let saved = state
        .store
        .save_preferences(&request.into_preferences(user_id))
        .await?;
    Ok(Json(saved))
}
