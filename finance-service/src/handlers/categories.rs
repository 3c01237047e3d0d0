use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use super::{json_body, not_found};
use crate::analytics::categorize;
use crate::dtos::{CategorizeRequest, CategorizeResponse, CreateCategoryRequest};
use crate::middleware::{PathParam, UserId};
use crate::startup::AppState;

#[tracing::instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    payload: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = json_body(payload)?;
    request.validate()?;

    let category = state
        .store
        .create_category(&request.into_input(user_id))
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn list_categories(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.store.list_categories(user_id).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    PathParam(category_id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_category(user_id, category_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Category"))
    }
}

/// Suggest a category for a description without recording anything.
pub async fn suggest_category(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    payload: Result<Json<CategorizeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = json_body(payload)?;
    request.validate()?;

    let categories = state.store.list_categories(user_id).await?;
    let suggestion = categorize(&request.description, request.transaction_type, &categories);

    Ok(Json(CategorizeResponse { suggestion }))
}
