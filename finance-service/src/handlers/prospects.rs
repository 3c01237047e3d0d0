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
use crate::dtos::{CreateProspectRequest, ProspectListParams, UpdateProspectRequest};
use crate::middleware::{PathParam, QueryParams, UserId};
use crate::startup::AppState;

pub async fn create_prospect(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    payload: Result<Json<CreateProspectRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = json_body(payload)?;
    request.validate()?;

    let prospect = state
        .store
        .create_prospect(&request.into_input(user_id))
        .await?;

    Ok((StatusCode::CREATED, Json(prospect)))
}

pub async fn list_prospects(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    QueryParams(params): QueryParams<ProspectListParams>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.store.list_prospects(user_id, params.status).await?))
}

pub async fn get_prospect(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    PathParam(prospect_id): PathParam<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let prospect = state
        .store
        .get_prospect(user_id, prospect_id)
        .await?
        .ok_or_else(|| not_found("Prospect"))?;
    Ok(Json(prospect))
}

pub async fn update_prospect(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    PathParam(prospect_id): PathParam<Uuid>,
    payload: Result<Json<UpdateProspectRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = json_body(payload)?;
    request.validate()?;

    let prospect = state
        .store
        .update_prospect(user_id, prospect_id, &request.into())
        .await?
        .ok_or_else(|| not_found("Prospect"))?;
    Ok(Json(prospect))
}

pub async fn delete_prospect(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    PathParam(prospect_id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_prospect(user_id, prospect_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Prospect"))
    }
}
