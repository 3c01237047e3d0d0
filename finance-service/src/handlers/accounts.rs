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
use crate::dtos::{CreateAccountRequest, ListAccountsParams, UpdateAccountRequest};
use crate::middleware::{PathParam, QueryParams, UserId};
use crate::startup::AppState;

#[tracing::instrument(skip(state, payload))]
pub async fn create_account(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = json_body(payload)?;
    request.validate()?;

    let account = state.store.create_account(&request.into_input(user_id)).await?;

    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn list_accounts(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    QueryParams(params): QueryParams<ListAccountsParams>,
) -> Result<impl IntoResponse, AppError> {
    let accounts = state
        .store
        .list_accounts(user_id, params.active.unwrap_or(false))
        .await?;
    Ok(Json(accounts))
}

pub async fn get_account(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    PathParam(account_id): PathParam<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let account = state
        .store
        .get_account(user_id, account_id)
        .await?
        .ok_or_else(|| not_found("Account"))?;
    Ok(Json(account))
}

pub async fn update_account(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    PathParam(account_id): PathParam<Uuid>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = json_body(payload)?;
    request.validate()?;

    let account = state
        .store
        .update_account(user_id, account_id, &request.into())
        .await?
        .ok_or_else(|| not_found("Account"))?;
    Ok(Json(account))
}
