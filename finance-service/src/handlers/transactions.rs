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
use crate::dtos::{CreateTransactionRequest, TransactionListParams};
use crate::middleware::{PathParam, QueryParams, UserId};
use crate::models::money::ensure_positive;
use crate::models::CreateTransaction;
use crate::services::metrics::TRANSACTIONS_CREATED;
use crate::startup::AppState;

#[tracing::instrument(skip(state, payload))]
pub async fn create_transaction(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = json_body(payload)?;
    request.validate()?;
    let amount = ensure_positive(request.amount)?;

    let category_id = match request.category_id {
        Some(id) => Some(id),
        None if !request.description.trim().is_empty() => {
            let categories = state.store.list_categories(user_id).await?;
            let suggestion = categorize(
                &request.description,
                Some(request.transaction_type),
                &categories,
            );
            if let Some(m) = &suggestion {
                tracing::debug!(category = %m.category_name, keyword = %m.keyword, "Auto-categorized");
            }
            suggestion.map(|m| m.category_id)
        }
        None => None,
    };

    let input = CreateTransaction {
        user_id,
        account_id: request.account_id,
        category_id,
        amount,
        transaction_type: request.transaction_type,
        transaction_date: request.date,
        description: request.description.trim().to_string(),
    };
    let transaction = state.store.create_transaction(&input).await?;

    TRANSACTIONS_CREATED
        .with_label_values(&[input.transaction_type.as_str()])
        .inc();

    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    QueryParams(params): QueryParams<TransactionListParams>,
) -> Result<impl IntoResponse, AppError> {
    if let (Some(from), Some(to)) = (params.from, params.to) {
        if from > to {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "'from' ({}) is after 'to' ({})",
                from,
                to
            )));
        }
    }
    let transactions = state
        .store
        .list_transactions(user_id, &params.into())
        .await?;
    Ok(Json(transactions))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    PathParam(transaction_id): PathParam<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let transaction = state
        .store
        .get_transaction(user_id, transaction_id)
        .await?
        .ok_or_else(|| not_found("Transaction"))?;
    Ok(Json(transaction))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    PathParam(transaction_id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_transaction(user_id, transaction_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Transaction"))
    }
}
