use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use super::{json_body, not_found};
use crate::analytics::budget_statuses;
use crate::dtos::dashboard::parse_month;
use crate::dtos::{BudgetListParams, UpsertBudgetRequest};
use crate::middleware::{PathParam, QueryParams, UserId};
use crate::models::money::ensure_positive;
use crate::models::ListTransactionsFilter;
use crate::startup::AppState;

/// Create or replace the budget for a category and month.
pub async fn upsert_budget(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    payload: Result<Json<UpsertBudgetRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = json_body(payload)?;
    ensure_positive(request.amount)?;

    let budget = state.store.upsert_budget(&request.into_input(user_id)).await?;
    Ok(Json(budget))
}

/// Budgets for a month with their spending status.
pub async fn list_budgets(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    QueryParams(params): QueryParams<BudgetListParams>,
) -> Result<impl IntoResponse, AppError> {
    let month = parse_month(params.month.as_deref())?;
    let filter = ListTransactionsFilter::for_month(month);

    let (budgets, categories, transactions) = tokio::try_join!(
        state.store.list_budgets(user_id, month),
        state.store.list_categories(user_id),
        state.store.list_transactions(user_id, &filter),
    )?;

    Ok(Json(budget_statuses(
        &budgets,
        &categories,
        &transactions,
        state.config.dashboard.budget_warning_ratio,
    )?))
}

pub async fn delete_budget(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    PathParam(budget_id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_budget(user_id, budget_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Budget"))
    }
}
