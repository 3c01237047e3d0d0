//! Monthly dashboard views. Figures are recomputed on every request.

use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use super::today;
use crate::analytics::{evaluate_alerts, recommend, MonthSnapshot};
use crate::dtos::{MonthParams, SummaryResponse};
use crate::middleware::{QueryParams, UserId};
use crate::models::Month;
use crate::services::metrics::DASHBOARD_COMPUTATIONS;
use crate::services::{load_month_snapshot, load_monthly_summary};
use crate::startup::AppState;

#[tracing::instrument(skip(state, params))]
pub async fn summary(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    QueryParams(params): QueryParams<MonthParams>,
) -> Result<impl IntoResponse, AppError> {
    let month = params.month()?;
    let summary = load_monthly_summary(state.store.as_ref(), user_id, month).await?;

    DASHBOARD_COMPUTATIONS.with_label_values(&["summary"]).inc();

    Ok(Json(SummaryResponse { month, summary }))
}

pub async fn categories(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    QueryParams(params): QueryParams<MonthParams>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = snapshot(&state, user_id, params.month()?).await?;
    DASHBOARD_COMPUTATIONS.with_label_values(&["categories"]).inc();
    Ok(Json(snapshot.expense_breakdown()?))
}

pub async fn alerts(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    QueryParams(params): QueryParams<MonthParams>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = snapshot(&state, user_id, params.month()?).await?;
    DASHBOARD_COMPUTATIONS.with_label_values(&["alerts"]).inc();
    Ok(Json(evaluate_alerts(
        &snapshot,
        &state.config.dashboard.alert_thresholds(),
    )?))
}

pub async fn recommendations(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    QueryParams(params): QueryParams<MonthParams>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = snapshot(&state, user_id, params.month()?).await?;
    DASHBOARD_COMPUTATIONS.with_label_values(&["recommendations"]).inc();
    Ok(Json(recommend(&snapshot)?))
}

/// Past months are judged as of their last day, the current one as of today.
async fn snapshot(
    state: &AppState,
    user_id: uuid::Uuid,
    month: Month,
) -> Result<MonthSnapshot, AppError> {
    let as_of = today().min(month.last_day());
    load_month_snapshot(state.store.as_ref(), user_id, month, as_of).await
}
