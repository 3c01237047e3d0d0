pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod health;
pub mod invoices;
pub mod preferences;
pub mod prospects;
pub mod transactions;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use chrono::{NaiveDate, Utc};
use service_core::error::AppError;

/// Unwrap a JSON body, reporting malformed input as 400 with the usual
/// error envelope.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(anyhow::anyhow!("{}", rejection.body_text())))
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub(crate) fn not_found(what: &str) -> AppError {
    AppError::NotFound(anyhow::anyhow!("{} not found", what))
}
