use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use super::{json_body, not_found, today};
use crate::dtos::{CreateInvoiceRequest, InvoiceListParams, InvoiceResponse, PayInvoiceRequest};
use crate::middleware::{PathParam, QueryParams, UserId};
use crate::models::money::ensure_positive;
use crate::models::ListInvoicesFilter;
use crate::services::metrics::INVOICES_PAID;
use crate::startup::AppState;

#[tracing::instrument(skip(state, payload))]
pub async fn create_invoice(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    payload: Result<Json<CreateInvoiceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = json_body(payload)?;
    request.validate()?;
    ensure_positive(request.amount)?;

    let today = today();
    let input = request.into_input(user_id, today);
    if let Some(due) = input.due_date {
        if due < input.issue_date {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Due date {} is before issue date {}",
                due,
                input.issue_date
            )));
        }
    }

    let invoice = state.store.create_invoice(&input).await?;

    Ok((StatusCode::CREATED, Json(InvoiceResponse::new(invoice, today))))
}

pub async fn list_invoices(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    QueryParams(params): QueryParams<InvoiceListParams>,
) -> Result<impl IntoResponse, AppError> {
    let today = today();
    let invoices: Vec<InvoiceResponse> = state
        .store
        .list_invoices(user_id, &ListInvoicesFilter::default())
        .await?
        .into_iter()
        .map(|invoice| InvoiceResponse::new(invoice, today))
        .filter(|r| params.status.map_or(true, |s| r.effective_status == s))
        .collect();
    Ok(Json(invoices))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    PathParam(invoice_id): PathParam<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state
        .store
        .get_invoice(user_id, invoice_id)
        .await?
        .ok_or_else(|| not_found("Invoice"))?;
    Ok(Json(InvoiceResponse::new(invoice, today())))
}

/// Mark an invoice paid. The body is optional; `paid_date` defaults to today.
#[tracing::instrument(skip(state, body))]
pub async fn pay_invoice(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    PathParam(invoice_id): PathParam<Uuid>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let request: PayInvoiceRequest = if body.iter().all(u8::is_ascii_whitespace) {
        PayInvoiceRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid request body: {}", e)))?
    };

    let today = today();
    let invoice = state
        .store
        .mark_invoice_paid(user_id, invoice_id, request.paid_date.unwrap_or(today))
        .await?
        .ok_or_else(|| not_found("Invoice"))?;

    INVOICES_PAID.with_label_values(&["ok"]).inc();
    tracing::info!(invoice_id = %invoice.invoice_id, amount = %invoice.amount, "Invoice paid");

    Ok(Json(InvoiceResponse::new(invoice, today)))
}
