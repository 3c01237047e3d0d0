use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::money::deserialize_amount;
use crate::models::{CreateInvoice, Invoice, InvoiceStatus};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    pub prospect_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255, message = "Client name must be 1-255 characters"))]
    #[validate(custom(function = "super::validate_not_blank"))]
    pub client_name: String,
    #[validate(length(max = 64, message = "Invoice number must be at most 64 characters"))]
    pub invoice_number: Option<String>,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Decimal,
    /// Defaults to today.
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl CreateInvoiceRequest {
    pub fn into_input(self, user_id: Uuid, today: NaiveDate) -> CreateInvoice {
        CreateInvoice {
            user_id,
            prospect_id: self.prospect_id,
            client_name: self.client_name.trim().to_string(),
            invoice_number: self.invoice_number,
            amount: self.amount,
            issue_date: self.issue_date.unwrap_or(today),
            due_date: self.due_date,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PayInvoiceRequest {
    /// Defaults to today.
    pub paid_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct InvoiceListParams {
    /// Matched against the effective status, so `overdue` includes pending
    /// invoices past their due date.
    pub status: Option<InvoiceStatus>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub effective_status: InvoiceStatus,
}

impl InvoiceResponse {
    pub fn new(invoice: Invoice, today: NaiveDate) -> Self {
        let effective_status = invoice.effective_status(today);
        Self {
            invoice,
            effective_status,
        }
    }
}
