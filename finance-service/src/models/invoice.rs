//! Invoices issued to clients.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Month;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "paid" => InvoiceStatus::Paid,
            "overdue" => InvoiceStatus::Overdue,
            _ => InvoiceStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub invoice_id: Uuid,
    pub user_id: Uuid,
    pub prospect_id: Option<Uuid>,
    pub client_name: String,
    pub invoice_number: Option<String>,
    pub amount: Decimal,
    pub status: String,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl Invoice {
    pub fn parsed_status(&self) -> InvoiceStatus {
        InvoiceStatus::from_string(&self.status)
    }

    /// Paid invoices only count once a payment date is recorded.
    pub fn is_paid(&self) -> bool {
        self.parsed_status() == InvoiceStatus::Paid && self.paid_date.is_some()
    }

    /// Status as of `today`: a pending invoice past its due date is overdue.
    pub fn effective_status(&self, today: NaiveDate) -> InvoiceStatus {
        match self.parsed_status() {
            InvoiceStatus::Pending if self.due_date.is_some_and(|due| due < today) => {
                InvoiceStatus::Overdue
            }
            status => status,
        }
    }

    /// Still waiting for money (pending or overdue).
    pub fn is_outstanding(&self) -> bool {
        self.parsed_status() != InvoiceStatus::Paid
    }
}

/// Filter parameters for listing invoices. Paid-date bounds are inclusive
/// and exclude invoices without a payment date.
#[derive(Debug, Clone, Default)]
pub struct ListInvoicesFilter {
    pub status: Option<InvoiceStatus>,
    pub paid_from: Option<NaiveDate>,
    pub paid_to: Option<NaiveDate>,
}

impl ListInvoicesFilter {
    /// Invoices paid within `month`.
    pub fn paid_in(month: Month) -> Self {
        let (from, to) = month.date_range();
        Self {
            status: Some(InvoiceStatus::Paid),
            paid_from: Some(from),
            paid_to: Some(to),
        }
    }

    pub fn matches(&self, invoice: &Invoice) -> bool {
        let paid_bounds = self.paid_from.is_some() || self.paid_to.is_some();
        self.status.map_or(true, |s| invoice.status == s.as_str())
            && (!paid_bounds
                || invoice.paid_date.is_some_and(|paid| {
                    self.paid_from.map_or(true, |from| paid >= from)
                        && self.paid_to.map_or(true, |to| paid <= to)
                }))
    }
}

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoice {
    pub user_id: Uuid,
    pub prospect_id: Option<Uuid>,
    pub client_name: String,
    pub invoice_number: Option<String>,
    pub amount: Decimal,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}
