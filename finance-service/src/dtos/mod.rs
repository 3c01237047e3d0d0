pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod invoices;
pub mod preferences;
pub mod prospects;
pub mod transactions;

pub use accounts::{CreateAccountRequest, ListAccountsParams, UpdateAccountRequest};
pub use budgets::{BudgetListParams, UpsertBudgetRequest};
pub use categories::{CategorizeRequest, CategorizeResponse, CreateCategoryRequest};
pub use dashboard::{MonthParams, SummaryResponse};
pub use invoices::{
    CreateInvoiceRequest, InvoiceListParams, InvoiceResponse, PayInvoiceRequest,
};
pub use preferences::PreferencesRequest;
pub use prospects::{CreateProspectRequest, ProspectListParams, UpdateProspectRequest};
pub use transactions::{CreateTransactionRequest, TransactionListParams};

use validator::ValidationError;

/// Rejects values that are empty once trimmed.
pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("Must not be blank".into()))
    } else {
        Ok(())
    }
}

/// ISO-4217 style code: three uppercase ASCII letters.
pub(crate) fn validate_currency(code: &str) -> Result<(), ValidationError> {
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(ValidationError::new("currency")
            .with_message("Currency must be a 3-letter uppercase code".into()))
    }
}

/// `#rrggbb`
pub(crate) fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].bytes().all(|b| b.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("color").with_message("Color must look like #1e293b".into()))
    }
}
