//! Domain models for finance-service.

mod account;
mod budget;
mod category;
mod invoice;
pub mod money;
mod month;
mod preferences;
mod prospect;
mod transaction;

pub use account::{Account, AccountType, CreateAccount, UpdateAccount};
pub use budget::{Budget, UpsertBudget};
pub use category::{Category, CategoryKind, CreateCategory};
pub use invoice::{CreateInvoice, Invoice, InvoiceStatus, ListInvoicesFilter};
pub use money::AmountError;
pub use month::{Month, MonthParseError};
pub use preferences::{Preferences, DEFAULT_CURRENCY, DEFAULT_SIDEBAR_COLOR};
pub use prospect::{CreateProspect, Prospect, ProspectStatus, UpdateProspect};
pub use transaction::{
    balance_effect, CreateTransaction, ListTransactionsFilter, Transaction, TransactionType,
};
