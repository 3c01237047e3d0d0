//! Pure, synchronous computations over rows fetched by the store.
//!
//! Nothing in here performs I/O; handlers load a [`MonthSnapshot`] (or the
//! narrower inputs a function needs) and pass plain slices in.

pub mod alerts;
pub mod breakdown;
pub mod budgets;
pub mod categorize;
pub mod recommendations;
pub mod reconcile;
pub mod summary;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::money::{checked_sum, AmountError};
use crate::models::{Account, Budget, Category, Invoice, Month, Prospect, Transaction};

pub use alerts::{evaluate_alerts, Alert, AlertKind, AlertThresholds, Severity};
pub use breakdown::{expense_breakdown, CategoryTotal};
pub use budgets::{budget_statuses, BudgetState, BudgetStatus};
pub use categorize::{categorize, CategoryMatch};
pub use recommendations::{recommend, Recommendation, RecommendationKind};
pub use reconcile::{expected_balance, find_drift, BalanceDrift};
pub use summary::{summarize, MonthlySummary};

/// Everything the dashboard derives its figures from for one month.
#[derive(Debug, Clone)]
pub struct MonthSnapshot {
    pub month: Month,
    /// Reference day for "overdue" and "due" checks.
    pub as_of: NaiveDate,
    /// Transactions dated within `month`.
    pub transactions: Vec<Transaction>,
    /// Active accounts only.
    pub accounts: Vec<Account>,
    /// Invoices paid within `month`.
    pub paid_invoices: Vec<Invoice>,
    /// Pending and overdue invoices issued on or before `as_of`.
    pub outstanding_invoices: Vec<Invoice>,
    pub categories: Vec<Category>,
    /// Budgets set for `month`.
    pub budgets: Vec<Budget>,
    pub prospects: Vec<Prospect>,
}

impl MonthSnapshot {
    pub fn summary(&self) -> Result<MonthlySummary, AmountError> {
        summarize(&self.transactions, &self.accounts, &self.paid_invoices)
    }

    pub fn budget_statuses(
        &self,
        warning_ratio: Decimal,
    ) -> Result<Vec<BudgetStatus>, AmountError> {
        budget_statuses(
            &self.budgets,
            &self.categories,
            &self.transactions,
            warning_ratio,
        )
    }

    pub fn expense_breakdown(&self) -> Result<Vec<CategoryTotal>, AmountError> {
        expense_breakdown(&self.transactions, &self.categories)
    }

    pub fn outstanding_total(&self) -> Result<Decimal, AmountError> {
        checked_sum(self.outstanding_invoices.iter().map(|i| i.amount))
    }
}
