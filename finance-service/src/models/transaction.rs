//! Income / expense transactions.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Month;

/// Transaction direction as seen by the monthly summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl TransactionType {
    /// Get string representation for database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: Uuid,
    pub user_id: Uuid,
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub transaction_date: NaiveDate,
    pub description: String,
    pub created_utc: DateTime<Utc>,
}

impl Transaction {
    /// Parsed type; `None` for values written outside this service.
    pub fn parsed_type(&self) -> Option<TransactionType> {
        TransactionType::parse(&self.transaction_type)
    }

    /// Change applied to the linked account's stored balance.
    pub fn balance_effect(&self) -> Decimal {
        balance_effect(self.parsed_type(), self.amount)
    }
}

/// Income credits the account, expense debits it, anything else leaves it.
pub fn balance_effect(transaction_type: Option<TransactionType>, amount: Decimal) -> Decimal {
    match transaction_type {
        Some(TransactionType::Income) => amount,
        Some(TransactionType::Expense) => -amount,
        _ => Decimal::ZERO,
    }
}

/// Input for recording a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransaction {
    pub user_id: Uuid,
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub transaction_date: NaiveDate,
    pub description: String,
}

/// Filter parameters for listing transactions. Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct ListTransactionsFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub transaction_type: Option<TransactionType>,
    pub category_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
}

impl ListTransactionsFilter {
    pub fn for_month(month: Month) -> Self {
        let (from, to) = month.date_range();
        Self {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        }
    }

    pub fn matches(&self, t: &Transaction) -> bool {
        self.from.map_or(true, |from| t.transaction_date >= from)
            && self.to.map_or(true, |to| t.transaction_date <= to)
            && self
                .transaction_type
                .map_or(true, |ty| t.transaction_type == ty.as_str())
            && self.category_id.map_or(true, |c| t.category_id == Some(c))
            && self.account_id.map_or(true, |a| t.account_id == Some(a))
    }
}
