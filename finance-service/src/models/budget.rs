use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Month;

/// Spending limit for one category in one month.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Budget {
    pub budget_id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    /// `YYYY-MM`
    pub month: String,
    pub amount: Decimal,
    pub created_utc: DateTime<Utc>,
}

/// Create or replace the budget for (user, category, month).
#[derive(Debug, Clone)]
pub struct UpsertBudget {
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub month: Month,
    pub amount: Decimal,
}
