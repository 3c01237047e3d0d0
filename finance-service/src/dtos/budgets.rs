use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::money::deserialize_amount;
use crate::models::{Month, UpsertBudget};

#[derive(Debug, Deserialize)]
pub struct UpsertBudgetRequest {
    pub category_id: Uuid,
    pub month: Month,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Decimal,
}

impl UpsertBudgetRequest {
    pub fn into_input(self, user_id: Uuid) -> UpsertBudget {
        UpsertBudget {
            user_id,
            category_id: self.category_id,
            month: self.month,
            amount: self.amount,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BudgetListParams {
    pub month: Option<String>,
}
