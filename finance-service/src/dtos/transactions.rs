use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::money::deserialize_amount;
use crate::models::{ListTransactionsFilter, TransactionType};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransactionRequest {
    pub account_id: Option<Uuid>,
    /// When absent the category is suggested from the description.
    pub category_id: Option<Uuid>,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionListParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub category_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
}

impl From<TransactionListParams> for ListTransactionsFilter {
    fn from(params: TransactionListParams) -> Self {
        Self {
            from: params.from,
            to: params.to,
            transaction_type: params.transaction_type,
            category_id: params.category_id,
            account_id: params.account_id,
        }
    }
}
