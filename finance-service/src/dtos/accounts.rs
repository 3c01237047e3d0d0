use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::money::deserialize_optional_amount;
use crate::models::{AccountType, CreateAccount, UpdateAccount, DEFAULT_CURRENCY};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "super::validate_not_blank"))]
    pub name: String,
    pub account_type: AccountType,
    #[validate(custom(function = "super::validate_currency"))]
    pub currency: Option<String>,
    /// May be negative, e.g. for a credit card carrying debt.
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub opening_balance: Option<Decimal>,
}

impl CreateAccountRequest {
    pub fn into_input(self, user_id: Uuid) -> CreateAccount {
        CreateAccount {
            user_id,
            name: self.name.trim().to_string(),
            account_type: self.account_type,
            currency: self.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            opening_balance: self.opening_balance.unwrap_or(Decimal::ZERO),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "super::validate_not_blank"))]
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateAccountRequest> for UpdateAccount {
    fn from(req: UpdateAccountRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()),
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListAccountsParams {
    pub active: Option<bool>,
}
