use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::money::deserialize_optional_amount;
use crate::models::{CreateProspect, ProspectStatus, UpdateProspect};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProspectRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[validate(custom(function = "super::validate_not_blank"))]
    pub name: String,
    pub company: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<ProspectStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub estimated_value: Option<Decimal>,
    pub next_follow_up: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl CreateProspectRequest {
    pub fn into_input(self, user_id: Uuid) -> CreateProspect {
        CreateProspect {
            user_id,
            name: self.name.trim().to_string(),
            company: self.company,
            email: self.email,
            phone: self.phone,
            status: self.status.unwrap_or(ProspectStatus::Lead),
            estimated_value: self.estimated_value,
            next_follow_up: self.next_follow_up,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProspectRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[validate(custom(function = "super::validate_not_blank"))]
    pub name: Option<String>,
    pub company: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<ProspectStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub estimated_value: Option<Decimal>,
    pub next_follow_up: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl From<UpdateProspectRequest> for UpdateProspect {
    fn from(req: UpdateProspectRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()),
            company: req.company,
            email: req.email,
            phone: req.phone,
            status: req.status,
            estimated_value: req.estimated_value,
            next_follow_up: req.next_follow_up,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProspectListParams {
    pub status: Option<ProspectStatus>,
}
