//! Lightweight CRM: people and companies that may become paying clients.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Sales pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProspectStatus {
    Lead,
    Contacted,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

impl ProspectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProspectStatus::Lead => "lead",
            ProspectStatus::Contacted => "contacted",
            ProspectStatus::Proposal => "proposal",
            ProspectStatus::Negotiation => "negotiation",
            ProspectStatus::Won => "won",
            ProspectStatus::Lost => "lost",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "contacted" => ProspectStatus::Contacted,
            "proposal" => ProspectStatus::Proposal,
            "negotiation" => ProspectStatus::Negotiation,
            "won" => ProspectStatus::Won,
            "lost" => ProspectStatus::Lost,
            _ => ProspectStatus::Lead,
        }
    }

    /// Won and lost deals are closed.
    pub fn is_open(&self) -> bool {
        !matches!(self, ProspectStatus::Won | ProspectStatus::Lost)
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Prospect {
    pub prospect_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    pub estimated_value: Option<Decimal>,
    pub next_follow_up: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Prospect {
    pub fn parsed_status(&self) -> ProspectStatus {
        ProspectStatus::from_string(&self.status)
    }
}

#[derive(Debug, Clone)]
pub struct CreateProspect {
    pub user_id: Uuid,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: ProspectStatus,
    pub estimated_value: Option<Decimal>,
    pub next_follow_up: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProspect {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<ProspectStatus>,
    pub estimated_value: Option<Decimal>,
    pub next_follow_up: Option<NaiveDate>,
    pub notes: Option<String>,
}
