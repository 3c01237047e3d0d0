use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_SIDEBAR_COLOR: &str = "#1e293b";
pub const DEFAULT_CURRENCY: &str = "USD";

/// Per-user UI preferences, saved explicitly on change.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Preferences {
    pub user_id: Uuid,
    pub sidebar_color: String,
    pub sidebar_collapsed: bool,
    pub currency: String,
    pub updated_utc: DateTime<Utc>,
}

impl Preferences {
    /// Preferences for a user who never saved any.
    pub fn defaults(user_id: Uuid) -> Self {
        Self {
            user_id,
            sidebar_color: DEFAULT_SIDEBAR_COLOR.to_string(),
            sidebar_collapsed: false,
            currency: DEFAULT_CURRENCY.to_string(),
            updated_utc: Utc::now(),
        }
    }
}
