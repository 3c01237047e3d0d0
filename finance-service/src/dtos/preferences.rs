use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::Preferences;

#[derive(Debug, Deserialize, Validate)]
pub struct PreferencesRequest {
    #[validate(custom(function = "super::validate_hex_color"))]
    pub sidebar_color: String,
    pub sidebar_collapsed: bool,
    #[validate(custom(function = "super::validate_currency"))]
    pub currency: String,
}

impl PreferencesRequest {
    pub fn into_preferences(self, user_id: Uuid) -> Preferences {
        Preferences {
            user_id,
            sidebar_color: self.sidebar_color.to_ascii_lowercase(),
            sidebar_collapsed: self.sidebar_collapsed,
            currency: self.currency,
            updated_utc: Utc::now(),
        }
    }
}
