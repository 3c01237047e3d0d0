use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::analytics::CategoryMatch;
use crate::models::{CategoryKind, CreateCategory, TransactionType};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "super::validate_not_blank"))]
    pub name: String,
    pub kind: CategoryKind,
    #[serde(default)]
    #[validate(length(max = 50, message = "At most 50 keywords"))]
    pub keywords: Vec<String>,
    #[validate(custom(function = "super::validate_hex_color"))]
    pub color: Option<String>,
}

impl CreateCategoryRequest {
    pub fn into_input(self, user_id: Uuid) -> CreateCategory {
        CreateCategory {
            user_id,
            name: self.name.trim().to_string(),
            kind: self.kind,
            keywords: self
                .keywords
                .into_iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
            color: self.color,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategorizeRequest {
    #[validate(length(min = 1, max = 500, message = "Description must be 1-500 characters"))]
    #[validate(custom(function = "super::validate_not_blank"))]
    pub description: String,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
}

#[derive(Debug, Serialize)]
pub struct CategorizeResponse {
    /// `null` when no keyword matched.
    pub suggestion: Option<CategoryMatch>,
}
