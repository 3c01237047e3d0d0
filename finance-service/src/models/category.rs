use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::TransactionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Whether transactions of `ty` may be filed under this kind.
    pub fn accepts(&self, ty: TransactionType) -> bool {
        matches!(
            (self, ty),
            (Self::Income, TransactionType::Income)
                | (Self::Expense, TransactionType::Expense)
                | (_, TransactionType::Transfer)
        )
    }
}

/// User-defined category with the keywords used for auto-categorization.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub category_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: String,
    pub keywords: Vec<String>,
    pub color: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl Category {
    pub fn parsed_kind(&self) -> Option<CategoryKind> {
        match self.kind.as_str() {
            "income" => Some(CategoryKind::Income),
            "expense" => Some(CategoryKind::Expense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub user_id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    pub keywords: Vec<String>,
    pub color: Option<String>,
}
