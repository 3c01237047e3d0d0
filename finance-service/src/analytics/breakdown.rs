//! Expense totals per category, for the dashboard chart.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::money::{checked_add, checked_mul, checked_sum, with_cents_scale, AmountError};
use crate::models::{Category, Transaction, TransactionType};

pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// `None` for the uncategorized bucket.
    pub category_id: Option<Uuid>,
    pub category_name: String,
    pub total: Decimal,
    /// Share of all expenses, in percent.
    pub share_percent: Decimal,
}

/// Group expense transactions by category, largest first.
///
/// Transactions pointing at a category that is not in `categories` (e.g. a
/// deleted one) are counted as uncategorized.
pub fn expense_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
) -> Result<Vec<CategoryTotal>, AmountError> {
    let names: HashMap<Uuid, &str> = categories
        .iter()
        .map(|c| (c.category_id, c.name.as_str()))
        .collect();

    let mut totals: HashMap<Option<Uuid>, Decimal> = HashMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.parsed_type() == Some(TransactionType::Expense))
    {
        let key = t.category_id.filter(|id| names.contains_key(id));
        let total = totals.entry(key).or_default();
        *total = checked_add(*total, t.amount)?;
    }

    let grand_total = checked_sum(totals.values().copied())?;

    let mut rows = totals
        .into_iter()
        .map(|(category_id, total)| -> Result<CategoryTotal, AmountError> {
            let share = checked_mul(total, Decimal::ONE_HUNDRED)?
                .checked_div(grand_total)
                .unwrap_or(Decimal::ZERO);
            Ok(CategoryTotal {
                category_name: category_id
                    .and_then(|id| names.get(&id))
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| UNCATEGORIZED.to_string()),
                category_id,
                total: with_cents_scale(total),
                share_percent: with_cents_scale(share.round_dp(2)),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    rows.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });
    Ok(rows)
}
