//! Budget progress for a month.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::money::{checked_add, checked_mul, checked_sub, with_cents_scale, AmountError};
use crate::models::{Budget, Category, Transaction, TransactionType};

/// Default share of a budget at which it is reported as near its limit.
pub const DEFAULT_WARNING_RATIO: Decimal = Decimal::from_parts(80, 0, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetState {
    OnTrack,
    NearLimit,
    Exceeded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub category_name: Option<String>,
    pub month: String,
    pub amount: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percent_used: Decimal,
    pub state: BudgetState,
}

/// Compare each budget against expense transactions filed under its category.
///
/// `transactions` must already be limited to the budgets' month.
pub fn budget_statuses(
    budgets: &[Budget],
    categories: &[Category],
    transactions: &[Transaction],
    warning_ratio: Decimal,
) -> Result<Vec<BudgetStatus>, AmountError> {
    let mut spent_by_category: HashMap<Uuid, Decimal> = HashMap::new();
    for t in transactions {
        if t.parsed_type() != Some(TransactionType::Expense) {
            continue;
        }
        if let Some(category_id) = t.category_id {
            let spent = spent_by_category.entry(category_id).or_default();
            *spent = checked_add(*spent, t.amount)?;
        }
    }

    let names: HashMap<Uuid, &str> = categories
        .iter()
        .map(|c| (c.category_id, c.name.as_str()))
        .collect();

    budgets
        .iter()
        .map(|b| -> Result<BudgetStatus, AmountError> {
            let spent = spent_by_category
                .get(&b.category_id)
                .copied()
                .unwrap_or(Decimal::ZERO);
            Ok(BudgetStatus {
                budget_id: b.budget_id,
                category_id: b.category_id,
                category_name: names.get(&b.category_id).map(|n| n.to_string()),
                month: b.month.clone(),
                amount: b.amount,
                spent: with_cents_scale(spent),
                remaining: with_cents_scale(checked_sub(b.amount, spent)?),
                percent_used: percent_used(spent, b.amount)?,
                state: state_for(spent, b.amount, warning_ratio)?,
            })
        })
        .collect()
}

fn percent_used(spent: Decimal, limit: Decimal) -> Result<Decimal, AmountError> {
    let percent = checked_mul(spent, Decimal::ONE_HUNDRED)?
        .checked_div(limit)
        .unwrap_or(Decimal::ZERO);
    Ok(with_cents_scale(percent.round_dp(2)))
}

fn state_for(
    spent: Decimal,
    limit: Decimal,
    warning_ratio: Decimal,
) -> Result<BudgetState, AmountError> {
    let state = if spent > limit {
        BudgetState::Exceeded
    } else if spent >= checked_mul(limit, warning_ratio)? && spent > Decimal::ZERO {
        BudgetState::NearLimit
    } else {
        BudgetState::OnTrack
    };
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{budget, category, dec, expense_in, transaction};
    use crate::models::CategoryKind;

    #[test]
    fn classifies_by_spend_share() {
        let food = category("Food", CategoryKind::Expense, &[]);
        let fun = category("Fun", CategoryKind::Expense, &[]);
        let rent = category("Rent", CategoryKind::Expense, &[]);
        let budgets = vec![budget(&food, "200"), budget(&fun, "100"), budget(&rent, "1000")];
        let transactions = vec![
            expense_in(&food, "120"),
            expense_in(&food, "45.50"),
            expense_in(&fun, "100.01"),
            expense_in(&rent, "10"),
        ];

        let statuses = budget_statuses(
            &budgets,
            &[food, fun, rent],
            &transactions,
            DEFAULT_WARNING_RATIO,
        )
        .unwrap();

        assert_eq!(statuses[0].spent, dec("165.50"));
        assert_eq!(statuses[0].remaining, dec("34.50"));
        assert_eq!(statuses[0].percent_used.to_string(), "82.75");
        assert_eq!(statuses[0].state, BudgetState::NearLimit);
        assert_eq!(statuses[0].category_name.as_deref(), Some("Food"));

        assert_eq!(statuses[1].state, BudgetState::Exceeded);
        assert_eq!(statuses[1].remaining, dec("-0.01"));

        assert_eq!(statuses[2].state, BudgetState::OnTrack);
        assert_eq!(statuses[2].percent_used, dec("1"));
    }

    #[test]
    fn spending_exactly_the_limit_is_not_exceeded() {
        let food = category("Food", CategoryKind::Expense, &[]);
        let statuses = budget_statuses(
            &[budget(&food, "50")],
            &[],
            &[expense_in(&food, "50")],
            DEFAULT_WARNING_RATIO,
        )
        .unwrap();
        assert_eq!(statuses[0].state, BudgetState::NearLimit);
        assert_eq!(statuses[0].percent_used, dec("100"));
        assert!(statuses[0].category_name.is_none());
    }

    #[test]
    fn income_and_uncategorized_rows_do_not_count() {
        let food = category("Food", CategoryKind::Expense, &[]);
        let mut refund = expense_in(&food, "80");
        refund.transaction_type = "income".to_string();
        let transactions = vec![refund, transaction("500", "expense")];

        let statuses =
            budget_statuses(&[budget(&food, "100")], &[], &transactions, DEFAULT_WARNING_RATIO)
                .unwrap();
        assert_eq!(statuses[0].spent, Decimal::ZERO);
        assert_eq!(statuses[0].state, BudgetState::OnTrack);
    }

    #[test]
    fn overflowing_spend_is_an_error() {
        let food = category("Food", CategoryKind::Expense, &[]);
        let mut big = expense_in(&food, "1");
        big.amount = Decimal::MAX;
        let result = budget_statuses(
            &[budget(&food, "100")],
            &[],
            &[big.clone(), big],
            DEFAULT_WARNING_RATIO,
        );
        assert_eq!(result, Err(AmountError::Overflow));
    }

    #[test]
    fn default_warning_ratio_is_eighty_percent() {
        assert_eq!(DEFAULT_WARNING_RATIO, dec("0.80"));
    }
}
