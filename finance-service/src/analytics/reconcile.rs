//! Stored account balances versus the balance implied by transactions.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::money::{checked_add, checked_sub, checked_sum, with_cents_scale, AmountError};
use crate::models::{Account, Transaction};

/// Opening balance plus income minus expenses. Transfers are ignored.
pub fn expected_balance<'a>(
    opening_balance: Decimal,
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Result<Decimal, AmountError> {
    let movement = checked_sum(transactions.into_iter().map(|t| t.balance_effect()))?;
    Ok(with_cents_scale(checked_add(opening_balance, movement)?))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceDrift {
    pub account_id: Uuid,
    pub name: String,
    pub stored: Decimal,
    pub expected: Decimal,
    /// `stored - expected`.
    pub difference: Decimal,
}

/// Accounts whose stored balance disagrees with their transactions.
///
/// `transactions` may span several accounts; rows without an account are
/// skipped.
pub fn find_drift(
    accounts: &[Account],
    transactions: &[Transaction],
) -> Result<Vec<BalanceDrift>, AmountError> {
    let mut by_account: HashMap<Uuid, Vec<&Transaction>> = HashMap::new();
    for t in transactions {
        if let Some(account_id) = t.account_id {
            by_account.entry(account_id).or_default().push(t);
        }
    }

    let mut drifts = Vec::new();
    for account in accounts {
        let rows = by_account
            .get(&account.account_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let expected = expected_balance(account.opening_balance, rows.iter().copied())?;
        if expected != account.balance {
            drifts.push(BalanceDrift {
                account_id: account.account_id,
                name: account.name.clone(),
                stored: account.balance,
                expected,
                difference: with_cents_scale(checked_sub(account.balance, expected)?),
            });
        }
    }
    Ok(drifts)
}
