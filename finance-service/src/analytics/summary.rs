//! Monthly income / expenses / balance / net.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::money::{checked_add, checked_sub, checked_sum, with_cents_scale, AmountError};
use crate::models::{Account, Invoice, Transaction, TransactionType};

/// The four dashboard figures for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
    pub net: Decimal,
}

impl Default for MonthlySummary {
    fn default() -> Self {
        let zero = with_cents_scale(Decimal::ZERO);
        Self {
            income: zero,
            expenses: zero,
            balance: zero,
            net: zero,
        }
    }
}

impl MonthlySummary {
    fn from_totals(
        income: Decimal,
        expenses: Decimal,
        balance: Decimal,
    ) -> Result<Self, AmountError> {
        Ok(Self {
            income: with_cents_scale(income),
            expenses: with_cents_scale(expenses),
            balance: with_cents_scale(balance),
            net: with_cents_scale(checked_sub(income, expenses)?),
        })
    }
}

/// Fold pre-filtered rows into a [`MonthlySummary`].
///
/// The caller is responsible for the filtering: `transactions` must already be
/// limited to the month, `active_accounts` to active accounts, and
/// `paid_invoices` to invoices paid within the month. Transactions whose type
/// is neither income nor expense are ignored. Totals past `Decimal` range
/// yield [`AmountError::Overflow`].
pub fn summarize<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    active_accounts: impl IntoIterator<Item = &'a Account>,
    paid_invoices: impl IntoIterator<Item = &'a Invoice>,
) -> Result<MonthlySummary, AmountError> {
    let (transaction_income, expenses) = transactions.into_iter().try_fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expenses), t| -> Result<_, AmountError> {
            Ok(match t.parsed_type() {
                Some(TransactionType::Income) => (checked_add(income, t.amount)?, expenses),
                Some(TransactionType::Expense) => (income, checked_add(expenses, t.amount)?),
                _ => (income, expenses),
            })
        },
    )?;

    let invoice_income = checked_sum(paid_invoices.into_iter().map(|i| i.amount))?;
    let balance = checked_sum(active_accounts.into_iter().map(|a| a.balance))?;

    MonthlySummary::from_totals(
        checked_add(transaction_income, invoice_income)?,
        expenses,
        balance,
    )
}
