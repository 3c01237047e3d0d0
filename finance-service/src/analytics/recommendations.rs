//! Savings and cash-flow recommendations derived from a month snapshot.

use rust_decimal::Decimal;
use serde::Serialize;

use super::breakdown::CategoryTotal;
use super::MonthSnapshot;
use crate::models::money::{checked_mul, with_cents_scale, AmountError};

/// Savings rate (net / income) below which saving more is suggested, in percent.
pub const TARGET_SAVINGS_PERCENT: Decimal = Decimal::from_parts(20, 0, 0, false, 0);
/// Share of expenses a single category may take before it is flagged, in percent.
pub const TOP_CATEGORY_PERCENT: Decimal = Decimal::from_parts(40, 0, 0, false, 0);
/// Months of expenses an emergency fund should cover.
pub const EMERGENCY_FUND_MONTHS: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    IncreaseSavings,
    ReviewTopCategory,
    CollectReceivables,
    BuildEmergencyFund,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub message: String,
    /// The figure the rule looked at.
    pub current: Decimal,
    /// The figure it is compared against.
    pub target: Decimal,
}

pub fn recommend(snapshot: &MonthSnapshot) -> Result<Vec<Recommendation>, AmountError> {
    let summary = snapshot.summary()?;
    let mut out = Vec::new();

    if summary.income > Decimal::ZERO {
        let rate = checked_mul(summary.net, Decimal::ONE_HUNDRED)?
            .checked_div(summary.income)
            .ok_or(AmountError::Overflow)?
            .round_dp(2);
        if rate < TARGET_SAVINGS_PERCENT {
            out.push(Recommendation {
                kind: RecommendationKind::IncreaseSavings,
                message: format!(
                    "You saved {}% of your income in {}; aim for at least {}%",
                    with_cents_scale(rate),
                    snapshot.month,
                    TARGET_SAVINGS_PERCENT
                ),
                current: with_cents_scale(rate),
                target: TARGET_SAVINGS_PERCENT,
            });
        }
    }

    if let Some(top) = dominant_category(&snapshot.expense_breakdown()?) {
        out.push(Recommendation {
            kind: RecommendationKind::ReviewTopCategory,
            message: format!(
                "{} accounts for {}% of your spending; review it for savings",
                top.category_name, top.share_percent
            ),
            current: top.share_percent,
            target: TOP_CATEGORY_PERCENT,
        });
    }

    let outstanding = snapshot.outstanding_total()?;
    if outstanding > Decimal::ZERO {
        let count = snapshot.outstanding_invoices.len();
        out.push(Recommendation {
            kind: RecommendationKind::CollectReceivables,
            message: format!(
                "Follow up on {} unpaid invoice{} worth {}",
                count,
                if count == 1 { "" } else { "s" },
                with_cents_scale(outstanding)
            ),
            current: with_cents_scale(outstanding),
            target: Decimal::ZERO,
        });
    }

    if summary.expenses > Decimal::ZERO {
        let target = with_cents_scale(checked_mul(summary.expenses, EMERGENCY_FUND_MONTHS)?);
        if summary.balance < target {
            out.push(Recommendation {
                kind: RecommendationKind::BuildEmergencyFund,
                message: format!(
                    "Your balance covers less than {} months of expenses; build it toward {}",
                    EMERGENCY_FUND_MONTHS, target
                ),
                current: summary.balance,
                target,
            });
        }
    }

    Ok(out)
}

/// Largest named category, if it takes more than [`TOP_CATEGORY_PERCENT`].
fn dominant_category(breakdown: &[CategoryTotal]) -> Option<&CategoryTotal> {
    breakdown
        .iter()
        .filter(|row| row.category_id.is_some())
        .find(|row| row.share_percent > TOP_CATEGORY_PERCENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::*;
    use crate::models::{CategoryKind, InvoiceStatus};

    fn kinds(recs: &[Recommendation]) -> Vec<RecommendationKind> {
        recs.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn healthy_month_needs_nothing() {
        let mut snap = snapshot();
        snap.accounts = vec![account("10000")];
        snap.transactions = vec![
            transaction("4000", "income"),
            transaction("1000", "expense"),
            transaction("1000", "expense"),
        ];
        assert!(recommend(&snap).unwrap().is_empty());
    }

    #[test]
    fn empty_month_needs_nothing() {
        assert!(recommend(&snapshot()).unwrap().is_empty());
    }

    #[test]
    fn every_rule_can_fire() {
        let rent = category("Rent", CategoryKind::Expense, &[]);
        let mut snap = snapshot();
        snap.accounts = vec![account("1500")];
        snap.categories = vec![rent.clone()];
        snap.transactions = vec![
            transaction("2000", "income"),
            expense_in(&rent, "1200"),
            transaction("700", "expense"),
        ];
        snap.outstanding_invoices = vec![invoice("250", InvoiceStatus::Pending, None)];

        let recs = recommend(&snap).unwrap();

        assert_eq!(
            kinds(&recs),
            vec![
                RecommendationKind::IncreaseSavings,
                RecommendationKind::ReviewTopCategory,
                RecommendationKind::CollectReceivables,
                RecommendationKind::BuildEmergencyFund,
            ]
        );
        // (2000 - 1900) / 2000
        assert_eq!(recs[0].current.to_string(), "5.00");
        // 1200 / 1900
        assert_eq!(recs[1].current, dec("63.16"));
        assert_eq!(recs[2].current, dec("250"));
        assert_eq!(recs[2].message, "Follow up on 1 unpaid invoice worth 250.00");
        assert_eq!(recs[3].target, dec("5700"));
    }

    #[test]
    fn uncategorized_spending_is_not_a_top_category() {
        let mut snap = snapshot();
        snap.accounts = vec![account("100000")];
        snap.transactions = vec![transaction("5000", "income"), transaction("100", "expense")];
        assert!(recommend(&snap).unwrap().is_empty());
    }

    #[test]
    fn negative_net_is_a_negative_savings_rate() {
        let mut snap = snapshot();
        snap.accounts = vec![account("100000")];
        snap.transactions = vec![transaction("100", "income"), transaction("150", "expense")];
        let recs = recommend(&snap).unwrap();
        assert_eq!(kinds(&recs), vec![RecommendationKind::IncreaseSavings]);
        assert_eq!(recs[0].current, dec("-50"));
    }
}
