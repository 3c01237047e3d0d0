//! Rule-based alerts over a month snapshot.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::budgets::{BudgetState, DEFAULT_WARNING_RATIO};
use super::MonthSnapshot;
use crate::models::money::{checked_sum, with_cents_scale, AmountError};
use crate::models::InvoiceStatus;

/// Default total balance below which a low-balance alert fires.
pub const DEFAULT_LOW_BALANCE: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    BudgetExceeded,
    BudgetNearLimit,
    OverdueInvoices,
    LowBalance,
    NegativeCashFlow,
    FollowUpDue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// Budget or prospect the alert is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertThresholds {
    pub low_balance: Decimal,
    pub budget_warning_ratio: Decimal,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            low_balance: DEFAULT_LOW_BALANCE,
            budget_warning_ratio: DEFAULT_WARNING_RATIO,
        }
    }
}

/// Evaluate every rule and return alerts, most severe first.
pub fn evaluate_alerts(
    snapshot: &MonthSnapshot,
    thresholds: &AlertThresholds,
) -> Result<Vec<Alert>, AmountError> {
    let mut alerts = Vec::new();
    let summary = snapshot.summary()?;

    for status in snapshot.budget_statuses(thresholds.budget_warning_ratio)? {
        let name = status
            .category_name
            .clone()
            .unwrap_or_else(|| "a category".to_string());
        match status.state {
            BudgetState::Exceeded => alerts.push(Alert {
                kind: AlertKind::BudgetExceeded,
                severity: Severity::Critical,
                message: format!(
                    "Spending on {} is {} over its {} budget",
                    name, -status.remaining, status.amount
                ),
                amount: Some(status.spent),
                reference_id: Some(status.budget_id),
            }),
            BudgetState::NearLimit => alerts.push(Alert {
                kind: AlertKind::BudgetNearLimit,
                severity: Severity::Warning,
                message: format!(
                    "{}% of the {} budget for {} is used",
                    status.percent_used, status.amount, name
                ),
                amount: Some(status.spent),
                reference_id: Some(status.budget_id),
            }),
            BudgetState::OnTrack => {}
        }
    }

    let overdue: Vec<_> = snapshot
        .outstanding_invoices
        .iter()
        .filter(|i| i.effective_status(snapshot.as_of) == InvoiceStatus::Overdue)
        .collect();
    if !overdue.is_empty() {
        let total = checked_sum(overdue.iter().map(|i| i.amount))?;
        alerts.push(Alert {
            kind: AlertKind::OverdueInvoices,
            severity: Severity::Warning,
            message: format!(
                "{} overdue invoice{} totalling {}",
                overdue.len(),
                if overdue.len() == 1 { "" } else { "s" },
                with_cents_scale(total)
            ),
            amount: Some(with_cents_scale(total)),
            reference_id: None,
        });
    }

    if !snapshot.accounts.is_empty() && summary.balance < thresholds.low_balance {
        alerts.push(Alert {
            kind: AlertKind::LowBalance,
            severity: Severity::Warning,
            message: format!(
                "Total balance {} is below {}",
                summary.balance, thresholds.low_balance
            ),
            amount: Some(summary.balance),
            reference_id: None,
        });
    }

    if summary.net < Decimal::ZERO {
        alerts.push(Alert {
            kind: AlertKind::NegativeCashFlow,
            severity: Severity::Warning,
            message: format!(
                "Expenses exceed income by {} in {}",
                -summary.net, snapshot.month
            ),
            amount: Some(summary.net),
            reference_id: None,
        });
    }

    for prospect in &snapshot.prospects {
        let due = prospect
            .next_follow_up
            .is_some_and(|day| day <= snapshot.as_of);
        if due && prospect.parsed_status().is_open() {
            alerts.push(Alert {
                kind: AlertKind::FollowUpDue,
                severity: Severity::Info,
                message: format!("Follow up with {}", prospect.name),
                amount: prospect.estimated_value,
                reference_id: Some(prospect.prospect_id),
            });
        }
    }

    // Stable: rule order is kept within a severity.
    alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
    Ok(alerts)
}
