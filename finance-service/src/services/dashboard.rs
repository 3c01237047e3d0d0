//! Loads the rows behind dashboard figures and folds them.

use chrono::NaiveDate;
use service_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;

use super::store::FinanceStore;
use crate::analytics::{summarize, MonthSnapshot, MonthlySummary};
use crate::models::{ListInvoicesFilter, ListTransactionsFilter, Month};

/// Income, expenses, balance and net for `month`.
///
/// The three queries run concurrently; any failure is returned as-is rather
/// than folded into a zero summary.
#[instrument(skip(store), fields(user_id = %user_id, month = %month))]
pub async fn load_monthly_summary(
    store: &dyn FinanceStore,
    user_id: Uuid,
    month: Month,
) -> Result<MonthlySummary, AppError> {
    let transactions_filter = ListTransactionsFilter::for_month(month);
    let invoices_filter = ListInvoicesFilter::paid_in(month);

    let (transactions, accounts, paid_invoices) = tokio::try_join!(
        store.list_transactions(user_id, &transactions_filter),
        store.list_accounts(user_id, true),
        store.list_invoices(user_id, &invoices_filter),
    )?;

    Ok(summarize(&transactions, &accounts, &paid_invoices)?)
}

/// Everything alerts, recommendations, budgets and the category breakdown
/// need for `month`, evaluated as of `as_of`.
#[instrument(skip(store), fields(user_id = %user_id, month = %month))]
pub async fn load_month_snapshot(
    store: &dyn FinanceStore,
    user_id: Uuid,
    month: Month,
    as_of: NaiveDate,
) -> Result<MonthSnapshot, AppError> {
    let transactions_filter = ListTransactionsFilter::for_month(month);
    let paid_filter = ListInvoicesFilter::paid_in(month);
    let all_invoices = ListInvoicesFilter::default();

    let (transactions, accounts, paid_invoices, invoices, categories, budgets, prospects) = tokio::try_join!(
        store.list_transactions(user_id, &transactions_filter),
        store.list_accounts(user_id, true),
        store.list_invoices(user_id, &paid_filter),
        store.list_invoices(user_id, &all_invoices),
        store.list_categories(user_id),
        store.list_budgets(user_id, month),
        store.list_prospects(user_id, None),
    )?;

    Ok(MonthSnapshot {
        month,
        as_of,
        transactions,
        accounts,
        paid_invoices,
        outstanding_invoices: invoices
            .into_iter()
            .filter(|i| i.is_outstanding() && i.issue_date <= as_of)
            .collect(),
        categories,
        budgets,
        prospects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AccountType, CreateAccount, CreateInvoice, CreateTransaction, TransactionType,
    };
    use crate::services::MemoryStore;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn record(store: &MemoryStore, user_id: Uuid, amount: &str, ty: TransactionType, date: NaiveDate) {
        store
            .create_transaction(&CreateTransaction {
                user_id,
                account_id: None,
                category_id: None,
                amount: dec(amount),
                transaction_type: ty,
                transaction_date: date,
                description: String::new(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn summary_only_counts_rows_in_month() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let month: Month = "2026-10".parse().unwrap();

        store
            .create_account(&CreateAccount {
                user_id: user,
                name: "Main".to_string(),
                account_type: AccountType::Checking,
                currency: "USD".to_string(),
                opening_balance: dec("500"),
            })
            .await
            .unwrap();
        record(&store, user, "100.50", TransactionType::Income, day(2026, 10, 1)).await;
        record(&store, user, "30", TransactionType::Expense, day(2026, 10, 31)).await;
        record(&store, user, "999", TransactionType::Income, day(2026, 9, 30)).await;
        record(&store, user, "999", TransactionType::Expense, day(2026, 11, 1)).await;

        let invoice = store
            .create_invoice(&CreateInvoice {
                user_id: user,
                prospect_id: None,
                client_name: "Acme".to_string(),
                invoice_number: Some("INV-1".to_string()),
                amount: dec("200"),
                issue_date: day(2026, 9, 15),
                due_date: None,
                notes: None,
            })
            .await
            .unwrap();
        store
            .mark_invoice_paid(user, invoice.invoice_id, day(2026, 10, 12))
            .await
            .unwrap();

        let summary = load_monthly_summary(&store, user, month).await.unwrap();

        assert_eq!(summary.income, dec("300.50"));
        assert_eq!(summary.expenses, dec("30"));
        assert_eq!(summary.balance, dec("500"));
        assert_eq!(summary.net, dec("270.50"));

        let other_user = load_monthly_summary(&store, Uuid::new_v4(), month).await.unwrap();
        assert_eq!(other_user, MonthlySummary::default());
    }

    #[tokio::test]
    async fn snapshot_splits_paid_and_outstanding_invoices() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let month: Month = "2026-10".parse().unwrap();
        let new_invoice = |amount: &str| CreateInvoice {
            user_id: user,
            prospect_id: None,
            client_name: "Acme".to_string(),
            invoice_number: None,
            amount: dec(amount),
            issue_date: day(2026, 10, 1),
            due_date: Some(day(2026, 10, 10)),
            notes: None,
        };

        let paid = store.create_invoice(&new_invoice("100")).await.unwrap();
        store.create_invoice(&new_invoice("250")).await.unwrap();
        store
            .mark_invoice_paid(user, paid.invoice_id, day(2026, 10, 5))
            .await
            .unwrap();

        let snapshot = load_month_snapshot(&store, user, month, day(2026, 10, 16))
            .await
            .unwrap();

        assert_eq!(snapshot.paid_invoices.len(), 1);
        assert_eq!(snapshot.outstanding_invoices.len(), 1);
        assert_eq!(snapshot.outstanding_total().unwrap(), dec("250"));
        assert_eq!(snapshot.summary().unwrap().income, dec("100"));
    }

    #[tokio::test]
    async fn past_month_snapshot_ignores_invoices_issued_later() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let month: Month = "2026-08".parse().unwrap();
        for (amount, issued) in [("100", day(2026, 8, 3)), ("400", day(2026, 9, 20))] {
            store
                .create_invoice(&CreateInvoice {
                    user_id: user,
                    prospect_id: None,
                    client_name: "Acme".to_string(),
                    invoice_number: None,
                    amount: dec(amount),
                    issue_date: issued,
                    due_date: None,
                    notes: None,
                })
                .await
                .unwrap();
        }

        let snapshot = load_month_snapshot(&store, user, month, month.last_day())
            .await
            .unwrap();

        assert_eq!(snapshot.outstanding_invoices.len(), 1);
        assert_eq!(snapshot.outstanding_total().unwrap(), dec("100"));
    }
}
