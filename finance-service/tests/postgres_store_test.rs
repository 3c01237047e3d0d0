//! PostgreSQL store tests. Run only when `TEST_DATABASE_URL` is set.

use chrono::NaiveDate;
use finance_service::models::{
    AccountType, CategoryKind, CreateAccount, CreateCategory, CreateInvoice, CreateTransaction,
    ListTransactionsFilter, Month, TransactionType,
};
use finance_service::services::{load_monthly_summary, Database, FinanceStore};
use rust_decimal::Decimal;
use serial_test::serial;
use service_core::error::AppError;
use std::str::FromStr;
use uuid::Uuid;

async fn test_db() -> Option<Database> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let db = Database::new(&url, 5, 1)
        .await
        .expect("Failed to connect to test database");
    db.run_migrations().await.expect("Failed to run migrations");
    Some(db)
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
#[serial]
async fn transactions_adjust_balance_atomically() {
    let Some(db) = test_db().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let user = Uuid::new_v4();

    let account = db
        .create_account(&CreateAccount {
            user_id: user,
            name: "Checking".to_string(),
            account_type: AccountType::Checking,
            currency: "USD".to_string(),
            opening_balance: dec("500"),
        })
        .await
        .unwrap();

    let expense = db
        .create_transaction(&CreateTransaction {
            user_id: user,
            account_id: Some(account.account_id),
            category_id: None,
            amount: dec("30"),
            transaction_type: TransactionType::Expense,
            transaction_date: day(2025, 3, 31),
            description: "Groceries".to_string(),
        })
        .await
        .unwrap();

    let stored = db.get_account(user, account.account_id).await.unwrap().unwrap();
    assert_eq!(stored.balance, dec("470"));

    assert!(db.delete_transaction(user, expense.transaction_id).await.unwrap());
    let stored = db.get_account(user, account.account_id).await.unwrap().unwrap();
    assert_eq!(stored.balance, dec("500"));

    let err = db
        .create_transaction(&CreateTransaction {
            user_id: Uuid::new_v4(),
            account_id: Some(account.account_id),
            category_id: None,
            amount: dec("5"),
            transaction_type: TransactionType::Expense,
            transaction_date: day(2025, 3, 1),
            description: String::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
#[serial]
async fn balance_range_check_is_a_bad_request() {
    let Some(db) = test_db().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let user = Uuid::new_v4();
    let account = db
        .create_account(&CreateAccount {
            user_id: user,
            name: "Vault".to_string(),
            account_type: AccountType::Savings,
            currency: "USD".to_string(),
            opening_balance: dec("999999999999999"),
        })
        .await
        .unwrap();

    let err = db
        .create_transaction(&CreateTransaction {
            user_id: user,
            account_id: Some(account.account_id),
            category_id: None,
            amount: dec("1"),
            transaction_type: TransactionType::Income,
            transaction_date: day(2025, 3, 1),
            description: String::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let stored = db.get_account(user, account.account_id).await.unwrap().unwrap();
    assert_eq!(stored.balance, dec("999999999999999"));
}

#[tokio::test]
#[serial]
async fn summary_and_invoice_payment_round_trip() {
    let Some(db) = test_db().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let user = Uuid::new_v4();
    let month: Month = "2025-03".parse().unwrap();

    db.create_account(&CreateAccount {
        user_id: user,
        name: "Main".to_string(),
        account_type: AccountType::Checking,
        currency: "USD".to_string(),
        opening_balance: dec("500"),
    })
    .await
    .unwrap();
    for (amount, ty, date) in [
        ("100.50", TransactionType::Income, day(2025, 3, 1)),
        ("30", TransactionType::Expense, day(2025, 3, 31)),
        ("999", TransactionType::Income, day(2025, 4, 1)),
    ] {
        db.create_transaction(&CreateTransaction {
            user_id: user,
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

    let invoice = db
        .create_invoice(&CreateInvoice {
            user_id: user,
            prospect_id: None,
            client_name: "Acme".to_string(),
            invoice_number: None,
            amount: dec("200"),
            issue_date: day(2025, 2, 15),
            due_date: None,
            notes: None,
        })
        .await
        .unwrap();
    let paid = db
        .mark_invoice_paid(user, invoice.invoice_id, day(2025, 3, 12))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(paid.paid_date, Some(day(2025, 3, 12)));

    let again = db
        .mark_invoice_paid(user, invoice.invoice_id, day(2025, 3, 13))
        .await
        .unwrap_err();
    assert!(matches!(again, AppError::Conflict(_)));

    let summary = load_monthly_summary(&db, user, month).await.unwrap();
    assert_eq!(summary.income, dec("300.50"));
    assert_eq!(summary.expenses, dec("30"));
    assert_eq!(summary.balance, dec("500"));
    assert_eq!(summary.net, dec("270.50"));

    let march = db
        .list_transactions(user, &ListTransactionsFilter::for_month(month))
        .await
        .unwrap();
    assert_eq!(march.len(), 2);
}

#[tokio::test]
#[serial]
async fn duplicate_category_names_conflict() {
    let Some(db) = test_db().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };
    let user = Uuid::new_v4();
    let input = CreateCategory {
        user_id: user,
        name: "Rent".to_string(),
        kind: CategoryKind::Expense,
        keywords: vec!["landlord".to_string()],
        color: None,
    };

    let created = db.create_category(&input).await.unwrap();
    assert_eq!(created.keywords, vec!["landlord".to_string()]);

    let err = db.create_category(&input).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}
