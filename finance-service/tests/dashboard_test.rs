//! Monthly dashboard views over HTTP.

mod common;

use common::{d, dec, id, TestApp};
use serde_json::{json, Value};
use uuid::Uuid;

fn kinds(items: &[Value]) -> Vec<&str> {
    items.iter().filter_map(|item| item["kind"].as_str()).collect()
}

#[tokio::test]
async fn summary_matches_worked_example() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();
    app.create_account(user, "Checking", "500").await;

    for (amount, ty, date) in [
        ("100.50", "income", "2025-03-01"),
        ("30", "expense", "2025-03-31"),
        ("1000", "transfer", "2025-03-15"),
        ("999", "income", "2025-02-28"),
        ("999", "expense", "2025-04-01"),
    ] {
        app.record(user, json!({ "amount": amount, "type": ty, "date": date }))
            .await;
    }

    let invoice = app
        .create(
            user,
            "/invoices",
            &json!({ "client_name": "Acme", "amount": "200", "issue_date": "2025-02-15" }),
        )
        .await;
    app.post(
        user,
        &format!("/invoices/{}/pay", id(&invoice, "invoice_id")),
        &json!({ "paid_date": "2025-03-12" }),
    )
    .await;

    let response = app.get(user, "/dashboard/summary?month=2025-03").await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();

    assert_eq!(body["month"], "2025-03");
    assert_eq!(body["income"], "300.50");
    assert_eq!(body["expenses"], "30.00");
    assert_eq!(body["balance"], "500.00");
    assert_eq!(body["net"], "270.50");
}

#[tokio::test]
async fn empty_month_is_all_zeros() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();

    let body: Value = app
        .get(user, "/dashboard/summary?month=2024-01")
        .await
        .json()
        .await
        .unwrap();

    for field in ["income", "expenses", "balance", "net"] {
        assert_eq!(dec(&body[field]), d("0"), "{}", field);
    }
}

#[tokio::test]
async fn invalid_month_is_rejected() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();

    for path in [
        "/dashboard/summary?month=2025-13",
        "/dashboard/alerts?month=03-2025",
        "/dashboard/categories?month=soon",
    ] {
        let response = app.get(user, path).await;
        assert_eq!(response.status(), 400, "{}", path);
    }
}

/// A month with an overspent budget, an overdue invoice, a thin balance and a
/// follow-up that is due.
async fn troubled_month(app: &TestApp, user: Uuid) {
    app.create_account(user, "Checking", "20").await;
    let food = app.create_category(user, "Food", "expense", &["grocer"]).await;
    app.put(
        user,
        "/budgets",
        &json!({ "category_id": food, "month": "2025-03", "amount": "50" }),
    )
    .await;
    app.record(
        user,
        json!({
            "amount": "80",
            "type": "expense",
            "date": "2025-03-10",
            "description": "Corner grocer"
        }),
    )
    .await;
    app.create(
        user,
        "/invoices",
        &json!({
            "client_name": "Acme",
            "amount": "400",
            "issue_date": "2025-03-01",
            "due_date": "2025-03-10"
        }),
    )
    .await;
    app.create(
        user,
        "/prospects",
        &json!({ "name": "Initech", "next_follow_up": "2025-03-15" }),
    )
    .await;
}

#[tokio::test]
async fn alerts_are_ordered_by_severity() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();
    troubled_month(&app, user).await;

    let alerts: Vec<Value> = app
        .get(user, "/dashboard/alerts?month=2025-03")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(
        kinds(&alerts),
        vec![
            "budget_exceeded",
            "overdue_invoices",
            "low_balance",
            "negative_cash_flow",
            "follow_up_due",
        ]
    );
    assert_eq!(alerts[0]["severity"], "critical");
    assert_eq!(dec(&alerts[1]["amount"]), d("400"));
    assert_eq!(alerts[4]["severity"], "info");
}

#[tokio::test]
async fn recommendations_follow_month_figures() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();
    troubled_month(&app, user).await;

    let recommendations: Vec<Value> = app
        .get(user, "/dashboard/recommendations?month=2025-03")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(
        kinds(&recommendations),
        vec![
            "review_top_category",
            "collect_receivables",
            "build_emergency_fund",
        ]
    );
    assert_eq!(dec(&recommendations[2]["target"]), d("240"));
}

#[tokio::test]
async fn category_breakdown_shares_expenses() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();
    let rent = app.create_category(user, "Rent", "expense", &[]).await;
    for (category, amount) in [(Some(rent), "300"), (None, "100")] {
        app.record(
            user,
            json!({ "category_id": category, "amount": amount, "type": "expense", "date": "2025-05-02" }),
        )
        .await;
    }

    let rows: Vec<Value> = app
        .get(user, "/dashboard/categories?month=2025-05")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["category_name"], "Rent");
    assert_eq!(dec(&rows[0]["share_percent"]), d("75"));
    assert!(rows[1]["category_id"].is_null());
    assert_eq!(dec(&rows[1]["total"]), d("100"));
}

#[tokio::test]
async fn dashboards_are_isolated_per_user() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();
    troubled_month(&app, user).await;

    let alerts: Vec<Value> = app
        .get(Uuid::new_v4(), "/dashboard/alerts?month=2025-03")
        .await
        .json()
        .await
        .unwrap();
    assert!(alerts.is_empty());
}

#[tokio::test]
async fn summary_balance_counts_only_active_accounts() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();
    app.create_account(user, "Current", "250").await;
    let closed = app.create_account(user, "Closed", "1000").await;

    let body: Value = app
        .get(user, "/dashboard/summary?month=2025-03")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["balance"], "1250.00");

    let response = app
        .patch(user, &format!("/accounts/{}", closed), &json!({ "is_active": false }))
        .await;
    assert_eq!(response.status(), 200);

    let body: Value = app
        .get(user, "/dashboard/summary?month=2025-03")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["balance"], "250.00");
    assert_eq!(dec(&body["net"]), d("0"));
}
