//! Invoice lifecycle over HTTP.

mod common;

use common::{d, dec, id, TestApp};
use finance_service::middleware::user_id::USER_ID_HEADER;
use serde_json::json;
use uuid::Uuid;

async fn create_invoice(app: &TestApp, user: Uuid, amount: &str, due: &str) -> Uuid {
    let body = app
        .create(
            user,
            "/invoices",
            &json!({
                "client_name": "Acme Ltd",
                "invoice_number": "INV-001",
                "amount": amount,
                "issue_date": "2025-01-01",
                "due_date": due
            }),
        )
        .await;
    id(&body, "invoice_id")
}

#[tokio::test]
async fn past_due_invoice_reports_overdue_and_filters() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();
    let late = create_invoice(&app, user, "250", "2025-01-15").await;
    create_invoice(&app, user, "100", "2099-01-01").await;

    let body: serde_json::Value = app
        .get(user, &format!("/invoices/{}", late))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["effective_status"], "overdue");

    let overdue: Vec<serde_json::Value> = app
        .get(user, "/invoices?status=overdue")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(id(&overdue[0], "invoice_id"), late);

    let pending: Vec<serde_json::Value> = app
        .get(user, "/invoices?status=pending")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(dec(&pending[0]["amount"]), d("100"));
}

#[tokio::test]
async fn paying_twice_conflicts() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();
    let invoice = create_invoice(&app, user, "250", "2025-01-15").await;

    let response = app
        .post(
            user,
            &format!("/invoices/{}/pay", invoice),
            &json!({ "paid_date": "2025-02-01" }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "paid");
    assert_eq!(body["effective_status"], "paid");
    assert_eq!(body["paid_date"], "2025-02-01");

    let response = app
        .post(user, &format!("/invoices/{}/pay", invoice), &json!({}))
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn pay_without_body_defaults_to_today() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();
    let invoice = create_invoice(&app, user, "80", "2099-01-01").await;

    let response = app
        .client
        .post(app.url(&format!("/invoices/{}/pay", invoice)))
        .header(USER_ID_HEADER, user.to_string())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "paid");
    assert!(body["paid_date"].is_string());
}

#[tokio::test]
async fn unknown_invoice_is_not_found() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();

    let response = app
        .post(user, &format!("/invoices/{}/pay", Uuid::new_v4()), &json!({}))
        .await;
    assert_eq!(response.status(), 404);

    let response = app.get(user, &format!("/invoices/{}", Uuid::new_v4())).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn due_date_before_issue_date_is_rejected() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();

    let response = app
        .post(
            user,
            "/invoices",
            &json!({
                "client_name": "Acme Ltd",
                "amount": "10",
                "issue_date": "2025-03-10",
                "due_date": "2025-03-01"
            }),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn blank_client_name_is_rejected() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();

    let response = app
        .post(
            user,
            "/invoices",
            &json!({ "client_name": "   ", "amount": "10" }),
        )
        .await;
    assert_eq!(response.status(), 422);

    let listed: Vec<serde_json::Value> =
        app.get(user, "/invoices").await.json().await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn another_user_cannot_pay_invoice() {
    let app = TestApp::spawn().await;
    let owner = Uuid::new_v4();
    let invoice = create_invoice(&app, owner, "50", "2099-01-01").await;

    let response = app
        .post(Uuid::new_v4(), &format!("/invoices/{}/pay", invoice), &json!({}))
        .await;
    assert_eq!(response.status(), 404);

    let body: serde_json::Value = app
        .get(owner, &format!("/invoices/{}", invoice))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "pending");
}
