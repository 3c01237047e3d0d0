//! Per-user UI preferences over HTTP.

mod common;

use common::TestApp;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn unsaved_preferences_return_defaults() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();

    let response = app.get(user, "/preferences").await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["sidebar_color"], "#1e293b");
    assert_eq!(body["sidebar_collapsed"], false);
    assert_eq!(body["currency"], "USD");
}

#[tokio::test]
async fn saved_preferences_are_per_user() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();
    let other = Uuid::new_v4();

    let response = app
        .put(
            user,
            "/preferences",
            &json!({ "sidebar_color": "#FF8800", "sidebar_collapsed": true, "currency": "EUR" }),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = app.get(user, "/preferences").await.json().await.unwrap();
    assert_eq!(body["sidebar_color"], "#ff8800");
    assert_eq!(body["sidebar_collapsed"], true);
    assert_eq!(body["currency"], "EUR");

    let body: serde_json::Value = app.get(other, "/preferences").await.json().await.unwrap();
    assert_eq!(body["currency"], "USD");
}

#[tokio::test]
async fn invalid_preferences_are_rejected() {
    let app = TestApp::spawn().await;
    let user = Uuid::new_v4();

    let response = app
        .put(
            user,
            "/preferences",
            &json!({ "sidebar_color": "blue", "sidebar_collapsed": false, "currency": "USD" }),
        )
        .await;
    assert_eq!(response.status(), 422);

    let response = app
        .put(
            user,
            "/preferences",
            &json!({ "sidebar_color": "#000000", "sidebar_collapsed": false, "currency": "usd" }),
        )
        .await;
    assert_eq!(response.status(), 422);
}
