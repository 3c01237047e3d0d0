//! Test helpers for finance-service integration tests.
//!
//! Each `TestApp` runs the full router on an ephemeral port with the
//! in-memory store, so no external services are needed.

#![allow(dead_code)]

use finance_service::config::FinanceConfig;
use finance_service::middleware::user_id::USER_ID_HEADER;
use finance_service::startup::Application;
use reqwest::{Client, Response};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(FinanceConfig::in_memory()).await
    }

    pub async fn spawn_with(config: FinanceConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let port = app.port();
        tokio::spawn(app.run_until_stopped());

        Self {
            address: format!("http://127.0.0.1:{}", port),
            port,
            client: Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, user: Uuid, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .header(USER_ID_HEADER, user.to_string())
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post(&self, user: Uuid, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .header(USER_ID_HEADER, user.to_string())
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put(&self, user: Uuid, path: &str, body: &Value) -> Response {
        self.client
            .put(self.url(path))
            .header(USER_ID_HEADER, user.to_string())
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn patch(&self, user: Uuid, path: &str, body: &Value) -> Response {
        self.client
            .patch(self.url(path))
            .header(USER_ID_HEADER, user.to_string())
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, user: Uuid, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .header(USER_ID_HEADER, user.to_string())
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// POST and return the JSON body, asserting 201.
    pub async fn create(&self, user: Uuid, path: &str, body: &Value) -> Value {
        let response = self.post(user, path, body).await;
        assert_eq!(response.status(), 201, "creating {}", path);
        response.json().await.expect("Failed to parse response")
    }

    pub async fn create_account(&self, user: Uuid, name: &str, opening_balance: &str) -> Uuid {
        let body = self
            .create(
                user,
                "/accounts",
                &serde_json::json!({
                    "name": name,
                    "account_type": "checking",
                    "opening_balance": opening_balance,
                }),
            )
            .await;
        id(&body, "account_id")
    }

    pub async fn create_category(
        &self,
        user: Uuid,
        name: &str,
        kind: &str,
        keywords: &[&str],
    ) -> Uuid {
        let body = self
            .create(
                user,
                "/categories",
                &serde_json::json!({ "name": name, "kind": kind, "keywords": keywords }),
            )
            .await;
        id(&body, "category_id")
    }

    pub async fn record(&self, user: Uuid, body: Value) -> Value {
        self.create(user, "/transactions", &body).await
    }
}

pub fn id(body: &Value, field: &str) -> Uuid {
    body[field]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(|| panic!("missing {} in {}", field, body))
}

/// Decimal from a JSON string field.
pub fn dec(value: &Value) -> Decimal {
    let raw = value
        .as_str()
        .unwrap_or_else(|| panic!("expected a decimal string, got {}", value));
    Decimal::from_str(raw).expect("invalid decimal")
}

pub fn d(s: &str) -> Decimal {
    Decimal::from_str(s).expect("invalid decimal")
}
