//! Application startup and lifecycle management.

use crate::config::{FinanceConfig, StoreBackend};
use crate::handlers;
use crate::services::{init_metrics, Database, FinanceStore, MemoryStore};
use axum::{
    http::{header, HeaderName, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, request_id_of},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: FinanceConfig,
    pub store: Arc<dyn FinanceStore>,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the store selected by `config.store_backend`.
    pub async fn build(config: FinanceConfig) -> Result<Self, AppError> {
        let store: Arc<dyn FinanceStore> = match config.store_backend {
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
            StoreBackend::Postgres => {
                let database = config.database.as_ref().ok_or_else(|| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "Postgres backend selected without database configuration"
                    ))
                })?;

                let db = Database::new(
                    database.url(),
                    database.max_connections,
                    database.min_connections,
                )
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to connect to PostgreSQL");
                    e
                })?;

                db.run_migrations().await.map_err(|e| {
                    tracing::error!(error = %e, "Failed to run migrations");
                    e
                })?;

                Arc::new(db)
            }
        };

        Self::build_with_store(config, store).await
    }

    /// Build the application around an already constructed store.
    pub async fn build_with_store(
        config: FinanceConfig,
        store: Arc<dyn FinanceStore>,
    ) -> Result<Self, AppError> {
        init_metrics();

        let bind_address = config.common.bind_address();
        let listener = TcpListener::bind(&bind_address).await.map_err(|e| {
            tracing::error!(error = %e, addr = %bind_address, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port = port,
            store_backend = ?config.store_backend,
            "Finance service listener bound"
        );

        let router = router(AppState { config, store });

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!(port = self.port, "Starting HTTP server");
        axum::serve(self.listener, self.router).await
    }
}

/// Every route of the service, with the shared middleware stack.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::health::metrics_endpoint))
        .route(
            "/accounts",
            post(handlers::accounts::create_account).get(handlers::accounts::list_accounts),
        )
        .route(
            "/accounts/:id",
            get(handlers::accounts::get_account).patch(handlers::accounts::update_account),
        )
        .route(
            "/categories",
            post(handlers::categories::create_category)
                .get(handlers::categories::list_categories),
        )
        .route(
            "/categories/:id",
            axum::routing::delete(handlers::categories::delete_category),
        )
        .route("/categorize", post(handlers::categories::suggest_category))
        .route(
            "/transactions",
            post(handlers::transactions::create_transaction)
                .get(handlers::transactions::list_transactions),
        )
        .route(
            "/transactions/:id",
            get(handlers::transactions::get_transaction)
                .delete(handlers::transactions::delete_transaction),
        )
        .route(
            "/invoices",
            post(handlers::invoices::create_invoice).get(handlers::invoices::list_invoices),
        )
        .route("/invoices/:id", get(handlers::invoices::get_invoice))
        .route("/invoices/:id/pay", post(handlers::invoices::pay_invoice))
        .route(
            "/budgets",
            axum::routing::put(handlers::budgets::upsert_budget)
                .get(handlers::budgets::list_budgets),
        )
        .route(
            "/budgets/:id",
            axum::routing::delete(handlers::budgets::delete_budget),
        )
        .route(
            "/prospects",
            post(handlers::prospects::create_prospect).get(handlers::prospects::list_prospects),
        )
        .route(
            "/prospects/:id",
            get(handlers::prospects::get_prospect)
                .patch(handlers::prospects::update_prospect)
                .delete(handlers::prospects::delete_prospect),
        )
        .route(
            "/preferences",
            get(handlers::preferences::get_preferences)
                .put(handlers::preferences::save_preferences),
        )
        .route("/dashboard/summary", get(handlers::dashboard::summary))
        .route("/dashboard/categories", get(handlers::dashboard::categories))
        .route("/dashboard/alerts", get(handlers::dashboard::alerts))
        .route(
            "/dashboard/recommendations",
            get(handlers::dashboard::recommendations),
        )
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    request_id = %request_id_of(request),
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    HeaderName::from_static("x-user-id"),
                    HeaderName::from_static("x-request-id"),
                ]),
        )
}
