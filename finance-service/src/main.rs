//! Finance Service entry point.

use finance_service::config::FinanceConfig;
use finance_service::services::init_metrics;
use finance_service::startup::Application;

use service_core::observability::init_tracing;
use tokio::signal;

/// Resolves with the name of the first shutdown signal received.
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}

fn log_config(config: &FinanceConfig) {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        service_name = %config.service_name,
        http_port = %config.common.port,
        store_backend = ?config.store_backend,
        db_max_connections = ?config.database.as_ref().map(|db| db.max_connections),
        otlp_endpoint = ?config.otlp_endpoint,
        low_balance_threshold = %config.dashboard.low_balance_threshold,
        budget_warning_ratio = %config.dashboard.budget_warning_ratio,
        "Starting finance-service"
    );
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = FinanceConfig::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );
    init_metrics();
    log_config(&config);

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to build application");
        std::io::Error::other(format!("Application build error: {}", e))
    })?;

    tokio::select! {
        result = app.run_until_stopped() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server stopped with an error");
                return Err(e);
            }
        }
        signal = shutdown_signal() => {
            tracing::info!(signal, "Shutting down");
        }
    }

    tracing::info!("finance-service stopped");
    Ok(())
}
