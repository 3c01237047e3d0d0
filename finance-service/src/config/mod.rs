//! Configuration module for finance-service.

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

use crate::analytics::budgets::DEFAULT_WARNING_RATIO;
use crate::analytics::alerts::DEFAULT_LOW_BALANCE;
use crate::analytics::AlertThresholds;

/// Where rows are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local; contents are lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "Unknown STORE_BACKEND '{}', expected 'postgres' or 'memory'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FinanceConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub store_backend: StoreBackend,
    pub database: Option<DatabaseConfig>,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            url: Secret::new(env::var("DATABASE_URL").map_err(|_| {
                AppError::ConfigError(anyhow::anyhow!("DATABASE_URL is required"))
            })?),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        })
    }

    pub fn url(&self) -> &str {
        self.url.expose_secret()
    }
}

/// Thresholds used by dashboard alerts and budget status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    pub low_balance_threshold: Decimal,
    pub budget_warning_ratio: Decimal,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            low_balance_threshold: DEFAULT_LOW_BALANCE,
            budget_warning_ratio: DEFAULT_WARNING_RATIO,
        }
    }
}

impl DashboardConfig {
    pub fn alert_thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            low_balance: self.low_balance_threshold,
            budget_warning_ratio: self.budget_warning_ratio,
        }
    }
}

impl FinanceConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StoreBackend::Postgres,
        };
        let database = match store_backend {
            StoreBackend::Postgres => Some(DatabaseConfig::from_env()?),
            StoreBackend::Memory => None,
        };

        let defaults = DashboardConfig::default();
        let dashboard = DashboardConfig {
            low_balance_threshold: decimal_var("LOW_BALANCE_THRESHOLD")?
                .unwrap_or(defaults.low_balance_threshold),
            budget_warning_ratio: decimal_var("BUDGET_WARNING_RATIO")?
                .unwrap_or(defaults.budget_warning_ratio),
        };
        if dashboard.budget_warning_ratio <= Decimal::ZERO
            || dashboard.budget_warning_ratio > Decimal::ONE
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "BUDGET_WARNING_RATIO must be in (0, 1], got {}",
                dashboard.budget_warning_ratio
            )));
        }

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "finance-service".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            store_backend,
            database,
            dashboard,
        })
    }

    /// In-memory configuration on an ephemeral port.
    pub fn in_memory() -> Self {
        Self {
            common: core_config::Config {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            service_name: "finance-service".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            otlp_endpoint: None,
            store_backend: StoreBackend::Memory,
            database: None,
            dashboard: DashboardConfig::default(),
        }
    }
}

/// Unset is `None`; set but unparsable is a config error.
fn decimal_var(name: &str) -> Result<Option<Decimal>, AppError> {
    match env::var(name) {
        Ok(raw) => Decimal::from_str(raw.trim()).map(Some).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} is not a decimal ('{}'): {}", name, raw, e))
        }),
        Err(_) => Ok(None),
    }
}
