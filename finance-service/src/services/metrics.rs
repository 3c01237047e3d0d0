//! Prometheus metrics for finance-service.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};
use std::sync::OnceLock;

/// HTTP request metrics recorded through the `metrics` facade.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "finance_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register db_query_duration")
});

/// Transactions recorded, by type.
pub static TRANSACTIONS_CREATED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "finance_transactions_created_total",
        "Total number of transactions recorded",
        &["type"]
    )
    .expect("Failed to register transactions_created")
});

/// Invoices marked paid.
pub static INVOICES_PAID: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "finance_invoices_paid_total",
        "Total number of invoices marked paid",
        &["status"]
    )
    .expect("Failed to register invoices_paid")
});

/// Dashboard computations, by view.
pub static DASHBOARD_COMPUTATIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "finance_dashboard_computations_total",
        "Total number of dashboard aggregates computed",
        &["view"]
    )
    .expect("Failed to register dashboard_computations")
});

/// Initialize all metrics. Safe to call more than once.
pub fn init_metrics() {
    METRICS_HANDLE.get_or_init(|| {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        if metrics::set_global_recorder(recorder).is_err() {
            tracing::warn!("A global metrics recorder is already installed");
        }
        handle
    });

    Lazy::force(&DB_QUERY_DURATION);
    Lazy::force(&TRANSACTIONS_CREATED);
    Lazy::force(&INVOICES_PAID);
    Lazy::force(&DASHBOARD_COMPUTATIONS);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default();

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    output.push_str(&encoder.encode_to_string(&metric_families).unwrap_or_default());
    output
}
