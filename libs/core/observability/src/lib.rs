//! Observability utilities for the catalog services.
//!
//! This crate provides:
//! - Prometheus metrics recording and export
//! - Catalog metrics (item mutations, stats cache behaviour)
//! - Axum middleware for automatic request metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, CatalogMetrics};
//!
//! init_metrics()?;
//! CatalogMetrics::record_item_created();
//!
//! let app = Router::new().route("/metrics", get(metrics_handler));
//! ```

pub mod catalog;
pub mod middleware;

pub use catalog::CatalogMetrics;
pub use middleware::metrics_middleware;

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// Call once at application startup; later calls return the same handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;

        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();

        Ok(handle)
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

/// Register metric descriptions for documentation
fn register_metric_descriptions() {
    use metrics::describe_counter;
    use metrics::describe_gauge;
    use metrics::describe_histogram;

    // HTTP metrics
    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    // Catalog metrics
    describe_counter!(
        "catalog_item_mutations_total",
        "Item creations and updates by operation"
    );
    describe_gauge!(
        "catalog_items_total",
        "Number of items in the collection at the last persist"
    );
    describe_counter!(
        "catalog_stats_cache_requests_total",
        "Stats cache lookups by result (hit or miss)"
    );
    describe_counter!(
        "catalog_stats_cache_invalidations_total",
        "Stats cache invalidations by source"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_metrics_handler_before_init() {
        if get_metrics_handle().is_none() {
            assert_eq!(metrics_handler().await, "# Metrics not initialized\n");
        }
    }
}
