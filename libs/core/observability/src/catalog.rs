//! Catalog-specific metrics.

use metrics::{counter, gauge};

/// Catalog metrics recorder
pub struct CatalogMetrics;

impl CatalogMetrics {
    /// Record a newly created item and the resulting collection size
    pub fn record_item_created(collection_size: usize) {
        counter!("catalog_item_mutations_total", "operation" => "create").increment(1);
        gauge!("catalog_items_total").set(collection_size as f64);
    }

    /// Record a partial update of an existing item
    pub fn record_item_updated() {
        counter!("catalog_item_mutations_total", "operation" => "update").increment(1);
    }

    /// Record a stats lookup answered from the cache
    pub fn record_stats_cache_hit() {
        counter!("catalog_stats_cache_requests_total", "result" => "hit").increment(1);
    }

    /// Record a stats lookup that recomputed the snapshot
    pub fn record_stats_cache_miss(collection_size: usize) {
        counter!("catalog_stats_cache_requests_total", "result" => "miss").increment(1);
        tracing::debug!(collection_size, "Recomputed stats snapshot");
    }

    /// Record a cache invalidation, `source` is "write" or "watcher"
    pub fn record_stats_invalidated(source: &'static str) {
        counter!("catalog_stats_cache_invalidations_total", "source" => source).increment(1);
    }
}
