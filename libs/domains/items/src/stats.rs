//! Collection statistics and their memoized snapshot.

use observability::CatalogMetrics;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::ItemResult;
use crate::models::{Item, ItemStats};

/// Compute statistics for a collection.
///
/// Ties on the cheapest or most expensive price go to the item that comes
/// first in collection order.
pub fn compute(items: &[Item]) -> ItemStats {
    let total = items.len();
    let average_price = if total == 0 {
        0.0
    } else {
        items.iter().map(|item| item.price).sum::<f64>() / total as f64
    };

    let mut min_price_item: Option<&Item> = None;
    let mut max_price_item: Option<&Item> = None;
    for item in items {
        if min_price_item.is_none_or(|min| item.price < min.price) {
            min_price_item = Some(item);
        }
        if max_price_item.is_none_or(|max| item.price > max.price) {
            max_price_item = Some(item);
        }
    }

    ItemStats {
        total,
        average_price,
        min_price_item: min_price_item.cloned(),
        max_price_item: max_price_item.cloned(),
    }
}

#[derive(Debug, Clone)]
enum CacheState {
    Empty,
    Populated {
        snapshot: ItemStats,
        source_modified: Option<SystemTime>,
    },
}

/// Memoized stats snapshot.
///
/// The snapshot is computed lazily on the first read after an
/// invalidation. Every invalidation bumps a generation counter; a
/// computation that started before the bump still answers its caller but is
/// not stored, so a stale snapshot never outlives the write that made it
/// stale.
#[derive(Debug)]
pub struct StatsCache {
    state: RwLock<CacheState>,
    generation: AtomicU64,
}

impl Default for StatsCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsCache {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CacheState::Empty),
            generation: AtomicU64::new(0),
        }
    }

    /// Return the cached snapshot, computing it from `load` when empty.
    ///
    /// `load` yields the current collection and the source modification
    /// time it was read at. A failing load leaves the cache untouched.
    pub async fn get_or_compute<F, Fut>(&self, load: F) -> ItemResult<ItemStats>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ItemResult<(Vec<Item>, Option<SystemTime>)>>,
    {
        if let CacheState::Populated { snapshot, .. } = &*self.state.read().await {
            CatalogMetrics::record_stats_cache_hit();
            return Ok(snapshot.clone());
        }

        let generation = self.generation.load(Ordering::Acquire);
        let (items, source_modified) = load().await?;
        let snapshot = compute(&items);
        CatalogMetrics::record_stats_cache_miss(items.len());

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::Acquire) == generation {
            *state = CacheState::Populated {
                snapshot: snapshot.clone(),
                source_modified,
            };
        } else {
            debug!("Collection changed while computing stats, snapshot not cached");
        }

        Ok(snapshot)
    }

    /// Drop the cached snapshot
    pub async fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        *self.state.write().await = CacheState::Empty;
    }

    /// The cached snapshot, if any, without computing one
    pub async fn snapshot(&self) -> Option<ItemStats> {
        match &*self.state.read().await {
            CacheState::Populated { snapshot, .. } => Some(snapshot.clone()),
            CacheState::Empty => None,
        }
    }

    /// Whether a cached snapshot exists that was computed from a source
    /// other than the one last modified at `current`
    pub async fn is_stale(&self, current: Option<SystemTime>) -> bool {
        match &*self.state.read().await {
            CacheState::Populated {
                source_modified, ..
            } => *source_modified != current,
            CacheState::Empty => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ItemError;
    use std::sync::atomic::AtomicUsize;

    fn item(id: u64, price: f64) -> Item {
        Item {
            id,
            name: format!("Item {}", id),
            category: "Misc".to_string(),
            price,
        }
    }

    #[test]
    fn test_compute_empty_collection() {
        let stats = compute(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_price, 0.0);
        assert!(stats.min_price_item.is_none());
        assert!(stats.max_price_item.is_none());
    }

    #[test]
    fn test_compute_average_min_max() {
        let stats = compute(&[item(1, 10.0), item(2, 100.0)]);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.average_price, 55.0);
        assert_eq!(stats.min_price_item.map(|i| i.id), Some(1));
        assert_eq!(stats.max_price_item.map(|i| i.id), Some(2));
    }

    #[test]
    fn test_compute_ties_go_to_first_item() {
        let stats = compute(&[item(1, 5.0), item(2, 5.0), item(3, 5.0)]);
        assert_eq!(stats.min_price_item.map(|i| i.id), Some(1));
        assert_eq!(stats.max_price_item.map(|i| i.id), Some(1));
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let cache = StatsCache::new();
        let counter = AtomicUsize::new(0);
        let loads = &counter;
        let load = || async move {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok((vec![item(1, 10.0)], None))
        };

        let first = cache.get_or_compute(load).await.unwrap();
        let second = cache.get_or_compute(load).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_recompute() {
        let cache = StatsCache::new();
        cache
            .get_or_compute(|| async { Ok((vec![item(1, 10.0)], None)) })
            .await
            .unwrap();

        cache.invalidate().await;
        assert!(cache.snapshot().await.is_none());

        let stats = cache
            .get_or_compute(|| async { Ok((vec![item(1, 10.0), item(2, 30.0)], None)) })
            .await
            .unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.average_price, 20.0);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_cache_empty() {
        let cache = StatsCache::new();
        let result = cache
            .get_or_compute(|| async { Err(ItemError::Storage("unreadable".to_string())) })
            .await;

        assert!(matches!(result, Err(ItemError::Storage(_))));
        assert!(cache.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn test_invalidation_during_compute_discards_result() {
        let cache = StatsCache::new();
        let writer = &cache;

        let stats = cache
            .get_or_compute(|| async move {
                writer.invalidate().await;
                Ok((vec![item(1, 10.0)], None))
            })
            .await
            .unwrap();

        assert_eq!(stats.total, 1);
        assert!(cache.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn test_staleness_follows_source_modified() {
        let cache = StatsCache::new();
        let modified = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(42);
        assert!(!cache.is_stale(Some(modified)).await);

        cache
            .get_or_compute(|| async move { Ok((vec![], Some(modified))) })
            .await
            .unwrap();

        assert!(!cache.is_stale(Some(modified)).await);
        assert!(cache.is_stale(Some(modified + std::time::Duration::from_secs(1))).await);
        assert!(cache.is_stale(None).await);
    }
}
