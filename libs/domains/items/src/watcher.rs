//! Invalidates the stats cache when the collection changes outside the API.

use observability::CatalogMetrics;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::repository::ItemRepository;
use crate::stats::StatsCache;

/// Polls the repository's modification time and drops the cached stats
/// snapshot whenever it changes, unless the snapshot was already computed
/// from the new modification.
pub struct ModifiedTimeWatcher<R: ItemRepository> {
    repository: Arc<R>,
    cache: Arc<StatsCache>,
    poll_interval: Duration,
}

impl<R: ItemRepository + 'static> ModifiedTimeWatcher<R> {
    pub fn new(repository: Arc<R>, cache: Arc<StatsCache>, poll_interval: Duration) -> Self {
        Self {
            repository,
            cache,
            poll_interval,
        }
    }

    /// Check once against `previous` and return the time to compare against
    /// next. A failed check keeps `previous`.
    pub async fn poll_once(&self, previous: Option<SystemTime>) -> Option<SystemTime> {
        match self.repository.modified().await {
            Ok(current) if current != previous => {
                if self.cache.is_stale(current).await {
                    debug!(?previous, ?current, "Collection modified, invalidating stats");
                    self.cache.invalidate().await;
                    CatalogMetrics::record_stats_invalidated("watcher");
                } else {
                    debug!(?current, "Cached stats already reflect this modification");
                }
                current
            }
            Ok(current) => current,
            Err(e) => {
                warn!(error = %e, "Failed to check collection modification time");
                previous
            }
        }
    }

    /// Poll until `shutdown` turns true or its sender is dropped
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut baseline = match self.repository.modified().await {
            Ok(modified) => modified,
            Err(e) => {
                warn!(error = %e, "Failed to read initial modification time");
                None
            }
        };

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        info!(poll_interval_ms = self.poll_interval.as_millis() as u64, "Stats watcher started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    baseline = self.poll_once(baseline).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Stats watcher stopped");
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ItemError;
    use crate::models::Item;
    use crate::repository::{InMemoryItemRepository, MockItemRepository};

    async fn warm(cache: &StatsCache) {
        cache
            .get_or_compute(|| async { Ok((Vec::<Item>::new(), None)) })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_poll_once_invalidates_on_change() {
        let repo = Arc::new(InMemoryItemRepository::new());
        let cache = Arc::new(StatsCache::new());
        let watcher = ModifiedTimeWatcher::new(repo.clone(), cache.clone(), Duration::from_secs(1));

        warm(&cache).await;
        let baseline = watcher.poll_once(None).await;
        assert!(baseline.is_none());
        assert!(cache.snapshot().await.is_some());

        repo.persist(&[]).await.unwrap();
        let next = watcher.poll_once(baseline).await;
        assert!(next.is_some());
        assert!(cache.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn test_poll_once_keeps_snapshot_computed_after_change() {
        let repo = Arc::new(InMemoryItemRepository::new());
        let cache = Arc::new(StatsCache::new());
        let watcher = ModifiedTimeWatcher::new(repo.clone(), cache.clone(), Duration::from_secs(1));

        repo.persist(&[]).await.unwrap();
        let current = repo.modified().await.unwrap();
        cache
            .get_or_compute(|| async move { Ok((Vec::<Item>::new(), current)) })
            .await
            .unwrap();

        assert_eq!(watcher.poll_once(None).await, current);
        assert!(cache.snapshot().await.is_some());
    }

    #[tokio::test]
    async fn test_poll_once_keeps_previous_on_error() {
        let mut repo = MockItemRepository::new();
        repo.expect_modified()
            .returning(|| Err(ItemError::Storage("permission denied".to_string())));

        let cache = Arc::new(StatsCache::new());
        warm(&cache).await;
        let watcher = ModifiedTimeWatcher::new(Arc::new(repo), cache.clone(), Duration::from_secs(1));

        let previous = Some(SystemTime::UNIX_EPOCH);
        assert_eq!(watcher.poll_once(previous).await, previous);
        assert!(cache.snapshot().await.is_some());
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let repo = Arc::new(InMemoryItemRepository::new());
        let cache = Arc::new(StatsCache::new());
        let watcher = ModifiedTimeWatcher::new(repo, cache, Duration::from_millis(10));

        let (tx, rx) = watch::channel(false);
        let handle = watcher.spawn(rx);
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("watcher did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_picks_up_external_changes() {
        let repo = Arc::new(InMemoryItemRepository::new());
        let cache = Arc::new(StatsCache::new());
        warm(&cache).await;

        let watcher = ModifiedTimeWatcher::new(repo.clone(), cache.clone(), Duration::from_millis(10));
        let (tx, rx) = watch::channel(false);
        let handle = watcher.spawn(rx);

        tokio::time::sleep(Duration::from_millis(30)).await;
        repo.persist(&[]).await.unwrap();

        let mut invalidated = false;
        for _ in 0..100 {
            if cache.snapshot().await.is_none() {
                invalidated = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(invalidated);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
