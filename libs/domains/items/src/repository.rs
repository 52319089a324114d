use async_trait::async_trait;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;

use crate::error::ItemResult;
use crate::models::Item;

/// Repository trait for the item collection
///
/// The collection is read and written as a whole: callers load it, change
/// it in memory and persist it back. Serializing writers is the caller's
/// job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Load the whole collection; a missing document is an empty collection
    async fn load(&self) -> ItemResult<Vec<Item>>;

    /// Replace the whole collection
    async fn persist(&self, items: &[Item]) -> ItemResult<()>;

    /// Last modification time of the underlying document, `None` if absent
    async fn modified(&self) -> ItemResult<Option<SystemTime>>;
}

#[derive(Debug, Default)]
struct InMemoryState {
    items: Vec<Item>,
    modified: Option<SystemTime>,
}

/// In-memory repository, for tests and ephemeral instances
#[derive(Debug, Clone, Default)]
pub struct InMemoryItemRepository {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing collection
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryState {
                items,
                modified: Some(SystemTime::now()),
            })),
        }
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn load(&self) -> ItemResult<Vec<Item>> {
        Ok(self.state.read().await.items.clone())
    }

    async fn persist(&self, items: &[Item]) -> ItemResult<()> {
        let mut state = self.state.write().await;
        state.items = items.to_vec();
        state.modified = Some(SystemTime::now());
        Ok(())
    }

    async fn modified(&self) -> ItemResult<Option<SystemTime>> {
        Ok(self.state.read().await.modified)
    }
}
