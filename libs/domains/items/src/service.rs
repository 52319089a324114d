//! Item Service - Business logic layer

use observability::CatalogMetrics;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, instrument};
use validator::{Validate, ValidationErrors};

use crate::error::{ItemError, ItemResult};
use crate::models::{CreateItem, Item, ItemPage, ItemQuery, ItemStats, UpdateItem};
use crate::query;
use crate::repository::ItemRepository;
use crate::stats::StatsCache;
use crate::watcher::ModifiedTimeWatcher;

/// Item service providing business logic operations
///
/// Writes are read-modify-write cycles over the whole collection and are
/// serialized through a single lock, so two concurrent creates can neither
/// claim the same id nor both pass the uniqueness check. Every successful
/// write invalidates the stats snapshot.
pub struct ItemService<R: ItemRepository> {
    repository: Arc<R>,
    stats: Arc<StatsCache>,
    write_lock: Arc<Mutex<()>>,
}

impl<R: ItemRepository> Clone for ItemService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            stats: Arc::clone(&self.stats),
            write_lock: Arc::clone(&self.write_lock),
        }
    }
}

fn next_id(items: &[Item]) -> ItemResult<u64> {
    items
        .iter()
        .map(|item| item.id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| ItemError::Storage("item id space exhausted".to_string()))
}

impl<R: ItemRepository> ItemService<R> {
    /// Create a new ItemService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            stats: Arc::new(StatsCache::new()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// List items matching a search, ordered and paginated
    #[instrument(skip(self))]
    pub async fn list_items(&self, query: ItemQuery) -> ItemResult<ItemPage> {
        query.validate()?;
        let items = self.repository.load().await?;
        Ok(query::apply(items, &query))
    }

    /// Get an item by ID
    #[instrument(skip(self))]
    pub async fn get_item(&self, id: u64) -> ItemResult<Item> {
        self.repository
            .load()
            .await?
            .into_iter()
            .find(|item| item.id == id)
            .ok_or(ItemError::NotFound(id))
    }

    /// Create a new item with the next free id
    #[instrument(skip(self, input), fields(item_name = ?input.name))]
    pub async fn create_item(&self, input: CreateItem) -> ItemResult<Item> {
        input.validate()?;
        let (Some(name), Some(category), Some(price)) = (input.name, input.category, input.price)
        else {
            return Err(ItemError::Validation(ValidationErrors::new()));
        };

        let _guard = self.write_lock.lock().await;
        let mut items = self.repository.load().await?;

        if items.iter().any(|item| item.has_name(&name)) {
            return Err(ItemError::DuplicateName(name));
        }

        let item = Item {
            id: next_id(&items)?,
            name,
            category,
            price,
        };
        items.push(item.clone());
        self.repository.persist(&items).await?;

        self.invalidate_stats("write").await;
        CatalogMetrics::record_item_created(items.len());
        info!(item_id = item.id, "Item created");

        Ok(item)
    }

    /// Apply a partial update to an existing item
    #[instrument(skip(self, input))]
    pub async fn update_item(&self, id: u64, input: UpdateItem) -> ItemResult<Item> {
        self.update_with(id, move || Ok(input)).await
    }

    /// Apply a partial update given as an undecoded JSON body
    ///
    /// The body is decoded only after the item is found, so a missing item
    /// is reported as not found even when the body has unknown or mistyped
    /// fields.
    #[instrument(skip(self, body))]
    pub async fn patch_item(&self, id: u64, body: serde_json::Value) -> ItemResult<Item> {
        self.update_with(id, move || {
            serde_json::from_value(body).map_err(|e| ItemError::InvalidBody(e.to_string()))
        })
        .await
    }

    async fn update_with<F>(&self, id: u64, decode: F) -> ItemResult<Item>
    where
        F: FnOnce() -> ItemResult<UpdateItem>,
    {
        let _guard = self.write_lock.lock().await;
        let mut items = self.repository.load().await?;

        let index = items
            .iter()
            .position(|item| item.id == id)
            .ok_or(ItemError::NotFound(id))?;

        let input = decode()?;
        input.validate()?;

        if let Some(ref new_name) = input.name {
            let taken = items
                .iter()
                .enumerate()
                .any(|(i, item)| i != index && item.has_name(new_name));
            if taken {
                return Err(ItemError::DuplicateName(new_name.clone()));
            }
        }

        items[index].apply_update(input);
        let updated = items[index].clone();
        self.repository.persist(&items).await?;

        self.invalidate_stats("write").await;
        CatalogMetrics::record_item_updated();
        info!(item_id = id, "Item updated");

        Ok(updated)
    }

    /// Collection statistics, served from the cache when possible
    #[instrument(skip(self))]
    pub async fn stats(&self) -> ItemResult<ItemStats> {
        let repository = Arc::clone(&self.repository);
        self.stats
            .get_or_compute(|| async move {
                let modified = repository.modified().await?;
                let items = repository.load().await?;
                Ok((items, modified))
            })
            .await
    }

    /// Check that the collection can be read
    pub async fn check_storage(&self) -> ItemResult<()> {
        self.repository.load().await.map(|_| ())
    }

    async fn invalidate_stats(&self, source: &'static str) {
        self.stats.invalidate().await;
        CatalogMetrics::record_stats_invalidated(source);
    }
}

impl<R: ItemRepository + 'static> ItemService<R> {
    /// A watcher that invalidates this service's stats cache when the
    /// collection is modified behind its back
    pub fn watcher(&self, poll_interval: Duration) -> ModifiedTimeWatcher<R> {
        ModifiedTimeWatcher::new(
            Arc::clone(&self.repository),
            Arc::clone(&self.stats),
            poll_interval,
        )
    }
}
