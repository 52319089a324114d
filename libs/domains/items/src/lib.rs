//! Items Domain
//!
//! Product catalog items persisted as a single JSON document, with search,
//! pagination and memoized collection statistics.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌────────────┐
//! │   Service   │ ──► │ StatsCache │ ◄── ModifiedTimeWatcher
//! └──────┬──────┘     └────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Whole-collection load/persist (trait + JSON file)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_items::{handlers, ItemService, JsonFileItemRepository};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = JsonFileItemRepository::new("data/items.json");
//! repository.init().await?;
//!
//! let service = ItemService::new(repository);
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! service.watcher(Duration::from_secs(5)).spawn(shutdown_rx);
//!
//! let items = handlers::router(service.clone());
//! let stats = handlers::stats_router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod json_file;
pub mod models;
pub mod query;
pub mod repository;
pub mod service;
pub mod stats;
pub mod watcher;

// Re-export commonly used types
pub use error::{ItemError, ItemResult};
pub use handlers::{ApiDoc, StatsApiDoc};
pub use json_file::JsonFileItemRepository;
pub use models::{CreateItem, Item, ItemPage, ItemQuery, ItemStats, SortOrder, UpdateItem};
pub use repository::{InMemoryItemRepository, ItemRepository};
pub use service::ItemService;
pub use stats::StatsCache;
pub use watcher::ModifiedTimeWatcher;
