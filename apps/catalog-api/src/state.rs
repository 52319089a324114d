//! Application state management.

use domain_items::{ItemService, JsonFileItemRepository};

/// Shared application state.
///
/// Cloning is cheap: the service shares its repository, stats cache and
/// write lock through `Arc`s, so every router built from a clone sees the
/// same cache.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// Item service over the JSON collection document
    pub items: ItemService<JsonFileItemRepository>,
}
