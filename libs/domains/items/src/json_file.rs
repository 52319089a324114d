//! JSON document repository.
//!
//! The whole collection lives in one pretty-printed JSON array. Writes go to
//! a sibling temp file that is then renamed over the document, so readers
//! never observe a half-written collection.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::{debug, info, instrument};

use crate::error::{ItemError, ItemResult};
use crate::models::Item;
use crate::repository::ItemRepository;

/// File-backed item repository
#[derive(Debug, Clone)]
pub struct JsonFileItemRepository {
    path: PathBuf,
}

impl JsonFileItemRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the document as an empty collection if it does not exist yet.
    ///
    /// Returns whether a new document was written.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn init(&self) -> ItemResult<bool> {
        match fs::metadata(&self.path).await {
            Ok(_) => Ok(false),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.persist(&[]).await?;
                info!("Created empty item collection");
                Ok(true)
            }
            Err(e) => Err(self.storage_error("stat", e)),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "items.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn storage_error(&self, action: &str, err: std::io::Error) -> ItemError {
        ItemError::Storage(format!(
            "failed to {} {}: {}",
            action,
            self.path.display(),
            err
        ))
    }
}

#[async_trait]
impl ItemRepository for JsonFileItemRepository {
    #[instrument(level = "debug", skip_all)]
    async fn load(&self) -> ItemResult<Vec<Item>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Collection document missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.storage_error("read", e)),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }

    #[instrument(level = "debug", skip_all, fields(count = items.len()))]
    async fn persist(&self, items: &[Item]) -> ItemResult<()> {
        let document = serde_json::to_vec_pretty(items)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.storage_error("create directory for", e))?;
        }

        let temp = self.temp_path();
        fs::write(&temp, &document)
            .await
            .map_err(|e| self.storage_error("write", e))?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|e| self.storage_error("replace", e))?;

        debug!(path = %self.path.display(), "Persisted item collection");
        Ok(())
    }

    async fn modified(&self) -> ItemResult<Option<SystemTime>> {
        match fs::metadata(&self.path).await {
            Ok(metadata) => Ok(Some(
                metadata
                    .modified()
                    .map_err(|e| self.storage_error("stat", e))?,
            )),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.storage_error("stat", e)),
        }
    }
}
