//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::metadata::{InMemoryMetadataStore, MetadataStore};
use crate::storage::{BlobError, BlobStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    metadata: Arc<dyn MetadataStore>,
    blobs: BlobStore,
}

impl AppState {
    /// Create the state with an in-memory metadata store, creating the
    /// upload directory if needed.
    pub async fn new(config: Config) -> Result<Self, BlobError> {
        Self::with_metadata_store(config, Arc::new(InMemoryMetadataStore::new())).await
    }

    /// Create the state with a caller-supplied metadata store
    pub async fn with_metadata_store(
        config: Config,
        metadata: Arc<dyn MetadataStore>,
    ) -> Result<Self, BlobError> {
        let blobs = BlobStore::new(config.storage.upload_dir.clone());
        blobs.init().await?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                metadata,
                blobs,
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the metadata store
    pub fn metadata(&self) -> &dyn MetadataStore {
        self.inner.metadata.as_ref()
    }

    /// Get the blob store
    pub fn blobs(&self) -> &BlobStore {
        &self.inner.blobs
    }
}
