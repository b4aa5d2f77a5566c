//! Metadata Store
//!
//! Process-lifetime mapping from identifier to file record. Handlers only
//! see the [`MetadataStore`] trait, so a durable backend can replace the
//! in-memory one without touching them.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::types::{FileId, FileRecord};

// ============================================================================
// Metadata Store Trait
// ============================================================================

/// Storage backend for file records
#[async_trait::async_trait]
pub trait MetadataStore: Send + Sync {
    /// Look up a record by identifier
    async fn get(&self, id: FileId) -> Option<FileRecord>;

    /// Insert or replace a record
    async fn put(&self, record: FileRecord);

    /// Remove a record, returning it if it existed
    async fn delete(&self, id: FileId) -> Option<FileRecord>;

    /// All current records, oldest upload first
    async fn list(&self) -> Vec<FileRecord>;

    /// Number of records currently held
    async fn count(&self) -> usize;
}

// ============================================================================
// In-Memory Store
// ============================================================================

/// Records held in a map for the life of the process
#[derive(Clone, Default)]
pub struct InMemoryMetadataStore {
    records: Arc<RwLock<HashMap<FileId, FileRecord>>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn get(&self, id: FileId) -> Option<FileRecord> {
        self.records.read().await.get(&id).cloned()
    }

    async fn put(&self, record: FileRecord) {
        let mut records = self.records.write().await;
        records.insert(record.id, record);
    }

    async fn delete(&self, id: FileId) -> Option<FileRecord> {
        let removed = self.records.write().await.remove(&id);

        if removed.is_some() {
            tracing::debug!(file_id = %id, "Removed file record");
        }

        removed
    }

    async fn list(&self) -> Vec<FileRecord> {
        let mut records: Vec<FileRecord> = self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| a.upload_date.cmp(&b.upload_date).then(a.id.cmp(&b.id)));
        records
    }

    async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}
