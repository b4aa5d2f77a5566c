//! File metadata
//!
//! - `types`: identifiers and the file record
//! - `store`: the metadata store trait and its in-memory backend

pub mod store;
pub mod types;

pub use store::{InMemoryMetadataStore, MetadataStore};
pub use types::{FileId, FileRecord, StoredName};
