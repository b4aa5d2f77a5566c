//! File record types

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Longest extension carried over from the client's filename
const MAX_EXTENSION_LEN: usize = 16;

// ============================================================================
// Identifiers
// ============================================================================

/// Server-generated identifier naming a file record and its blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FileId(Uuid);

impl FileId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for FileId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Name of a blob on disk.
///
/// Only constructible from a [`FileId`], so no client-supplied text other
/// than a plain alphanumeric extension ever reaches a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StoredName(String);

impl StoredName {
    /// Derive the stored name from the identifier and the extension of the
    /// client's original filename.
    pub fn derive(id: FileId, original_name: &str) -> Self {
        match safe_extension(original_name) {
            Some(ext) => Self(format!("{id}.{ext}")),
            None => Self(id.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoredName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn safe_extension(original_name: &str) -> Option<&str> {
    // Clients on Windows send backslash-separated paths
    let base = original_name.rsplit(['/', '\\']).next().unwrap_or(original_name);
    let ext = Path::new(base).extension()?.to_str()?;

    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());

    valid.then_some(ext)
}

// ============================================================================
// File Record
// ============================================================================

/// Metadata for one uploaded PDF
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: FileId,

    /// Filename as sent by the client. Display and headers only.
    pub original_name: String,

    pub stored_name: StoredName,

    pub upload_date: DateTime<Utc>,

    /// Byte length; zero until the upload stream completes
    pub size: u64,
}

impl FileRecord {
    /// Create a record for a new upload with a fresh identifier
    pub fn new(original_name: impl Into<String>) -> Self {
        let original_name = original_name.into();
        let id = FileId::new();

        Self {
            id,
            stored_name: StoredName::derive(id, &original_name),
            original_name,
            upload_date: Utc::now(),
            size: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_name_keeps_extension() {
        let id = FileId::new();
        let name = StoredName::derive(id, "report.pdf");
        assert_eq!(name.as_str(), format!("{id}.pdf"));
    }

    #[test]
    fn test_stored_name_ignores_path_components() {
        let id = FileId::new();

        let name = StoredName::derive(id, "../../etc/passwd");
        assert_eq!(name.as_str(), id.to_string());

        let name = StoredName::derive(id, "..\\..\\windows\\evil.pdf");
        assert_eq!(name.as_str(), format!("{id}.pdf"));

        let name = StoredName::derive(id, "archive.tar/../../x");
        assert_eq!(name.as_str(), id.to_string());
    }

    #[test]
    fn test_stored_name_rejects_odd_extensions() {
        let id = FileId::new();

        assert_eq!(StoredName::derive(id, "noext").as_str(), id.to_string());
        assert_eq!(StoredName::derive(id, "a.p df").as_str(), id.to_string());
        assert_eq!(
            StoredName::derive(id, "a.thisextensioniswaytoolong").as_str(),
            id.to_string()
        );
        assert_eq!(StoredName::derive(id, ".pdf").as_str(), id.to_string());
    }

    #[test]
    fn test_new_record_starts_empty() {
        let record = FileRecord::new("a.pdf");
        assert_eq!(record.size, 0);
        assert_eq!(record.original_name, "a.pdf");
        assert_eq!(record.stored_name, StoredName::derive(record.id, "a.pdf"));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = FileRecord::new("a.pdf");
        let b = FileRecord::new("a.pdf");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_file_id_parse() {
        let id = FileId::new();
        assert_eq!(id.to_string().parse::<FileId>().unwrap(), id);
        assert!("not-a-uuid".parse::<FileId>().is_err());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let mut record = FileRecord::new("a.pdf");
        record.size = 10;

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], record.id.to_string());
        assert_eq!(json["originalName"], "a.pdf");
        assert_eq!(json["storedName"], format!("{}.pdf", record.id));
        assert_eq!(json["size"], 10);
        assert!(json["uploadDate"].is_string());
    }
}
