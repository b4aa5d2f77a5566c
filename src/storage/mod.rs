//! Blob Store
//!
//! Uploaded PDF bytes on local disk, one file per identifier. Every path is
//! built from a [`StoredName`], which in turn is built from a server-generated
//! [`FileId`](crate::metadata::FileId).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::metadata::StoredName;

/// Subdirectory for blobs that are still being written. `/uploads` refuses
/// dot-prefixed path segments, so nothing in here is ever served.
pub const PARTIAL_DIR: &str = ".partial";

/// Blob store error
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl BlobError {
    fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.display().to_string(),
            source,
        }
    }
}

// ============================================================================
// Blob Store
// ============================================================================

/// Local directory of uploaded blobs
#[derive(Debug, Clone)]
pub struct BlobStore {
    base_path: PathBuf,
}

impl BlobStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Create the storage directories if they do not exist
    pub async fn init(&self) -> Result<(), BlobError> {
        let partial_dir = self.partial_dir();
        tokio::fs::create_dir_all(&partial_dir)
            .await
            .map_err(|e| BlobError::io("create directory", &partial_dir, e))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn blob_path(&self, name: &StoredName) -> PathBuf {
        self.base_path.join(name.as_str())
    }

    fn partial_dir(&self) -> PathBuf {
        self.base_path.join(PARTIAL_DIR)
    }

    fn partial_path(&self, name: &StoredName) -> PathBuf {
        self.partial_dir().join(name.as_str())
    }

    /// Start writing a new blob. Bytes go to a temporary file until
    /// [`BlobWriter::commit`] moves it into place.
    pub async fn create(&self, name: &StoredName) -> Result<BlobWriter, BlobError> {
        self.init().await?;

        let temp_path = self.partial_path(name);
        let file = File::create(&temp_path)
            .await
            .map_err(|e| BlobError::io("create", &temp_path, e))?;

        Ok(BlobWriter {
            file,
            temp_path,
            final_path: self.blob_path(name),
            written: 0,
        })
    }

    /// Open a blob for reading. Returns `None` if it is not on disk.
    pub async fn open(&self, name: &StoredName) -> Result<Option<(File, u64)>, BlobError> {
        let path = self.blob_path(name);

        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BlobError::io("open", &path, e)),
        };

        let len = file
            .metadata()
            .await
            .map_err(|e| BlobError::io("stat", &path, e))?
            .len();

        Ok(Some((file, len)))
    }

    /// Check whether a blob is on disk
    pub async fn exists(&self, name: &StoredName) -> Result<bool, BlobError> {
        let path = self.blob_path(name);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| BlobError::io("stat", &path, e))
    }

    /// Delete a blob. Returns `false` if it was already gone.
    pub async fn delete(&self, name: &StoredName) -> Result<bool, BlobError> {
        let path = self.blob_path(name);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(BlobError::io("delete", &path, e)),
        }
    }
}

// ============================================================================
// Blob Writer
// ============================================================================

/// In-progress blob write
#[derive(Debug)]
pub struct BlobWriter {
    file: File,
    temp_path: PathBuf,
    final_path: PathBuf,
    written: u64,
}

impl BlobWriter {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), BlobError> {
        self.file
            .write_all(chunk)
            .await
            .map_err(|e| BlobError::io("write", &self.temp_path, e))?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Bytes written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and move the blob into place, returning its size. On failure
    /// the partial blob is removed.
    pub async fn commit(mut self) -> Result<u64, BlobError> {
        if let Err(e) = self.sync().await {
            self.abort().await;
            return Err(e);
        }

        let Self {
            file,
            temp_path,
            final_path,
            written,
        } = self;
        drop(file);

        if let Err(e) = tokio::fs::rename(&temp_path, &final_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(BlobError::io("rename", &temp_path, e));
        }

        Ok(written)
    }

    async fn sync(&mut self) -> Result<(), BlobError> {
        self.file
            .flush()
            .await
            .map_err(|e| BlobError::io("flush", &self.temp_path, e))?;
        self.file
            .sync_all()
            .await
            .map_err(|e| BlobError::io("sync", &self.temp_path, e))
    }

    /// Discard the partial blob
    pub async fn abort(self) {
        drop(self.file);
        if let Err(e) = tokio::fs::remove_file(&self.temp_path).await {
            tracing::warn!(
                path = %self.temp_path.display(),
                error = %e,
                "Failed to remove partial upload"
            );
        }
    }
}
