//! Shared fixtures for the HTTP tests

#![allow(dead_code)]

use std::path::Path;

use axum::Router;
use tempfile::TempDir;

use pdf_share_server::config::Config;
use pdf_share_server::routes;
use pdf_share_server::state::AppState;
use pdf_share_server::storage::PARTIAL_DIR;

pub const SHARE_PAGE_HTML: &str = "<!DOCTYPE html><html><body>shared pdf</body></html>";

/// Router plus the temporary directories backing it
pub struct TestApp {
    pub router: Router,
    pub upload_dir: TempDir,
    pub static_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let upload_dir = TempDir::new().unwrap();
        let static_dir = TempDir::new().unwrap();
        std::fs::write(static_dir.path().join("share.html"), SHARE_PAGE_HTML).unwrap();

        let mut config = Config::default();
        config.storage.upload_dir = upload_dir.path().to_path_buf();
        config.storage.static_dir = static_dir.path().to_path_buf();
        customize(&mut config);

        let state = AppState::new(config).await.unwrap();

        Self {
            router: routes::app(state),
            upload_dir,
            static_dir,
        }
    }

    /// Committed blobs in the upload directory
    pub fn stored_files(&self) -> Vec<String> {
        list_dir(self.upload_dir.path())
    }

    /// Leftover in-progress writes
    pub fn partial_files(&self) -> Vec<String> {
        list_dir(&self.upload_dir.path().join(PARTIAL_DIR))
    }
}

fn list_dir(path: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(path)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();
    names.sort();
    names
}

/// A small payload that starts like a PDF
pub fn pdf_bytes(len: usize) -> Vec<u8> {
    let mut data = b"%PDF-1.4\n".to_vec();
    data.resize(len, b'x');
    data
}
