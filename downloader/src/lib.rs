// Download service for the floor-plan export toolkit
//
// This crate turns in-memory values into downloadable JSON files
// and hands them to a pluggable platform backend.

use floorplan_export_core::{DownloadPayload, JSON_MIME_TYPE};
use serde::Serialize;
use std::path::PathBuf;

// Filesystem backend for native targets
#[cfg(not(target_arch = "wasm32"))]
pub mod fs;
#[cfg(not(target_arch = "wasm32"))]
pub use fs::{FileSystemBackend, DOWNLOAD_DIR_ENV};

// Anchor-click backend for the browser
#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(target_arch = "wasm32")]
pub use browser::BrowserBackend;

/// Download errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("JSONシリアライズエラー: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("ファイル書き込みエラー: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ブラウザエラー: {0}")]
    Browser(String),
}

/// File handed to a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFile {
    /// Suggested file name, used verbatim
    pub filename: String,
    pub mime_type: String,
    pub contents: Vec<u8>,
}

impl DownloadFile {
    /// Pretty-printed JSON file for a payload
    pub fn json(filename: &str, payload: &DownloadPayload) -> Result<Self, DownloadError> {
        let text = payload.to_pretty_json()?;
        Ok(Self {
            filename: filename.to_string(),
            mime_type: JSON_MIME_TYPE.to_string(),
            contents: text.into_bytes(),
        })
    }

    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.contents).ok()
    }
}

/// Platform capability for "save these bytes as a named file"
pub trait DownloadBackend {
    fn save(&self, file: &DownloadFile) -> Result<(), DownloadError>;
}

impl<B: DownloadBackend + ?Sized> DownloadBackend for &B {
    fn save(&self, file: &DownloadFile) -> Result<(), DownloadError> {
        (**self).save(file)
    }
}

/// Download service with pluggable backend
pub struct FileDownloader<B: DownloadBackend> {
    backend: B,
}

impl<B: DownloadBackend> FileDownloader<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn download_file(&self, file: &DownloadFile) -> Result<(), DownloadError> {
        tracing::debug!(
            filename = %file.filename,
            mime_type = %file.mime_type,
            bytes = file.contents.len(),
            "Saving download"
        );
        self.backend.save(file)
    }

    /// Save `data` as a pretty-printed JSON file
    ///
    /// `data` is first copied through a JSON encode/decode round-trip. If it
    /// cannot be encoded, the error is returned and the backend is never called.
    pub fn download_json<T: Serialize + ?Sized>(
        &self,
        filename: &str,
        data: &T,
    ) -> Result<(), DownloadError> {
        let payload = DownloadPayload::from_serializable(data)?;
        let file = DownloadFile::json(filename, &payload)?;
        self.download_file(&file)
    }
}

/// Backend for the current platform
#[cfg(not(target_arch = "wasm32"))]
pub fn default_backend() -> FileSystemBackend {
    FileSystemBackend::from_env()
}

/// Backend for the current platform
#[cfg(target_arch = "wasm32")]
pub fn default_backend() -> BrowserBackend {
    BrowserBackend::new()
}

/// Save `data` as a JSON file named `filename` with the platform's download mechanism
///
/// In the browser this triggers the regular file download. On native targets
/// the file is written to the download directory (see [`FileSystemBackend::from_env`]).
pub fn download_json<T: Serialize + ?Sized>(filename: &str, data: &T) -> Result<(), DownloadError> {
    FileDownloader::new(default_backend()).download_json(filename, data)
}
