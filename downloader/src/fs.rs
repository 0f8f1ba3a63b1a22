// Filesystem backend implementation

use super::{DownloadBackend, DownloadError, DownloadFile};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the download directory
pub const DOWNLOAD_DIR_ENV: &str = "FLOORPLAN_DOWNLOAD_DIR";

/// Writes downloads into a directory on disk
#[derive(Debug, Clone)]
pub struct FileSystemBackend {
    directory: PathBuf,
}

impl FileSystemBackend {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Use `FLOORPLAN_DOWNLOAD_DIR`, then the user's download folder, then the current directory
    pub fn from_env() -> Self {
        let directory = env::var_os(DOWNLOAD_DIR_ENV)
            .map(PathBuf::from)
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(directory)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Destination of a file with the given name
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.directory.join(filename)
    }
}

impl DownloadBackend for FileSystemBackend {
    fn save(&self, file: &DownloadFile) -> Result<(), DownloadError> {
        let path = self.path_for(&file.filename);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| DownloadError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(&path, &file.contents).map_err(|source| DownloadError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), "Download saved");
        Ok(())
    }
}
