//! Image file storage
//!
//! Photos received from operators are stored under the image directory,
//! named after the platform file id. Records keep only the file name.

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info, warn};
use crate::utils::errors::Result;
use crate::utils::helpers::sanitize_filename;

/// Where photo payloads are fetched from
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Download the photo identified by `file_id` into `destination`
    async fn download_photo(&self, file_id: &str, destination: &Path) -> Result<()>;
}

/// A photo placed in the image directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    pub file_name: String,
    /// False when the file was already on disk, e.g. kept for another advertisement
    pub downloaded: bool,
}

#[derive(Debug, Clone)]
pub struct ImageStorage {
    dir: PathBuf,
}

impl ImageStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the image directory if needed
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// File name used for a photo with this platform file id
    pub fn file_name_for(file_id: &str) -> String {
        format!("{}.jpg", sanitize_filename(file_id))
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    pub async fn exists(&self, file_name: &str) -> bool {
        fs::try_exists(self.path_for(file_name)).await.unwrap_or(false)
    }

    /// Download a photo into the image directory.
    ///
    /// A file id names a single photo, so a file already on disk is reused
    /// as is.
    pub async fn store_photo(&self, source: &dyn PhotoSource, file_id: &str) -> Result<StoredPhoto> {
        self.ensure_dir().await?;
        let file_name = Self::file_name_for(file_id);
        let path = self.path_for(&file_name);

        if self.exists(&file_name).await {
            debug!(file_id = file_id, path = %path.display(), "Photo already stored");
            return Ok(StoredPhoto { file_name, downloaded: false });
        }

        source.download_photo(file_id, &path).await?;

        debug!(file_id = file_id, path = %path.display(), "Photo stored");
        Ok(StoredPhoto { file_name, downloaded: true })
    }

    /// Remove a stored file. A file that is already gone counts as removed.
    ///
    /// Returns whether a file was actually deleted.
    pub async fn remove(&self, file_name: &str) -> Result<bool> {
        let path = self.path_for(file_name);
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "Image file removed");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Image file already absent");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
