//! Operator-facing advertisement management: listing, inspecting and
//! deleting advertisements together with their image files.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use crate::database::RecordStore;
use crate::models::{Advertisement, Image};
use crate::services::images::ImageStorage;
use crate::utils::errors::{AdRelayError, Result};
use crate::utils::logging;

#[derive(Clone)]
pub struct AdvertisementService {
    store: Arc<dyn RecordStore>,
    images: ImageStorage,
}

impl AdvertisementService {
    pub fn new(store: Arc<dyn RecordStore>, images: ImageStorage) -> Self {
        Self { store, images }
    }

    pub async fn list(&self) -> Result<Vec<Advertisement>> {
        self.store.list_advertisements().await
    }

    /// An advertisement and its images in delivery order
    pub async fn get_with_images(&self, id: i64) -> Result<(Advertisement, Vec<Image>)> {
        let advertisement = self
            .store
            .get_advertisement(id)
            .await?
            .ok_or(AdRelayError::AdvertisementNotFound { advertisement_id: id })?;
        let images = self.store.list_images(id).await?;
        Ok((advertisement, images))
    }

    /// Delete an advertisement, its image records and image files.
    ///
    /// Files go first; a file that is already gone is fine. A file still
    /// referenced by another advertisement's image is kept. Returns the
    /// number of files removed.
    pub async fn delete(&self, id: i64, operator_id: i64) -> Result<usize> {
        let (advertisement, images) = self.get_with_images(id).await?;

        let shared: HashSet<String> = self
            .store
            .list_all_images()
            .await?
            .into_iter()
            .filter(|image| image.advertisement_id != id)
            .map(|image| image.file_path)
            .collect();

        let mut removed = 0;
        for image in &images {
            if shared.contains(&image.file_path) {
                debug!(file = %image.file_path, "Image file shared with another advertisement, keeping it");
                continue;
            }
            match self.images.remove(&image.file_path).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(file = %image.file_path, error = %e, "Failed to remove image file");
                    return Err(e);
                }
            }
        }

        self.store.delete_advertisement(id).await?;

        let operator = operator_id.to_string();
        logging::log_advertisement_action(advertisement.id, "deleted", Some(&operator));
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::database::MemoryStore;
    use crate::models::{NewAdvertisement, NewImage};

    async fn setup() -> (tempfile::TempDir, Arc<MemoryStore>, AdvertisementService) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let service = AdvertisementService::new(store.clone(), ImageStorage::new(dir.path()));
        (dir, store, service)
    }

    async fn create(store: &MemoryStore, dir: &std::path::Path, files: &[&str]) -> Advertisement {
        for file in files {
            tokio::fs::write(dir.join(file), b"jpeg").await.unwrap();
        }
        store
            .create_advertisement(
                NewAdvertisement { body: "Sale".to_string(), contact: None },
                files.iter().map(|f| NewImage { file_path: f.to_string() }).collect(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_delete_removes_files_and_records() {
        let (dir, store, service) = setup().await;
        let ad = create(&store, dir.path(), &["a.jpg", "b.jpg"]).await;

        assert_eq!(service.delete(ad.id, 1).await.unwrap(), 2);

        assert!(!dir.path().join("a.jpg").exists());
        assert!(!dir.path().join("b.jpg").exists());
        assert!(store.get_advertisement(ad.id).await.unwrap().is_none());
        assert!(store.list_images(ad.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_files() {
        let (dir, store, service) = setup().await;
        let ad = create(&store, dir.path(), &["gone.jpg"]).await;
        tokio::fs::remove_file(dir.path().join("gone.jpg")).await.unwrap();

        assert_eq!(service.delete(ad.id, 1).await.unwrap(), 0);
        assert!(store.get_advertisement(ad.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_keeps_shared_files() {
        let (dir, store, service) = setup().await;
        let first = create(&store, dir.path(), &["shared.jpg"]).await;
        let second = create(&store, dir.path(), &["shared.jpg"]).await;

        service.delete(first.id, 1).await.unwrap();

        assert!(dir.path().join("shared.jpg").exists());
        assert_eq!(store.list_images(second.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_advertisement() {
        let (_dir, _store, service) = setup().await;
        assert_matches!(
            service.delete(404, 1).await,
            Err(AdRelayError::AdvertisementNotFound { advertisement_id: 404 })
        );
    }
}
