//! Saves a finished wizard draft as an advertisement
//!
//! Photos are downloaded first. The advertisement and its image records
//! are then created in one store call, so a failed save leaves no partial
//! advertisement behind. Files downloaded for a failed save are removed;
//! files that were already on disk belong to other advertisements and stay.

use std::sync::Arc;
use tracing::{error, warn};
use crate::database::RecordStore;
use crate::models::{Advertisement, NewAdvertisement, NewImage};
use crate::services::images::{ImageStorage, PhotoSource, StoredPhoto};
use crate::state::AdDraft;
use crate::utils::errors::Result;
use crate::utils::logging;

#[derive(Clone)]
pub struct AdComposer {
    store: Arc<dyn RecordStore>,
    images: ImageStorage,
    photos: Arc<dyn PhotoSource>,
}

impl AdComposer {
    pub fn new(store: Arc<dyn RecordStore>, images: ImageStorage, photos: Arc<dyn PhotoSource>) -> Self {
        Self { store, images, photos }
    }

    /// Persist a draft. Returns the new advertisement and its image count.
    pub async fn save(&self, draft: AdDraft, operator_id: i64) -> Result<(Advertisement, usize)> {
        draft.validate()?;

        let mut stored: Vec<StoredPhoto> = Vec::with_capacity(draft.photo_file_ids.len());
        for file_id in &draft.photo_file_ids {
            match self.images.store_photo(self.photos.as_ref(), file_id).await {
                Ok(photo) => stored.push(photo),
                Err(e) => {
                    error!(file_id = %file_id, error = %e, "Photo download failed, draft not saved");
                    self.discard(&stored).await;
                    return Err(e);
                }
            }
        }

        let advertisement = NewAdvertisement {
            body: draft.body.unwrap_or_default().trim().to_string(),
            contact: draft.contact.filter(|c| !c.trim().is_empty()),
        };
        let images: Vec<NewImage> = stored
            .iter()
            .map(|photo| NewImage { file_path: photo.file_name.clone() })
            .collect();

        match self.store.create_advertisement(advertisement, images).await {
            Ok(advertisement) => {
                let operator = operator_id.to_string();
                logging::log_advertisement_action(advertisement.id, "created", Some(&operator));
                Ok((advertisement, stored.len()))
            }
            Err(e) => {
                error!(error = %e, "Failed to save advertisement");
                self.discard(&stored).await;
                Err(e)
            }
        }
    }

    async fn discard(&self, stored: &[StoredPhoto]) {
        for photo in stored.iter().filter(|photo| photo.downloaded) {
            if let Err(e) = self.images.remove(&photo.file_name).await {
                warn!(file = %photo.file_name, error = %e, "Could not remove orphaned image");
            }
        }
    }
}
