//! Advertisement delivery
//!
//! [`DeliveryAdapter`] is the boundary to the chat platform. [`AdPayload`]
//! decides how an advertisement travels: an album when it has two or more
//! images, a single captioned photo for one image, plain text otherwise.
//! The same payload is used by the broadcast loop and by the one-shot
//! delivery to a newly joined group.

use std::path::PathBuf;
use async_trait::async_trait;
use teloxide::types::ChatId;
use tracing::{debug, warn};
use crate::database::RecordStore;
use crate::models::{Advertisement, Image};
use crate::services::images::ImageStorage;
use crate::utils::errors::{DeliveryResult, Result};

/// Telegram accepts at most this many items in one media group
pub const MAX_ALBUM_SIZE: usize = 10;

#[async_trait]
pub trait DeliveryAdapter: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> DeliveryResult;

    async fn send_photo(&self, chat_id: ChatId, image: PathBuf, caption: &str) -> DeliveryResult;

    /// Send photos as one album; only the first item carries `first_caption`
    async fn send_album(&self, chat_id: ChatId, images: Vec<PathBuf>, first_caption: &str) -> DeliveryResult;
}

/// What gets sent for one advertisement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdPayload {
    Text { text: String },
    Photo { image: PathBuf, caption: String },
    Album { images: Vec<PathBuf>, caption: String },
}

impl AdPayload {
    /// Pick the payload shape from the number of images
    pub fn build(advertisement: &Advertisement, images: Vec<PathBuf>) -> Self {
        let caption = advertisement.caption();
        let mut images = images;

        match images.len() {
            0 => AdPayload::Text { text: caption },
            1 => AdPayload::Photo { image: images.remove(0), caption },
            count => {
                if count > MAX_ALBUM_SIZE {
                    warn!(
                        advertisement_id = advertisement.id,
                        images = count,
                        "Advertisement has more images than an album holds, extra images are skipped"
                    );
                    images.truncate(MAX_ALBUM_SIZE);
                }
                AdPayload::Album { images, caption }
            }
        }
    }

    /// Load the advertisement's images and build its payload.
    ///
    /// Images whose file is missing from disk are left out.
    pub async fn load(
        store: &dyn RecordStore,
        storage: &ImageStorage,
        advertisement: &Advertisement,
    ) -> Result<Self> {
        let records = store.list_images(advertisement.id).await?;
        let paths = existing_paths(storage, advertisement.id, &records).await;
        Ok(Self::build(advertisement, paths))
    }

    /// Send the payload to one destination
    pub async fn deliver(&self, adapter: &dyn DeliveryAdapter, chat_id: ChatId) -> DeliveryResult {
        debug!(chat_id = chat_id.0, kind = self.kind(), "Delivering advertisement");
        match self {
            AdPayload::Text { text } => adapter.send_text(chat_id, text).await,
            AdPayload::Photo { image, caption } => adapter.send_photo(chat_id, image.clone(), caption).await,
            AdPayload::Album { images, caption } => adapter.send_album(chat_id, images.clone(), caption).await,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AdPayload::Text { .. } => "text",
            AdPayload::Photo { .. } => "photo",
            AdPayload::Album { .. } => "album",
        }
    }
}

async fn existing_paths(storage: &ImageStorage, advertisement_id: i64, records: &[Image]) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(records.len());
    for image in records {
        let path = storage.path_for(&image.file_path);
        if storage.exists(&image.file_path).await {
            paths.push(path);
        } else {
            warn!(
                advertisement_id = advertisement_id,
                image_id = image.id,
                path = %path.display(),
                "Image file is missing, skipping it"
            );
        }
    }
    paths
}
