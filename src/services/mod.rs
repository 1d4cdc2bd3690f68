//! Services module
//!
//! This module contains business logic services

pub mod advertisement;
pub mod broadcast;
pub mod composer;
pub mod delivery;
pub mod images;
pub mod membership;
pub mod telegram;
pub mod tracker;

// Re-export commonly used services
pub use advertisement::AdvertisementService;
pub use broadcast::{BroadcastEngine, CycleReport, EngineState, StartOutcome, StopOutcome};
pub use composer::AdComposer;
pub use delivery::{AdPayload, DeliveryAdapter, MAX_ALBUM_SIZE};
pub use images::{ImageStorage, PhotoSource, StoredPhoto};
pub use membership::{GroupWatcher, JoinOutcome, MembersAdded};
pub use telegram::TelegramGateway;
pub use tracker::ActiveAdTracker;

use std::sync::Arc;
use teloxide::types::UserId;
use crate::config::settings::Settings;
use crate::database::RecordStore;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub store: Arc<dyn RecordStore>,
    pub images: ImageStorage,
    pub delivery: Arc<dyn DeliveryAdapter>,
    pub tracker: ActiveAdTracker,
    pub engine: BroadcastEngine,
    pub watcher: GroupWatcher,
    pub composer: AdComposer,
    pub advertisements: AdvertisementService,
}

impl ServiceFactory {
    /// Wire every service over one store and one platform gateway
    pub fn new(
        settings: &Settings,
        bot_id: UserId,
        store: Arc<dyn RecordStore>,
        gateway: TelegramGateway,
    ) -> Self {
        let gateway = Arc::new(gateway);
        let delivery: Arc<dyn DeliveryAdapter> = gateway.clone();
        let photos: Arc<dyn PhotoSource> = gateway;
        Self::with_adapters(settings, bot_id, store, delivery, photos)
    }

    /// Same as [`ServiceFactory::new`] with explicit adapters
    pub fn with_adapters(
        settings: &Settings,
        bot_id: UserId,
        store: Arc<dyn RecordStore>,
        delivery: Arc<dyn DeliveryAdapter>,
        photos: Arc<dyn PhotoSource>,
    ) -> Self {
        let images = ImageStorage::new(&settings.storage.image_dir);

        let tracker = ActiveAdTracker::new(store.clone());
        let engine = BroadcastEngine::new(store.clone(), delivery.clone(), images.clone(), &settings.broadcast);
        let watcher = GroupWatcher::new(bot_id, store.clone(), delivery.clone(), images.clone());
        let composer = AdComposer::new(store.clone(), images.clone(), photos);
        let advertisements = AdvertisementService::new(store.clone(), images.clone());

        Self {
            store,
            images,
            delivery,
            tracker,
            engine,
            watcher,
            composer,
            advertisements,
        }
    }
}
