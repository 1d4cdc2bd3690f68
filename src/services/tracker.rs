//! Active advertisement tracker
//!
//! Owns the rule that at most one advertisement is selected for broadcast.
//! Writes go through a single async mutex and then through the store's
//! atomic activation, so two concurrent selections can never both leave
//! their advertisement active.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use crate::database::RecordStore;
use crate::models::Advertisement;
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct ActiveAdTracker {
    store: Arc<dyn RecordStore>,
    write_lock: Arc<Mutex<()>>,
}

impl ActiveAdTracker {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Select `advertisement_id` for broadcast, deselecting the previous one.
    ///
    /// Fails with `AdvertisementNotFound` and changes nothing when the
    /// advertisement does not exist.
    pub async fn activate(&self, advertisement_id: i64) -> Result<Advertisement> {
        let _guard = self.write_lock.lock().await;
        let advertisement = self.store.activate_advertisement(advertisement_id).await?;
        info!(advertisement_id = advertisement_id, "Advertisement selected for broadcast");
        Ok(advertisement)
    }

    /// Deselect whatever is active. Returns whether anything was active.
    pub async fn deactivate(&self) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let cleared = self.store.deactivate_advertisements().await?;
        if cleared > 0 {
            info!("Active advertisement deselected");
        }
        Ok(cleared > 0)
    }

    pub async fn get_active(&self) -> Result<Option<Advertisement>> {
        self.store.find_active_advertisement().await
    }
}
