//! Store fixtures, photo sources and polling helpers

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use AdRelay::config::BroadcastConfig;
use AdRelay::database::{MemoryStore, RecordStore};
use AdRelay::models::*;
use AdRelay::services::PhotoSource;
use AdRelay::utils::errors::{AdRelayError, Result};

/// One broadcast cycle per second, no pause between groups
pub fn fast_broadcast() -> BroadcastConfig {
    BroadcastConfig {
        interval_seconds: 1,
        group_delay_ms: 0,
    }
}

pub async fn create_ad(store: &dyn RecordStore, body: &str, contact: Option<&str>, images: &[&str]) -> Advertisement {
    store
        .create_advertisement(
            NewAdvertisement {
                body: body.to_string(),
                contact: contact.map(str::to_string),
            },
            images.iter().map(|f| NewImage { file_path: f.to_string() }).collect(),
        )
        .await
        .unwrap()
}

pub async fn create_group(store: &dyn RecordStore, chat_id: i64) {
    store
        .create_group_if_absent(NewGroup {
            chat_id,
            title: format!("Group {}", chat_id),
            invite_link: None,
        })
        .await
        .unwrap();
}

pub async fn group_ids(store: &dyn RecordStore) -> Vec<i64> {
    store.list_groups().await.unwrap().into_iter().map(|g| g.chat_id).collect()
}

/// Poll `condition` until it holds or `timeout` passes
pub async fn wait_until<F, Fut>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

fn unavailable() -> AdRelayError {
    AdRelayError::StoreUnavailable(sqlx::Error::PoolTimedOut)
}

/// Memory store that fails selected calls a set number of times
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    list_groups_failures: AtomicUsize,
    create_failures: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_list_groups(&self, times: usize) {
        self.list_groups_failures.store(times, Ordering::SeqCst);
    }

    pub fn fail_create(&self, times: usize) {
        self.create_failures.store(times, Ordering::SeqCst);
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn create_advertisement(&self, advertisement: NewAdvertisement, images: Vec<NewImage>) -> Result<Advertisement> {
        if Self::take_failure(&self.create_failures) {
            return Err(unavailable());
        }
        self.inner.create_advertisement(advertisement, images).await
    }

    async fn get_advertisement(&self, id: i64) -> Result<Option<Advertisement>> {
        self.inner.get_advertisement(id).await
    }

    async fn list_advertisements(&self) -> Result<Vec<Advertisement>> {
        self.inner.list_advertisements().await
    }

    async fn list_advertisements_where(&self, filter: AdvertisementFilter) -> Result<Vec<Advertisement>> {
        self.inner.list_advertisements_where(filter).await
    }

    async fn update_advertisement(&self, id: i64, request: UpdateAdvertisementRequest) -> Result<Advertisement> {
        self.inner.update_advertisement(id, request).await
    }

    async fn delete_advertisement(&self, id: i64) -> Result<()> {
        self.inner.delete_advertisement(id).await
    }

    async fn find_active_advertisement(&self) -> Result<Option<Advertisement>> {
        self.inner.find_active_advertisement().await
    }

    async fn activate_advertisement(&self, id: i64) -> Result<Advertisement> {
        self.inner.activate_advertisement(id).await
    }

    async fn deactivate_advertisements(&self) -> Result<u64> {
        self.inner.deactivate_advertisements().await
    }

    async fn get_image(&self, id: i64) -> Result<Option<Image>> {
        self.inner.get_image(id).await
    }

    async fn list_images(&self, advertisement_id: i64) -> Result<Vec<Image>> {
        self.inner.list_images(advertisement_id).await
    }

    async fn list_all_images(&self) -> Result<Vec<Image>> {
        self.inner.list_all_images().await
    }

    async fn update_image(&self, id: i64, request: UpdateImageRequest) -> Result<Image> {
        self.inner.update_image(id, request).await
    }

    async fn delete_image(&self, id: i64) -> Result<()> {
        self.inner.delete_image(id).await
    }

    async fn create_group_if_absent(&self, group: NewGroup) -> Result<Option<Group>> {
        self.inner.create_group_if_absent(group).await
    }

    async fn get_group(&self, chat_id: i64) -> Result<Option<Group>> {
        self.inner.get_group(chat_id).await
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        if Self::take_failure(&self.list_groups_failures) {
            return Err(unavailable());
        }
        self.inner.list_groups().await
    }

    async fn update_group(&self, chat_id: i64, request: UpdateGroupRequest) -> Result<Group> {
        self.inner.update_group(chat_id, request).await
    }

    async fn delete_group(&self, chat_id: i64) -> Result<()> {
        self.inner.delete_group(chat_id).await
    }
}

/// Writes the file id as the photo content; fails for listed ids
#[derive(Debug, Default)]
pub struct FakePhotos {
    failing: Vec<String>,
    pub downloads: AtomicUsize,
}

impl FakePhotos {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_on(file_id: &str) -> Arc<Self> {
        Arc::new(Self {
            failing: vec![file_id.to_string()],
            downloads: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PhotoSource for FakePhotos {
    async fn download_photo(&self, file_id: &str, destination: &Path) -> Result<()> {
        if self.failing.iter().any(|f| f == file_id) {
            return Err(AdRelayError::InvalidInput(format!("file {} is gone", file_id)));
        }
        tokio::fs::write(destination, file_id.as_bytes()).await?;
        self.downloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
