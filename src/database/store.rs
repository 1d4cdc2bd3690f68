//! Record store contract
//!
//! Every component reaches persistence through [`RecordStore`]. Two backends
//! implement it: [`DatabaseService`](super::DatabaseService) on PostgreSQL and
//! [`MemoryStore`](super::MemoryStore) in process.
//!
//! Lookups by id return `Ok(None)` when the record is absent. Updates and
//! deletes of an absent record fail with the matching `*NotFound` error.
//! Any backend failure surfaces as `AdRelayError::StoreUnavailable`.

use async_trait::async_trait;
use crate::models::{
    Advertisement, AdvertisementFilter, Group, Image, NewAdvertisement, NewGroup, NewImage,
    UpdateAdvertisementRequest, UpdateGroupRequest, UpdateImageRequest,
};
use crate::utils::errors::Result;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert an advertisement together with its images, atomically.
    /// Images keep the order of `images`.
    async fn create_advertisement(
        &self,
        advertisement: NewAdvertisement,
        images: Vec<NewImage>,
    ) -> Result<Advertisement>;

    async fn get_advertisement(&self, id: i64) -> Result<Option<Advertisement>>;

    /// All advertisements, oldest first
    async fn list_advertisements(&self) -> Result<Vec<Advertisement>>;

    async fn list_advertisements_where(&self, filter: AdvertisementFilter) -> Result<Vec<Advertisement>>;

    async fn update_advertisement(&self, id: i64, request: UpdateAdvertisementRequest) -> Result<Advertisement>;

    /// Delete an advertisement and, by cascade, its image records
    async fn delete_advertisement(&self, id: i64) -> Result<()>;

    /// The advertisement currently selected for broadcast
    async fn find_active_advertisement(&self) -> Result<Option<Advertisement>> {
        Ok(self
            .list_advertisements_where(AdvertisementFilter::active())
            .await?
            .into_iter()
            .next())
    }

    /// Clear every active flag and set it on `id` in one atomic step.
    /// Leaves the store untouched when `id` does not exist.
    async fn activate_advertisement(&self, id: i64) -> Result<Advertisement>;

    /// Clear every active flag, returning how many were cleared
    async fn deactivate_advertisements(&self) -> Result<u64>;

    async fn get_image(&self, id: i64) -> Result<Option<Image>>;

    /// Images of one advertisement in insertion order
    async fn list_images(&self, advertisement_id: i64) -> Result<Vec<Image>>;

    async fn list_all_images(&self) -> Result<Vec<Image>>;

    async fn update_image(&self, id: i64, request: UpdateImageRequest) -> Result<Image>;

    async fn delete_image(&self, id: i64) -> Result<()>;

    /// Insert the group unless a group with the same chat id exists.
    /// Returns the inserted group, or `None` when it was already tracked.
    async fn create_group_if_absent(&self, group: NewGroup) -> Result<Option<Group>>;

    async fn get_group(&self, chat_id: i64) -> Result<Option<Group>>;

    async fn list_groups(&self) -> Result<Vec<Group>>;

    async fn update_group(&self, chat_id: i64, request: UpdateGroupRequest) -> Result<Group>;

    async fn delete_group(&self, chat_id: i64) -> Result<()>;
}
