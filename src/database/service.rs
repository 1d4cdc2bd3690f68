//! Database service layer
//!
//! This module provides the PostgreSQL implementation of the record store

use async_trait::async_trait;
use crate::database::{DatabasePool, AdvertisementRepository, ImageRepository, GroupRepository, RecordStore};
use crate::models::*;
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct DatabaseService {
    pub advertisements: AdvertisementRepository,
    pub images: ImageRepository,
    pub groups: GroupRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            advertisements: AdvertisementRepository::new(pool.clone()),
            images: ImageRepository::new(pool.clone()),
            groups: GroupRepository::new(pool),
        }
    }
}

impl std::fmt::Debug for DatabaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseService").finish_non_exhaustive()
    }
}

#[async_trait]
impl RecordStore for DatabaseService {
    async fn create_advertisement(&self, advertisement: NewAdvertisement, images: Vec<NewImage>) -> Result<Advertisement> {
        self.advertisements.create(advertisement, images).await
    }

    async fn get_advertisement(&self, id: i64) -> Result<Option<Advertisement>> {
        self.advertisements.find_by_id(id).await
    }

    async fn list_advertisements(&self) -> Result<Vec<Advertisement>> {
        self.advertisements.list().await
    }

    async fn list_advertisements_where(&self, filter: AdvertisementFilter) -> Result<Vec<Advertisement>> {
        self.advertisements.list_where(filter).await
    }

    async fn update_advertisement(&self, id: i64, request: UpdateAdvertisementRequest) -> Result<Advertisement> {
        self.advertisements.update(id, request).await
    }

    async fn delete_advertisement(&self, id: i64) -> Result<()> {
        self.advertisements.delete(id).await
    }

    async fn activate_advertisement(&self, id: i64) -> Result<Advertisement> {
        self.advertisements.activate(id).await
    }

    async fn deactivate_advertisements(&self) -> Result<u64> {
        self.advertisements.deactivate_all().await
    }

    async fn get_image(&self, id: i64) -> Result<Option<Image>> {
        self.images.find_by_id(id).await
    }

    async fn list_images(&self, advertisement_id: i64) -> Result<Vec<Image>> {
        self.images.list_for_advertisement(advertisement_id).await
    }

    async fn list_all_images(&self) -> Result<Vec<Image>> {
        self.images.list().await
    }

    async fn update_image(&self, id: i64, request: UpdateImageRequest) -> Result<Image> {
        self.images.update(id, request).await
    }

    async fn delete_image(&self, id: i64) -> Result<()> {
        self.images.delete(id).await
    }

    async fn create_group_if_absent(&self, group: NewGroup) -> Result<Option<Group>> {
        self.groups.create_if_absent(group).await
    }

    async fn get_group(&self, chat_id: i64) -> Result<Option<Group>> {
        self.groups.find_by_chat_id(chat_id).await
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        self.groups.list().await
    }

    async fn update_group(&self, chat_id: i64, request: UpdateGroupRequest) -> Result<Group> {
        self.groups.update(chat_id, request).await
    }

    async fn delete_group(&self, chat_id: i64) -> Result<()> {
        self.groups.delete(chat_id).await
    }
}
