//! In-process record store
//!
//! Keeps every table in memory behind one lock. Used by the test suite and
//! for dry runs without PostgreSQL; nothing survives a restart.

use std::collections::BTreeMap;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use crate::database::RecordStore;
use crate::models::*;
use crate::utils::errors::{AdRelayError, Result};

#[derive(Debug, Default)]
struct Tables {
    next_advertisement_id: i64,
    next_image_id: i64,
    advertisements: BTreeMap<i64, Advertisement>,
    images: BTreeMap<i64, Image>,
    groups: Vec<Group>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_advertisement(&self, advertisement: NewAdvertisement, images: Vec<NewImage>) -> Result<Advertisement> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        tables.next_advertisement_id += 1;
        let record = Advertisement {
            id: tables.next_advertisement_id,
            body: advertisement.body,
            contact: advertisement.contact,
            active: false,
            created_at: now,
        };
        tables.advertisements.insert(record.id, record.clone());

        for (index, image) in images.into_iter().enumerate() {
            tables.next_image_id += 1;
            let id = tables.next_image_id;
            tables.images.insert(id, Image {
                id,
                advertisement_id: record.id,
                file_path: image.file_path,
                sort_order: index as i32,
                created_at: now,
            });
        }

        Ok(record)
    }

    async fn get_advertisement(&self, id: i64) -> Result<Option<Advertisement>> {
        Ok(self.tables.read().await.advertisements.get(&id).cloned())
    }

    async fn list_advertisements(&self) -> Result<Vec<Advertisement>> {
        self.list_advertisements_where(AdvertisementFilter::default()).await
    }

    async fn list_advertisements_where(&self, filter: AdvertisementFilter) -> Result<Vec<Advertisement>> {
        let tables = self.tables.read().await;
        Ok(tables
            .advertisements
            .values()
            .filter(|ad| filter.matches(ad))
            .cloned()
            .collect())
    }

    async fn update_advertisement(&self, id: i64, request: UpdateAdvertisementRequest) -> Result<Advertisement> {
        let mut tables = self.tables.write().await;
        let advertisement = tables
            .advertisements
            .get_mut(&id)
            .ok_or(AdRelayError::AdvertisementNotFound { advertisement_id: id })?;

        if let Some(body) = request.body {
            advertisement.body = body;
        }
        if let Some(contact) = request.contact {
            advertisement.contact = Some(contact);
        }

        Ok(advertisement.clone())
    }

    async fn delete_advertisement(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.advertisements.remove(&id).is_none() {
            return Err(AdRelayError::AdvertisementNotFound { advertisement_id: id });
        }
        tables.images.retain(|_, image| image.advertisement_id != id);
        Ok(())
    }

    async fn activate_advertisement(&self, id: i64) -> Result<Advertisement> {
        let mut tables = self.tables.write().await;
        if !tables.advertisements.contains_key(&id) {
            return Err(AdRelayError::AdvertisementNotFound { advertisement_id: id });
        }

        for advertisement in tables.advertisements.values_mut() {
            advertisement.active = advertisement.id == id;
        }

        Ok(tables.advertisements[&id].clone())
    }

    async fn deactivate_advertisements(&self) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let mut cleared = 0;
        for advertisement in tables.advertisements.values_mut().filter(|ad| ad.active) {
            advertisement.active = false;
            cleared += 1;
        }
        Ok(cleared)
    }

    async fn get_image(&self, id: i64) -> Result<Option<Image>> {
        Ok(self.tables.read().await.images.get(&id).cloned())
    }

    async fn list_images(&self, advertisement_id: i64) -> Result<Vec<Image>> {
        let tables = self.tables.read().await;
        let mut images: Vec<Image> = tables
            .images
            .values()
            .filter(|image| image.advertisement_id == advertisement_id)
            .cloned()
            .collect();
        images.sort_by_key(|image| (image.sort_order, image.id));
        Ok(images)
    }

    async fn list_all_images(&self) -> Result<Vec<Image>> {
        Ok(self.tables.read().await.images.values().cloned().collect())
    }

    async fn update_image(&self, id: i64, request: UpdateImageRequest) -> Result<Image> {
        let mut tables = self.tables.write().await;
        let image = tables
            .images
            .get_mut(&id)
            .ok_or(AdRelayError::ImageNotFound { image_id: id })?;
        image.file_path = request.file_path;
        Ok(image.clone())
    }

    async fn delete_image(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .images
            .remove(&id)
            .map(|_| ())
            .ok_or(AdRelayError::ImageNotFound { image_id: id })
    }

    async fn create_group_if_absent(&self, group: NewGroup) -> Result<Option<Group>> {
        let mut tables = self.tables.write().await;
        if tables.groups.iter().any(|g| g.chat_id == group.chat_id) {
            return Ok(None);
        }

        let record = Group {
            chat_id: group.chat_id,
            title: group.title,
            invite_link: group.invite_link,
            created_at: Utc::now(),
        };
        tables.groups.push(record.clone());
        Ok(Some(record))
    }

    async fn get_group(&self, chat_id: i64) -> Result<Option<Group>> {
        let tables = self.tables.read().await;
        Ok(tables.groups.iter().find(|g| g.chat_id == chat_id).cloned())
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        Ok(self.tables.read().await.groups.clone())
    }

    async fn update_group(&self, chat_id: i64, request: UpdateGroupRequest) -> Result<Group> {
        let mut tables = self.tables.write().await;
        let group = tables
            .groups
            .iter_mut()
            .find(|g| g.chat_id == chat_id)
            .ok_or(AdRelayError::GroupNotFound { chat_id })?;

        if let Some(title) = request.title {
            group.title = title;
        }
        if let Some(invite_link) = request.invite_link {
            group.invite_link = Some(invite_link);
        }

        Ok(group.clone())
    }

    async fn delete_group(&self, chat_id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.groups.len();
        tables.groups.retain(|g| g.chat_id != chat_id);
        if tables.groups.len() == before {
            return Err(AdRelayError::GroupNotFound { chat_id });
        }
        Ok(())
    }
}
