//! Group membership watcher
//!
//! Registers groups the bot is added to and sends them the active
//! advertisement straight away, outside the periodic loop. Groups the bot is
//! removed from are forgotten.

use std::sync::Arc;
use teloxide::types::{ChatId, UserId};
use tracing::{debug, info, warn};
use crate::database::RecordStore;
use crate::models::NewGroup;
use crate::services::delivery::{AdPayload, DeliveryAdapter};
use crate::services::images::ImageStorage;
use crate::utils::errors::Result;
use crate::utils::logging;

/// Members were added to a group chat
#[derive(Debug, Clone)]
pub struct MembersAdded {
    pub chat_id: i64,
    pub title: String,
    pub invite_link: Option<String>,
    pub added_user_ids: Vec<UserId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The event was about somebody else
    Ignored,
    /// The group was already known; nothing was sent
    AlreadyTracked,
    /// The group was registered. `delivered` tells whether the active
    /// advertisement reached it.
    Registered { delivered: bool },
}

#[derive(Clone)]
pub struct GroupWatcher {
    bot_id: UserId,
    store: Arc<dyn RecordStore>,
    delivery: Arc<dyn DeliveryAdapter>,
    images: ImageStorage,
}

impl GroupWatcher {
    pub fn new(
        bot_id: UserId,
        store: Arc<dyn RecordStore>,
        delivery: Arc<dyn DeliveryAdapter>,
        images: ImageStorage,
    ) -> Self {
        Self { bot_id, store, delivery, images }
    }

    pub fn bot_id(&self) -> UserId {
        self.bot_id
    }

    /// React to new members in a group
    pub async fn handle_members_added(&self, event: MembersAdded) -> Result<JoinOutcome> {
        if !event.added_user_ids.contains(&self.bot_id) {
            debug!(chat_id = event.chat_id, "Members added, bot not among them");
            return Ok(JoinOutcome::Ignored);
        }

        let chat_id = event.chat_id;
        let group = NewGroup {
            chat_id,
            title: event.title,
            invite_link: event.invite_link,
        };

        if self.store.create_group_if_absent(group).await?.is_none() {
            debug!(chat_id = chat_id, "Bot re-added to a tracked group");
            return Ok(JoinOutcome::AlreadyTracked);
        }

        logging::log_group_event(chat_id, "registered", None);

        let delivered = self.deliver_active(chat_id).await?;
        Ok(JoinOutcome::Registered { delivered })
    }

    /// Forget a group after the bot left it. Returns whether it was tracked.
    pub async fn handle_bot_removed(&self, chat_id: i64) -> Result<bool> {
        match self.store.delete_group(chat_id).await {
            Ok(()) => {
                logging::log_group_event(chat_id, "removed", None);
                Ok(true)
            }
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// One-shot delivery of the active advertisement. Not retried on failure.
    async fn deliver_active(&self, chat_id: i64) -> Result<bool> {
        let Some(advertisement) = self.store.find_active_advertisement().await? else {
            info!(chat_id = chat_id, "No active advertisement for the new group");
            return Ok(false);
        };

        let payload = AdPayload::load(self.store.as_ref(), &self.images, &advertisement).await?;
        match payload.deliver(self.delivery.as_ref(), ChatId(chat_id)).await {
            Ok(()) => {
                info!(chat_id = chat_id, advertisement_id = advertisement.id, "Active advertisement sent to new group");
                Ok(true)
            }
            Err(unreachable) => {
                warn!(chat_id = chat_id, reason = %unreachable.reason, "New group rejected the advertisement");
                Ok(false)
            }
        }
    }
}
