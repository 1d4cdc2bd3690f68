//! Recording delivery adapter
//!
//! Stands in for the chat platform: remembers every successful send and
//! refuses delivery to chats marked unreachable. An optional delay makes
//! every send take a while, like a slow Bot API.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use async_trait::async_trait;
use teloxide::types::ChatId;
use AdRelay::services::DeliveryAdapter;
use AdRelay::utils::errors::{DeliveryResult, Unreachable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text { chat_id: i64, text: String },
    Photo { chat_id: i64, image: PathBuf, caption: String },
    Album { chat_id: i64, images: Vec<PathBuf>, caption: String },
}

impl Sent {
    pub fn chat_id(&self) -> i64 {
        match self {
            Sent::Text { chat_id, .. } | Sent::Photo { chat_id, .. } | Sent::Album { chat_id, .. } => *chat_id,
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingDelivery {
    sent: Mutex<Vec<Sent>>,
    unreachable: Mutex<HashSet<i64>>,
    delay: Option<Duration>,
}

impl RecordingDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unreachable(chat_ids: &[i64]) -> Self {
        let delivery = Self::default();
        delivery.unreachable.lock().unwrap().extend(chat_ids.iter().copied());
        delivery
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay: Some(delay), ..Self::default() }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<Sent> {
        self.sent().into_iter().filter(|s| s.chat_id() == chat_id).collect()
    }

    async fn record(&self, chat_id: ChatId, sent: Sent) -> DeliveryResult {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.unreachable.lock().unwrap().contains(&chat_id.0) {
            return Err(Unreachable::new(chat_id.0, "Forbidden: bot was kicked from the group chat"));
        }
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

#[async_trait]
impl DeliveryAdapter for RecordingDelivery {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> DeliveryResult {
        self.record(chat_id, Sent::Text { chat_id: chat_id.0, text: text.to_string() }).await
    }

    async fn send_photo(&self, chat_id: ChatId, image: PathBuf, caption: &str) -> DeliveryResult {
        self.record(chat_id, Sent::Photo { chat_id: chat_id.0, image, caption: caption.to_string() }).await
    }

    async fn send_album(&self, chat_id: ChatId, images: Vec<PathBuf>, first_caption: &str) -> DeliveryResult {
        self.record(chat_id, Sent::Album { chat_id: chat_id.0, images, caption: first_caption.to_string() }).await
    }
}
