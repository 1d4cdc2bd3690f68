//! Telegram implementation of the delivery and photo boundaries

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use teloxide::{
    Bot,
    net::Download,
    prelude::*,
    types::{ChatId, InputFile, InputMedia, InputMediaPhoto},
};
use tracing::{debug, warn};
use crate::services::delivery::DeliveryAdapter;
use crate::services::images::PhotoSource;
use crate::utils::errors::{DeliveryResult, Result, Unreachable};

/// Sends advertisements and fetches photos through the Bot API
#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn unreachable(chat_id: ChatId, error: teloxide::RequestError) -> Unreachable {
        warn!(chat_id = chat_id.0, error = %error, "Delivery failed");
        Unreachable::new(chat_id.0, error)
    }
}

#[async_trait]
impl DeliveryAdapter for TelegramGateway {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> DeliveryResult {
        self.bot
            .send_message(chat_id, text)
            .await
            .map(|_| ())
            .map_err(|e| Self::unreachable(chat_id, e))
    }

    async fn send_photo(&self, chat_id: ChatId, image: PathBuf, caption: &str) -> DeliveryResult {
        self.bot
            .send_photo(chat_id, InputFile::file(image))
            .caption(caption)
            .await
            .map(|_| ())
            .map_err(|e| Self::unreachable(chat_id, e))
    }

    async fn send_album(&self, chat_id: ChatId, images: Vec<PathBuf>, first_caption: &str) -> DeliveryResult {
        let media: Vec<InputMedia> = images
            .into_iter()
            .enumerate()
            .map(|(index, path)| {
                let photo = InputMediaPhoto::new(InputFile::file(path));
                if index == 0 {
                    InputMedia::Photo(photo.caption(first_caption))
                } else {
                    InputMedia::Photo(photo)
                }
            })
            .collect();

        debug!(chat_id = chat_id.0, items = media.len(), "Sending album");

        self.bot
            .send_media_group(chat_id, media)
            .await
            .map(|_| ())
            .map_err(|e| Self::unreachable(chat_id, e))
    }
}

#[async_trait]
impl PhotoSource for TelegramGateway {
    async fn download_photo(&self, file_id: &str, destination: &Path) -> Result<()> {
        let file = self.bot.get_file(file_id.to_string()).await?;
        let mut output = tokio::fs::File::create(destination).await?;

        if let Err(e) = self.bot.download_file(&file.path, &mut output).await {
            drop(output);
            let _ = tokio::fs::remove_file(destination).await;
            return Err(e.into());
        }

        Ok(())
    }
}
