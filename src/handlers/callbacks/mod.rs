//! Callback query handlers module
//!
//! Inline buttons under listed advertisements: `select:<id>` and
//! `delete:<id>`.

use teloxide::{Bot, types::{CallbackQuery, ChatId}, prelude::*};
use tracing::{debug, info, warn};
use crate::utils::errors::{AdRelayError, Result};
use crate::services::ServiceFactory;
use crate::i18n::I18n;
use crate::handlers::keyboards;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Select(i64),
    Delete(i64),
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        let (action, id) = data.split_once(':')?;
        let id = id.parse::<i64>().ok()?;
        match action {
            "select" => Some(Self::Select(id)),
            "delete" => Some(Self::Delete(id)),
            _ => None,
        }
    }

    pub fn to_data(&self) -> String {
        match self {
            Self::Select(id) => format!("select:{}", id),
            Self::Delete(id) => format!("delete:{}", id),
        }
    }
}

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    services: ServiceFactory,
    i18n: I18n,
) -> Result<()> {
    let user_id = query.from.id.0 as i64;
    let lang = i18n.detect_user_language(query.from.language_code.as_deref());
    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(user_id));

    debug!(user_id = user_id, callback_data = ?query.data, "Processing callback query");

    // Answer first to remove the loading state
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = %query.id, "Failed to answer callback query");
    }

    let Some(action) = query.data.as_deref().and_then(CallbackAction::parse) else {
        warn!(user_id = user_id, callback_data = ?query.data, "Unknown callback data");
        return Ok(());
    };

    let reply = match action {
        CallbackAction::Select(id) => match services.tracker.activate(id).await {
            Ok(advertisement) => {
                info!(user_id = user_id, advertisement_id = advertisement.id, "Operator selected advertisement");
                i18n.t_with("ads.selected", &lang, "id", advertisement.id)
            }
            Err(AdRelayError::AdvertisementNotFound { .. }) => i18n.t("ads.not_found", &lang, None),
            Err(e) => return Err(e),
        },
        CallbackAction::Delete(id) => match services.advertisements.delete(id, user_id).await {
            Ok(_) => i18n.t_with("ads.deleted", &lang, "id", id),
            Err(AdRelayError::AdvertisementNotFound { .. }) => i18n.t("ads.not_found", &lang, None),
            Err(e) => return Err(e),
        },
    };

    bot.send_message(chat_id, reply)
        .reply_markup(keyboards::main_menu(&i18n, &lang))
        .await?;
    Ok(())
}
