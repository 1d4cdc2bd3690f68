//! Advertisement list

use teloxide::{Bot, types::Message, prelude::*};
use tracing::{debug, warn};
use crate::utils::errors::Result;
use crate::services::{AdPayload, ServiceFactory};
use crate::i18n::I18n;
use crate::handlers::keyboards;
use crate::utils::helpers::{format_timestamp, truncate_text};
use super::operator_language;

/// Handle /ads - preview every advertisement the way groups will see it,
/// followed by its Select/Delete buttons
pub async fn handle_list(bot: Bot, msg: Message, services: ServiceFactory, i18n: I18n) -> Result<()> {
    let lang = operator_language(&msg, &i18n);
    let chat_id = msg.chat.id;

    let advertisements = services.advertisements.list().await?;
    debug!(chat_id = ?chat_id, count = advertisements.len(), "Listing advertisements");

    if advertisements.is_empty() {
        bot.send_message(chat_id, i18n.t("ads.empty", &lang, None)).await?;
        return Ok(());
    }

    bot.send_message(chat_id, i18n.t_with("ads.listed", &lang, "count", advertisements.len()))
        .await?;

    for advertisement in &advertisements {
        let payload = AdPayload::load(services.store.as_ref(), &services.images, advertisement).await?;
        if let Err(unreachable) = payload.deliver(services.delivery.as_ref(), chat_id).await {
            warn!(advertisement_id = advertisement.id, reason = %unreachable.reason, "Preview failed");
        }

        let mut label = format!("#{} {}", advertisement.id, format_timestamp(advertisement.created_at));
        if advertisement.active {
            label.push_str(&format!(" ({})", i18n.t("ads.active_marker", &lang, None)));
        }
        label.push('\n');
        label.push_str(&truncate_text(&advertisement.body, 60));

        bot.send_message(chat_id, label)
            .reply_markup(keyboards::advertisement_actions(&i18n, &lang, advertisement.id))
            .await?;
    }

    Ok(())
}
