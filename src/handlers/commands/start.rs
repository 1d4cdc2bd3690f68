//! Start and help command handlers

use teloxide::{Bot, types::Message, prelude::*};
use tracing::debug;
use crate::utils::errors::Result;
use crate::i18n::I18n;
use crate::handlers::keyboards;
use super::operator_language;

/// Handle /start command - show the main menu
pub async fn handle_start(bot: Bot, msg: Message, i18n: I18n) -> Result<()> {
    let lang = operator_language(&msg, &i18n);
    debug!(chat_id = ?msg.chat.id, lang = %lang, "Processing /start command");

    bot.send_message(msg.chat.id, i18n.t("commands.welcome", &lang, None))
        .reply_markup(keyboards::main_menu(&i18n, &lang))
        .await?;
    Ok(())
}

/// Handle /help command
pub async fn handle_help(bot: Bot, msg: Message, i18n: I18n) -> Result<()> {
    let lang = operator_language(&msg, &i18n);
    bot.send_message(msg.chat.id, i18n.t("commands.help", &lang, None)).await?;
    Ok(())
}
