//! Message handlers module
//!
//! Private messages from operators: menu buttons, then wizard input.
//! Group service messages are handled in [`membership`].

pub mod membership;
pub mod wizard;

use teloxide::{Bot, types::Message, prelude::*};
use tracing::debug;
use crate::utils::errors::Result;
use crate::services::ServiceFactory;
use crate::state::StateStorage;
use crate::i18n::I18n;
use crate::handlers::commands::{self, operator_id, operator_language, Command};
use crate::handlers::keyboards;
use wizard::WizardButton;

pub use membership::{handle_left_chat_member, handle_my_chat_member, handle_new_chat_members};

/// Handle incoming private messages
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    state_storage: StateStorage,
    i18n: I18n,
) -> Result<()> {
    if !msg.chat.is_private() {
        return Ok(());
    }

    let user_id = operator_id(&msg)?;
    debug!(user_id = user_id, "Processing message");

    if let Some(key) = msg.text().and_then(|text| i18n.match_button(text)) {
        if let Some(cmd) = Command::from_button(&key) {
            return commands::handle_command(bot, msg, cmd, services, state_storage, i18n).await;
        }
        if let Some(button) = WizardButton::from_key(&key) {
            return wizard::handle_button(bot, msg, button, services, state_storage, i18n).await;
        }
    }

    match state_storage.load_context(user_id).await? {
        Some(context) if context.is_composing() => {
            wizard::handle_input(bot, msg, context, state_storage, i18n).await
        }
        _ => handle_regular_message(bot, msg, i18n).await,
    }
}

/// Outside the wizard, answer with the main menu
async fn handle_regular_message(bot: Bot, msg: Message, i18n: I18n) -> Result<()> {
    let lang = operator_language(&msg, &i18n);
    bot.send_message(msg.chat.id, i18n.t("commands.help", &lang, None))
        .reply_markup(keyboards::main_menu(&i18n, &lang))
        .await?;
    Ok(())
}
