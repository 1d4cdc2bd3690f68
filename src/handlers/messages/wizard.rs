//! Composition wizard handlers
//!
//! The operator opens the wizard, fills body, photos and contact in any
//! order from the wizard menu, then saves or cancels. Progress is kept in
//! the operator's session until saved.

use teloxide::{Bot, types::Message, prelude::*};
use tracing::{debug, error, info};
use crate::utils::errors::{AdRelayError, Result};
use crate::services::ServiceFactory;
use crate::state::{ConversationContext, StateStorage, WizardStep};
use crate::i18n::I18n;
use crate::handlers::commands::{operator_id, operator_language};
use crate::handlers::keyboards;

/// Wizard action behind a wizard-menu button key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardButton {
    Field(WizardStep),
    Save,
}

impl WizardButton {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "body" => Some(Self::Field(WizardStep::AwaitingBody)),
            "image" => Some(Self::Field(WizardStep::AwaitingImage)),
            "contact" => Some(Self::Field(WizardStep::AwaitingContact)),
            "save" => Some(Self::Save),
            _ => None,
        }
    }
}

async fn load_or_new(state_storage: &StateStorage, user_id: i64) -> Result<ConversationContext> {
    Ok(state_storage
        .load_context(user_id)
        .await?
        .unwrap_or_else(|| ConversationContext::new(user_id)))
}

/// Handle /new - open the wizard with an empty draft
pub async fn handle_begin(bot: Bot, msg: Message, state_storage: StateStorage, i18n: I18n) -> Result<()> {
    let user_id = operator_id(&msg)?;
    let lang = operator_language(&msg, &i18n);

    let mut context = load_or_new(&state_storage, user_id).await?;
    context.begin_composition();
    state_storage.save_context(&context).await?;

    info!(user_id = user_id, "Composition started");
    bot.send_message(msg.chat.id, i18n.t("wizard.started", &lang, None))
        .reply_markup(keyboards::wizard_menu(&i18n, &lang))
        .await?;
    Ok(())
}

/// Handle /cancel - drop the draft
pub async fn handle_cancel(bot: Bot, msg: Message, state_storage: StateStorage, i18n: I18n) -> Result<()> {
    let user_id = operator_id(&msg)?;
    let lang = operator_language(&msg, &i18n);

    if let Some(mut context) = state_storage.load_context(user_id).await? {
        context.cancel();
        state_storage.delete_context(user_id).await?;
        debug!(user_id = user_id, "Composition cancelled");
    }

    bot.send_message(msg.chat.id, i18n.t("wizard.cancelled", &lang, None))
        .reply_markup(keyboards::main_menu(&i18n, &lang))
        .await?;
    Ok(())
}

/// Handle a wizard-menu button
pub async fn handle_button(
    bot: Bot,
    msg: Message,
    button: WizardButton,
    services: ServiceFactory,
    state_storage: StateStorage,
    i18n: I18n,
) -> Result<()> {
    let user_id = operator_id(&msg)?;
    let lang = operator_language(&msg, &i18n);

    let mut context = load_or_new(&state_storage, user_id).await?;
    if !context.is_composing() {
        bot.send_message(msg.chat.id, i18n.t("wizard.not_composing", &lang, None))
            .reply_markup(keyboards::main_menu(&i18n, &lang))
            .await?;
        return Ok(());
    }

    match button {
        WizardButton::Field(step) => {
            context.await_input(step)?;
            state_storage.save_context(&context).await?;

            let prompt = match step {
                WizardStep::AwaitingBody => "wizard.ask_body",
                WizardStep::AwaitingImage => "wizard.ask_image",
                _ => "wizard.ask_contact",
            };
            bot.send_message(msg.chat.id, i18n.t(prompt, &lang, None)).await?;
            Ok(())
        }
        WizardButton::Save => save(bot, msg, context, services, state_storage, i18n, &lang).await,
    }
}

async fn save(
    bot: Bot,
    msg: Message,
    mut context: ConversationContext,
    services: ServiceFactory,
    state_storage: StateStorage,
    i18n: I18n,
    lang: &str,
) -> Result<()> {
    let user_id = context.user_id;

    match services.composer.save(context.draft.clone(), user_id).await {
        Ok((advertisement, image_count)) => {
            context.finish();
            state_storage.delete_context(user_id).await?;

            info!(user_id = user_id, advertisement_id = advertisement.id, images = image_count, "Advertisement saved");
            bot.send_message(msg.chat.id, i18n.t_with("wizard.saved", lang, "id", advertisement.id))
                .reply_markup(keyboards::main_menu(&i18n, lang))
                .await?;
        }
        Err(AdRelayError::InvalidInput(reason)) => {
            // The draft stays so the operator can fix it
            bot.send_message(msg.chat.id, i18n.t_with("wizard.invalid", lang, "reason", reason))
                .await?;
        }
        Err(e) => {
            error!(user_id = user_id, error = %e, "Failed to save advertisement");
            bot.send_message(msg.chat.id, i18n.t("wizard.save_failed", lang, None)).await?;
        }
    }

    Ok(())
}

/// File id of the largest rendition of a photo message
pub fn photo_file_id(msg: &Message) -> Option<&str> {
    msg.photo()?.last().map(|photo| photo.file.id.as_str())
}

/// Handle text or a photo while the wizard waits for input
pub async fn handle_input(
    bot: Bot,
    msg: Message,
    mut context: ConversationContext,
    state_storage: StateStorage,
    i18n: I18n,
) -> Result<()> {
    let lang = operator_language(&msg, &i18n);

    let reply = match (context.step, photo_file_id(&msg), msg.text()) {
        (Some(WizardStep::AwaitingImage), Some(file_id), _) => {
            match context.accept_photo(file_id) {
                Ok(count) => i18n.t_with("wizard.photo_added", &lang, "count", count),
                Err(AdRelayError::InvalidInput(_)) => i18n.t("wizard.too_many_photos", &lang, None),
                Err(e) => return Err(e),
            }
        }
        (Some(WizardStep::AwaitingBody | WizardStep::AwaitingContact), _, Some(text)) => {
            context.accept_text(text)?;
            i18n.t("wizard.accepted", &lang, None)
        }
        (step, _, _) => {
            debug!(user_id = context.user_id, step = ?step, "Input not expected at this step");
            bot.send_message(msg.chat.id, i18n.t("wizard.started", &lang, None))
                .reply_markup(keyboards::wizard_menu(&i18n, &lang))
                .await?;
            return Ok(());
        }
    };

    state_storage.save_context(&context).await?;
    bot.send_message(msg.chat.id, reply)
        .reply_markup(keyboards::wizard_menu(&i18n, &lang))
        .await?;
    Ok(())
}
