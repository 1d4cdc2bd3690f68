//! Command handlers module
//!
//! Operator commands. Every command has a reply-keyboard button with the
//! same effect, see [`Command::from_button`].

pub mod ads;
pub mod broadcast;
pub mod start;

use teloxide::{Bot, types::Message, utils::command::BotCommands};
use crate::utils::errors::Result;
use crate::services::ServiceFactory;
use crate::state::StateStorage;
use crate::i18n::I18n;
use crate::handlers::messages::wizard;

/// All available bot commands
#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "AdRelay commands:")]
pub enum Command {
    #[command(description = "Show the main menu")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "List advertisements")]
    Ads,
    #[command(description = "Compose a new advertisement")]
    New,
    #[command(description = "Start sending the active advertisement to groups")]
    Broadcast,
    #[command(description = "Stop sending")]
    Stop,
    #[command(description = "Show broadcast status")]
    Status,
    #[command(description = "Cancel the advertisement being composed")]
    Cancel,
}

impl Command {
    /// Command behind a main-menu button key
    pub fn from_button(key: &str) -> Option<Self> {
        match key {
            "ads" => Some(Self::Ads),
            "new_ad" => Some(Self::New),
            "broadcast" => Some(Self::Broadcast),
            "stop" => Some(Self::Stop),
            "status" => Some(Self::Status),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: ServiceFactory,
    state_storage: StateStorage,
    i18n: I18n,
) -> Result<()> {
    match cmd {
        Command::Start => start::handle_start(bot, msg, i18n).await,
        Command::Help => start::handle_help(bot, msg, i18n).await,
        Command::Ads => ads::handle_list(bot, msg, services, i18n).await,
        Command::New => wizard::handle_begin(bot, msg, state_storage, i18n).await,
        Command::Broadcast => broadcast::handle_start_broadcast(bot, msg, services, i18n).await,
        Command::Stop => broadcast::handle_stop_broadcast(bot, msg, services, i18n).await,
        Command::Status => broadcast::handle_status(bot, msg, services, i18n).await,
        Command::Cancel => wizard::handle_cancel(bot, msg, state_storage, i18n).await,
    }
}

/// Language for replies to the sender of `msg`
pub fn operator_language(msg: &Message, i18n: &I18n) -> String {
    i18n.detect_user_language(msg.from.as_ref().and_then(|u| u.language_code.as_deref()))
}

/// Id of the operator who sent `msg`
pub fn operator_id(msg: &Message) -> Result<i64> {
    msg.from
        .as_ref()
        .map(|user| user.id.0 as i64)
        .ok_or_else(|| crate::utils::errors::AdRelayError::InvalidInput("No user in message".to_string()))
}
