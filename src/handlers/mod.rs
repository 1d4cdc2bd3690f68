//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for operator commands
//! - Callback handlers for inline keyboard interactions
//! - Message handlers for the wizard and group membership events

pub mod callbacks;
pub mod commands;
pub mod keyboards;
pub mod messages;

pub use callbacks::{handle_callback_query, CallbackAction};
pub use commands::{handle_command, Command};
pub use messages::{handle_left_chat_member, handle_message, handle_my_chat_member, handle_new_chat_members};
