//! AdRelay Telegram Bot
//!
//! Broadcasts one operator-selected advertisement to every group the bot
//! belongs to, on a fixed interval. Groups that refuse delivery are
//! forgotten. Operators compose advertisements through a chat wizard.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod database;
pub mod state;
pub mod i18n;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{AdRelayError, Result};

// Re-export main components for easy access
pub use database::{DatabaseService, MemoryStore, RecordStore};
pub use services::ServiceFactory;
pub use state::StateStorage;
pub use i18n::I18n;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
