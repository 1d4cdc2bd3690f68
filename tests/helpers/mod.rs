//! Test helpers module
//!
//! Stand-ins for the chat platform and the record store, plus a mock Bot
//! API server for the Telegram gateway.

#![allow(dead_code)]

pub mod delivery;
pub mod fixtures;
pub mod telegram_mock;

pub use delivery::*;
pub use fixtures::*;
pub use telegram_mock::*;
