//! Internationalization module
//!
//! Operator-facing texts and keyboard labels in Uzbek and English

pub mod loader;

pub use loader::{I18n, TranslationParams};
