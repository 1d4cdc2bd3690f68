//! Operator session state
//!
//! Wizard progress and the draft advertisement, kept per operator in Redis

pub mod context;
pub mod storage;

pub use context::{AdDraft, ConversationContext, WizardStep};
pub use storage::StateStorage;
