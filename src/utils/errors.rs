//! Error handling for AdRelay
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for AdRelay application
#[derive(Error, Debug)]
pub enum AdRelayError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("File download error: {0}")]
    Download(#[from] teloxide::DownloadError),

    #[error(transparent)]
    Unreachable(#[from] Unreachable),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Advertisement not found: {advertisement_id}")]
    AdvertisementNotFound { advertisement_id: i64 },

    #[error("Group not found: {chat_id}")]
    GroupNotFound { chat_id: i64 },

    #[error("Image not found: {image_id}")]
    ImageNotFound { image_id: i64 },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// A delivery destination refused the message.
///
/// The bot treats this as permanent: the destination is kicked, deleted,
/// blocked or otherwise closed to it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Chat {chat_id} is unreachable: {reason}")]
pub struct Unreachable {
    pub chat_id: i64,
    pub reason: String,
}

impl Unreachable {
    pub fn new(chat_id: i64, reason: impl ToString) -> Self {
        Self {
            chat_id,
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for AdRelay operations
pub type Result<T> = std::result::Result<T, AdRelayError>;

/// Result of a single send to a single destination
pub type DeliveryResult = std::result::Result<(), Unreachable>;

impl AdRelayError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            AdRelayError::StoreUnavailable(_) => true,
            AdRelayError::Migration(_) => false,
            AdRelayError::Telegram(_) => true,
            AdRelayError::Download(_) => true,
            AdRelayError::Unreachable(_) => false,
            AdRelayError::Config(_) => false,
            AdRelayError::AdvertisementNotFound { .. } => false,
            AdRelayError::GroupNotFound { .. } => false,
            AdRelayError::ImageNotFound { .. } => false,
            AdRelayError::InvalidStateTransition { .. } => false,
            AdRelayError::Redis(_) => true,
            AdRelayError::Serialization(_) => false,
            AdRelayError::Io(_) => true,
            AdRelayError::InvalidInput(_) => false,
        }
    }

    /// Whether the error means a referenced record is absent
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AdRelayError::AdvertisementNotFound { .. }
                | AdRelayError::GroupNotFound { .. }
                | AdRelayError::ImageNotFound { .. }
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AdRelayError::StoreUnavailable(_) => ErrorSeverity::Critical,
            AdRelayError::Migration(_) => ErrorSeverity::Critical,
            AdRelayError::Config(_) => ErrorSeverity::Critical,
            AdRelayError::Unreachable(_) => ErrorSeverity::Warning,
            AdRelayError::AdvertisementNotFound { .. } => ErrorSeverity::Info,
            AdRelayError::GroupNotFound { .. } => ErrorSeverity::Info,
            AdRelayError::ImageNotFound { .. } => ErrorSeverity::Info,
            AdRelayError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
