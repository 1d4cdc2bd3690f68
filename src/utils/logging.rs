//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the AdRelay application.

use tracing::{info, warn, debug, error};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{AdRelayError, ErrorSeverity, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "adrelay.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| AdRelayError::Config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init()
        .map_err(|e| AdRelayError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log operator actions with structured data
pub fn log_operator_action(operator_id: i64, action: &str, details: Option<&str>) {
    info!(
        operator_id = operator_id,
        action = action,
        details = details,
        "Operator action performed"
    );
}

/// Log group membership events
pub fn log_group_event(chat_id: i64, event: &str, details: Option<&str>) {
    info!(
        chat_id = chat_id,
        event = event,
        details = details,
        "Group event occurred"
    );
}

/// Log advertisement lifecycle actions
pub fn log_advertisement_action(advertisement_id: i64, action: &str, details: Option<&str>) {
    info!(
        advertisement_id = advertisement_id,
        action = action,
        details = details,
        "Advertisement action performed"
    );
}

/// Log the result of a broadcast cycle
pub fn log_broadcast_cycle(advertisement_id: Option<i64>, delivered: usize, pruned: usize) {
    if pruned > 0 {
        warn!(
            advertisement_id = advertisement_id,
            delivered = delivered,
            pruned = pruned,
            "Broadcast cycle finished with pruned groups"
        );
    } else {
        debug!(
            advertisement_id = advertisement_id,
            delivered = delivered,
            "Broadcast cycle finished"
        );
    }
}

/// Log a handler error at the level its severity calls for
pub fn log_error(error: &AdRelayError, context: &str) {
    match error.severity() {
        ErrorSeverity::Info => info!(error = %error, context = context, "Request rejected"),
        ErrorSeverity::Warning => warn!(error = %error, context = context, "Request failed"),
        ErrorSeverity::Error => error!(error = %error, context = context, "Request failed"),
        ErrorSeverity::Critical => error!(error = %error, context = context, critical = true, "Request failed"),
    }
}

/// Log an update no handler wanted, such as an ordinary group message
pub fn log_unhandled_update(update: &impl std::fmt::Debug) {
    debug!(update = ?update, "Unhandled update");
}
