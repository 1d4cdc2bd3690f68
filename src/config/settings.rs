//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub broadcast: BroadcastConfig,
    pub storage: StorageConfig,
    pub i18n: I18nConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration, used for operator sessions
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Broadcast loop timing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BroadcastConfig {
    /// Pause between two broadcast cycles
    pub interval_seconds: u64,
    /// Pause between two groups inside a cycle
    pub group_delay_ms: u64,
}

impl BroadcastConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn group_delay(&self) -> Duration {
        Duration::from_millis(self.group_delay_ms)
    }
}

/// Image storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub image_dir: String,
}

/// Internationalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct I18nConfig {
    pub default_language: String,
    pub supported_languages: Vec<String>,
    pub translations_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory receiving the daily rolling log files
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables.
    ///
    /// Nested keys use a double underscore, e.g. `ADRELAY_BOT__TOKEN`.
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = Settings::default();

        let settings = config::Config::builder()
            .set_default("bot.token", defaults.bot.token)?
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", defaults.database.max_connections as i64)?
            .set_default("database.min_connections", defaults.database.min_connections as i64)?
            .set_default("redis.url", defaults.redis.url)?
            .set_default("redis.prefix", defaults.redis.prefix)?
            .set_default("redis.ttl_seconds", defaults.redis.ttl_seconds as i64)?
            .set_default("broadcast.interval_seconds", defaults.broadcast.interval_seconds as i64)?
            .set_default("broadcast.group_delay_ms", defaults.broadcast.group_delay_ms as i64)?
            .set_default("storage.image_dir", defaults.storage.image_dir)?
            .set_default("i18n.default_language", defaults.i18n.default_language)?
            .set_default("i18n.supported_languages", defaults.i18n.supported_languages)?
            .set_default("i18n.translations_dir", defaults.i18n.translations_dir)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.file_path", defaults.logging.file_path)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("ADRELAY")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("i18n.supported_languages")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::AdRelayError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/adrelay".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "adrelay:".to_string(),
                ttl_seconds: 86400,
            },
            broadcast: BroadcastConfig {
                interval_seconds: 30,
                group_delay_ms: 50,
            },
            storage: StorageConfig {
                image_dir: "static/images".to_string(),
            },
            i18n: I18nConfig {
                default_language: "uz".to_string(),
                supported_languages: vec!["uz".to_string(), "en".to_string()],
                translations_dir: "translations".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
            },
        }
    }
}
