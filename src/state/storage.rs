//! State storage implementation
//! 
//! Operator wizard sessions live in Redis as JSON, one key per operator,
//! with a TTL so abandoned drafts disappear on their own.

use redis::AsyncCommands;
use tracing::{debug, warn, error};
use crate::utils::errors::Result;
use crate::config::RedisConfig;
use super::context::ConversationContext;

/// Redis-based state storage manager
#[derive(Clone)]
pub struct StateStorage {
    /// Redis connection manager
    connection_manager: redis::aio::ConnectionManager,
    /// Redis configuration
    config: RedisConfig,
}

impl StateStorage {
    /// Create a new state storage instance
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;
        
        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Save conversation context to Redis
    pub async fn save_context(&self, context: &ConversationContext) -> Result<()> {
        let key = self.get_context_key(context.user_id);
        debug!(user_id = context.user_id, key = %key,
               step = ?context.step, "Saving context to Redis");
        
        let serialized = match serde_json::to_string(context) {
            Ok(data) => {
                debug!(user_id = context.user_id, data_length = data.len(), "Context serialized successfully");
                data
            },
            Err(e) => {
                error!(user_id = context.user_id, error = %e, "Failed to serialize context");
                return Err(e.into());
            }
        };
        
        let mut conn = self.connection_manager.clone();
        
        // Set the context with TTL
        let ttl_seconds = if let Some(expires_at) = context.expires_at {
            let now = chrono::Utc::now();
            let duration = expires_at - now;
            std::cmp::max(duration.num_seconds(), 60) as u64 // Minimum 60 seconds
        } else {
            self.config.ttl_seconds
        };

        match conn.set_ex::<_, _, ()>(&key, serialized, ttl_seconds).await {
            Ok(_) => {
                debug!(user_id = context.user_id, ttl_seconds = ttl_seconds, "Context saved to Redis successfully");
                Ok(())
            },
            Err(e) => {
                error!(user_id = context.user_id, error = %e, "Failed to save context to Redis");
                Err(e.into())
            }
        }
    }

    /// Load conversation context from Redis
    pub async fn load_context(&self, user_id: i64) -> Result<Option<ConversationContext>> {
        let key = self.get_context_key(user_id);
        debug!(user_id = user_id, key = %key, "Loading context from Redis");
        
        let mut conn = self.connection_manager.clone();
        
        let serialized: Option<String> = match conn.get::<&str, Option<String>>(&key).await {
            Ok(data) => {
                debug!(user_id = user_id, has_data = data.is_some(), "Redis GET result");
                data
            },
            Err(e) => {
                error!(user_id = user_id, error = %e, "Failed to get context from Redis");
                return Err(e.into());
            }
        };
        
        match serialized {
            Some(data) => {
                debug!(user_id = user_id, data_length = data.len(), "Deserializing context data");
                let context: ConversationContext = match serde_json::from_str::<ConversationContext>(&data) {
                    Ok(ctx) => {
                        debug!(user_id = user_id, step = ?ctx.step, "Context deserialized successfully");
                        ctx
                    },
                    Err(e) => {
                        error!(user_id = user_id, error = %e, "Failed to deserialize context");
                        return Err(e.into());
                    }
                };
                
                // Check if context has expired
                if context.is_expired() {
                    warn!(user_id = user_id, expires_at = ?context.expires_at, "Context has expired, removing");
                    self.delete_context(user_id).await?;
                    return Ok(None);
                }
                
                debug!(user_id = user_id, step = ?context.step, "Context loaded");
                Ok(Some(context))
            }
            None => {
                debug!(user_id = user_id, "No context found in Redis");
                Ok(None)
            }
        }
    }

    /// Delete conversation context from Redis
    pub async fn delete_context(&self, user_id: i64) -> Result<()> {
        let key = self.get_context_key(user_id);
        let mut conn = self.connection_manager.clone();
        
        let deleted: u32 = conn.del(&key).await?;
        debug!(user_id = user_id, deleted = deleted > 0, "Context deleted");
        Ok(())
    }

    fn get_context_key(&self, user_id: i64) -> String {
        format!("{}session:{}", self.config.prefix, user_id)
    }

    /// Test Redis connection
    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

impl std::fmt::Debug for StateStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStorage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
