//! Group repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::group::{Group, NewGroup, UpdateGroupRequest};
use crate::utils::errors::AdRelayError;

#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a group unless its chat id is already tracked
    pub async fn create_if_absent(&self, request: NewGroup) -> Result<Option<Group>, AdRelayError> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO broadcast_groups (chat_id, title, invite_link, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (chat_id) DO NOTHING
            RETURNING chat_id, title, invite_link, created_at
            "#
        )
        .bind(request.chat_id)
        .bind(request.title)
        .bind(request.invite_link)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Find group by Telegram chat ID
    pub async fn find_by_chat_id(&self, chat_id: i64) -> Result<Option<Group>, AdRelayError> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT chat_id, title, invite_link, created_at FROM broadcast_groups WHERE chat_id = $1"
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// List all groups in the order they were joined
    pub async fn list(&self) -> Result<Vec<Group>, AdRelayError> {
        let groups = sqlx::query_as::<_, Group>(
            "SELECT chat_id, title, invite_link, created_at FROM broadcast_groups ORDER BY created_at ASC, chat_id ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    /// Update group
    pub async fn update(&self, chat_id: i64, request: UpdateGroupRequest) -> Result<Group, AdRelayError> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            UPDATE broadcast_groups
            SET title = COALESCE($2, title),
                invite_link = COALESCE($3, invite_link)
            WHERE chat_id = $1
            RETURNING chat_id, title, invite_link, created_at
            "#
        )
        .bind(chat_id)
        .bind(request.title)
        .bind(request.invite_link)
        .fetch_optional(&self.pool)
        .await?;

        group.ok_or(AdRelayError::GroupNotFound { chat_id })
    }

    /// Delete group
    pub async fn delete(&self, chat_id: i64) -> Result<(), AdRelayError> {
        let result = sqlx::query("DELETE FROM broadcast_groups WHERE chat_id = $1")
            .bind(chat_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AdRelayError::GroupNotFound { chat_id });
        }

        Ok(())
    }
}
