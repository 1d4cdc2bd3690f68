//! Advertisement repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::advertisement::{Advertisement, NewAdvertisement, UpdateAdvertisementRequest, AdvertisementFilter};
use crate::models::image::NewImage;
use crate::utils::errors::AdRelayError;

/// Advisory lock key serializing activation across bot instances
const ACTIVATION_LOCK_KEY: i64 = 0x4164_5265_6c61_7901;

#[derive(Clone)]
pub struct AdvertisementRepository {
    pool: PgPool,
}

impl AdvertisementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an advertisement and its images in one transaction
    pub async fn create(&self, request: NewAdvertisement, images: Vec<NewImage>) -> Result<Advertisement, AdRelayError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let advertisement = sqlx::query_as::<_, Advertisement>(
            r#"
            INSERT INTO advertisements (body, contact, active, created_at)
            VALUES ($1, $2, FALSE, $3)
            RETURNING id, body, contact, active, created_at
            "#
        )
        .bind(request.body)
        .bind(request.contact)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for (index, image) in images.into_iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO advertisement_images (advertisement_id, file_path, sort_order, created_at)
                VALUES ($1, $2, $3, $4)
                "#
            )
            .bind(advertisement.id)
            .bind(image.file_path)
            .bind(index as i32)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(advertisement)
    }

    /// Find advertisement by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Advertisement>, AdRelayError> {
        let advertisement = sqlx::query_as::<_, Advertisement>(
            "SELECT id, body, contact, active, created_at FROM advertisements WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(advertisement)
    }

    /// List all advertisements, oldest first
    pub async fn list(&self) -> Result<Vec<Advertisement>, AdRelayError> {
        self.list_where(AdvertisementFilter::default()).await
    }

    /// List advertisements matching the filter
    pub async fn list_where(&self, filter: AdvertisementFilter) -> Result<Vec<Advertisement>, AdRelayError> {
        let advertisements = sqlx::query_as::<_, Advertisement>(
            r#"
            SELECT id, body, contact, active, created_at
            FROM advertisements
            WHERE ($1::BOOLEAN IS NULL OR active = $1)
            ORDER BY created_at ASC, id ASC
            "#
        )
        .bind(filter.active)
        .fetch_all(&self.pool)
        .await?;

        Ok(advertisements)
    }

    /// Update body and contact
    pub async fn update(&self, id: i64, request: UpdateAdvertisementRequest) -> Result<Advertisement, AdRelayError> {
        let advertisement = sqlx::query_as::<_, Advertisement>(
            r#"
            UPDATE advertisements
            SET body = COALESCE($2, body),
                contact = COALESCE($3, contact)
            WHERE id = $1
            RETURNING id, body, contact, active, created_at
            "#
        )
        .bind(id)
        .bind(request.body)
        .bind(request.contact)
        .fetch_optional(&self.pool)
        .await?;

        advertisement.ok_or(AdRelayError::AdvertisementNotFound { advertisement_id: id })
    }

    /// Delete advertisement; image rows follow by cascade
    pub async fn delete(&self, id: i64) -> Result<(), AdRelayError> {
        let result = sqlx::query("DELETE FROM advertisements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AdRelayError::AdvertisementNotFound { advertisement_id: id });
        }

        Ok(())
    }

    /// Make `id` the only active advertisement.
    ///
    /// Runs under a transaction-scoped advisory lock, so concurrent
    /// activations are applied one after another.
    pub async fn activate(&self, id: i64) -> Result<Advertisement, AdRelayError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ACTIVATION_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM advertisements WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            tx.rollback().await?;
            return Err(AdRelayError::AdvertisementNotFound { advertisement_id: id });
        }

        sqlx::query("UPDATE advertisements SET active = FALSE WHERE active AND id <> $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let advertisement = sqlx::query_as::<_, Advertisement>(
            r#"
            UPDATE advertisements
            SET active = TRUE
            WHERE id = $1
            RETURNING id, body, contact, active, created_at
            "#
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(advertisement)
    }

    /// Clear the active flag everywhere
    pub async fn deactivate_all(&self) -> Result<u64, AdRelayError> {
        let result = sqlx::query("UPDATE advertisements SET active = FALSE WHERE active")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
