//! Advertisement image repository implementation

use sqlx::PgPool;
use crate::models::image::{Image, UpdateImageRequest};
use crate::utils::errors::AdRelayError;

#[derive(Clone)]
pub struct ImageRepository {
    pool: PgPool,
}

impl ImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find image by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Image>, AdRelayError> {
        let image = sqlx::query_as::<_, Image>(
            "SELECT id, advertisement_id, file_path, sort_order, created_at FROM advertisement_images WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    /// Images of an advertisement in album order
    pub async fn list_for_advertisement(&self, advertisement_id: i64) -> Result<Vec<Image>, AdRelayError> {
        let images = sqlx::query_as::<_, Image>(
            "SELECT id, advertisement_id, file_path, sort_order, created_at FROM advertisement_images WHERE advertisement_id = $1 ORDER BY sort_order ASC, id ASC"
        )
        .bind(advertisement_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    /// List every stored image
    pub async fn list(&self) -> Result<Vec<Image>, AdRelayError> {
        let images = sqlx::query_as::<_, Image>(
            "SELECT id, advertisement_id, file_path, sort_order, created_at FROM advertisement_images ORDER BY advertisement_id ASC, sort_order ASC, id ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    /// Point an image record at another file
    pub async fn update(&self, id: i64, request: UpdateImageRequest) -> Result<Image, AdRelayError> {
        let image = sqlx::query_as::<_, Image>(
            r#"
            UPDATE advertisement_images
            SET file_path = $2
            WHERE id = $1
            RETURNING id, advertisement_id, file_path, sort_order, created_at
            "#
        )
        .bind(id)
        .bind(request.file_path)
        .fetch_optional(&self.pool)
        .await?;

        image.ok_or(AdRelayError::ImageNotFound { image_id: id })
    }

    /// Delete image record
    pub async fn delete(&self, id: i64) -> Result<(), AdRelayError> {
        let result = sqlx::query("DELETE FROM advertisement_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AdRelayError::ImageNotFound { image_id: id });
        }

        Ok(())
    }
}
