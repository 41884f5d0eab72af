//! Gallery image repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use brightclass_core::{GalleryImageId, GalleryStatus};

use super::RepositoryError;
use crate::models::content::{GalleryImage, GalleryImageUpdate, NewGalleryImage};

#[derive(Debug, sqlx::FromRow)]
struct GalleryImageRow {
    id: i32,
    title: String,
    image_url: String,
    caption: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<GalleryImageRow> for GalleryImage {
    type Error = RepositoryError;

    fn try_from(row: GalleryImageRow) -> Result<Self, Self::Error> {
        let status: GalleryStatus = row
            .status
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid status: {e}")))?;

        Ok(Self {
            id: GalleryImageId::new(row.id),
            title: row.title,
            image_url: row.image_url,
            caption: row.caption,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const COLUMNS: &str = "id, title, image_url, caption, status, created_at, updated_at";

/// Repository for gallery image database operations.
pub struct GalleryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GalleryRepository<'a> {
    /// Create a new gallery repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List images, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<GalleryStatus>,
    ) -> Result<Vec<GalleryImage>, RepositoryError> {
        let rows: Vec<GalleryImageRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM gallery_image \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY created_at DESC"
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an image by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: GalleryImageId) -> Result<Option<GalleryImage>, RepositoryError> {
        let row: Option<GalleryImageRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM gallery_image WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create an image record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, new: &NewGalleryImage) -> Result<GalleryImage, RepositoryError> {
        let status = new.status.unwrap_or(GalleryStatus::Hidden);

        let row: GalleryImageRow = sqlx::query_as(&format!(
            "INSERT INTO gallery_image (title, image_url, caption, status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new.title)
        .bind(&new.image_url)
        .bind(new.caption.as_deref())
        .bind(status.as_str())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the image doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: GalleryImageId,
        update: &GalleryImageUpdate,
    ) -> Result<GalleryImage, RepositoryError> {
        let row: Option<GalleryImageRow> = sqlx::query_as(&format!(
            "UPDATE gallery_image SET \
                 title = COALESCE($2, title), \
                 image_url = COALESCE($3, image_url), \
                 caption = COALESCE($4, caption), \
                 status = COALESCE($5, status), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(update.title.as_deref())
        .bind(update.image_url.as_deref())
        .bind(update.caption.as_deref())
        .bind(update.status.map(|s| s.as_str()))
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Delete an image record.
    ///
    /// # Returns
    ///
    /// Returns `true` if the image was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: GalleryImageId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM gallery_image WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
