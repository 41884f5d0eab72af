//! Portfolio item repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use brightclass_core::{PortfolioItemId, PortfolioStatus};

use super::RepositoryError;
use crate::models::content::{NewPortfolioItem, PortfolioItem, PortfolioItemUpdate};

#[derive(Debug, sqlx::FromRow)]
struct PortfolioItemRow {
    id: i32,
    title: String,
    summary: String,
    image_url: Option<String>,
    client_name: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PortfolioItemRow> for PortfolioItem {
    type Error = RepositoryError;

    fn try_from(row: PortfolioItemRow) -> Result<Self, Self::Error> {
        let status: PortfolioStatus = row
            .status
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid status: {e}")))?;

        Ok(Self {
            id: PortfolioItemId::new(row.id),
            title: row.title,
            summary: row.summary,
            image_url: row.image_url,
            client_name: row.client_name,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const COLUMNS: &str = "id, title, summary, image_url, client_name, status, created_at, updated_at";

/// Repository for portfolio item database operations.
pub struct PortfolioRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PortfolioRepository<'a> {
    /// Create a new portfolio repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List items, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<PortfolioStatus>,
    ) -> Result<Vec<PortfolioItem>, RepositoryError> {
        let rows: Vec<PortfolioItemRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM portfolio_item \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY created_at DESC"
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an item by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: PortfolioItemId) -> Result<Option<PortfolioItem>, RepositoryError> {
        let row: Option<PortfolioItemRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM portfolio_item WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a portfolio item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, new: &NewPortfolioItem) -> Result<PortfolioItem, RepositoryError> {
        let status = new.status.unwrap_or(PortfolioStatus::Draft);

        let row: PortfolioItemRow = sqlx::query_as(&format!(
            "INSERT INTO portfolio_item (title, summary, image_url, client_name, status) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new.title)
        .bind(&new.summary)
        .bind(new.image_url.as_deref())
        .bind(new.client_name.as_deref())
        .bind(status.as_str())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: PortfolioItemId,
        update: &PortfolioItemUpdate,
    ) -> Result<PortfolioItem, RepositoryError> {
        let row: Option<PortfolioItemRow> = sqlx::query_as(&format!(
            "UPDATE portfolio_item SET \
                 title = COALESCE($2, title), \
                 summary = COALESCE($3, summary), \
                 image_url = COALESCE($4, image_url), \
                 client_name = COALESCE($5, client_name), \
                 status = COALESCE($6, status), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(update.title.as_deref())
        .bind(update.summary.as_deref())
        .bind(update.image_url.as_deref())
        .bind(update.client_name.as_deref())
        .bind(update.status.map(|s| s.as_str()))
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Delete a portfolio item.
    ///
    /// # Returns
    ///
    /// Returns `true` if the item was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: PortfolioItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM portfolio_item WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
