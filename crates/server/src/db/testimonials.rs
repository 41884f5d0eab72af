//! Testimonial repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use brightclass_core::{TestimonialId, TestimonialStatus};

use super::RepositoryError;
use crate::models::content::{NewTestimonial, Testimonial, TestimonialUpdate};

#[derive(Debug, sqlx::FromRow)]
struct TestimonialRow {
    id: i32,
    author_name: String,
    author_role: Option<String>,
    quote: String,
    rating: Option<i32>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TestimonialRow> for Testimonial {
    type Error = RepositoryError;

    fn try_from(row: TestimonialRow) -> Result<Self, Self::Error> {
        let status: TestimonialStatus = row
            .status
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid status: {e}")))?;

        Ok(Self {
            id: TestimonialId::new(row.id),
            author_name: row.author_name,
            author_role: row.author_role,
            quote: row.quote,
            rating: row.rating,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const COLUMNS: &str = "id, author_name, author_role, quote, rating, status, created_at, updated_at";

/// Repository for testimonial database operations.
pub struct TestimonialRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TestimonialRepository<'a> {
    /// Create a new testimonial repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List testimonials, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<TestimonialStatus>,
    ) -> Result<Vec<Testimonial>, RepositoryError> {
        let rows: Vec<TestimonialRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM testimonial \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY created_at DESC"
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a testimonial by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: TestimonialId) -> Result<Option<Testimonial>, RepositoryError> {
        let row: Option<TestimonialRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM testimonial WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a testimonial (defaults to `pending` moderation state).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, new: &NewTestimonial) -> Result<Testimonial, RepositoryError> {
        let status = new.status.unwrap_or(TestimonialStatus::Pending);

        let row: TestimonialRow = sqlx::query_as(&format!(
            "INSERT INTO testimonial (author_name, author_role, quote, rating, status) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new.author_name)
        .bind(new.author_role.as_deref())
        .bind(&new.quote)
        .bind(new.rating)
        .bind(status.as_str())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the testimonial doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: TestimonialId,
        update: &TestimonialUpdate,
    ) -> Result<Testimonial, RepositoryError> {
        let row: Option<TestimonialRow> = sqlx::query_as(&format!(
            "UPDATE testimonial SET \
                 author_name = COALESCE($2, author_name), \
                 author_role = COALESCE($3, author_role), \
                 quote = COALESCE($4, quote), \
                 rating = COALESCE($5, rating), \
                 status = COALESCE($6, status), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(update.author_name.as_deref())
        .bind(update.author_role.as_deref())
        .bind(update.quote.as_deref())
        .bind(update.rating)
        .bind(update.status.map(|s| s.as_str()))
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Delete a testimonial.
    ///
    /// # Returns
    ///
    /// Returns `true` if the testimonial was deleted, `false` if it didn't
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: TestimonialId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM testimonial WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
