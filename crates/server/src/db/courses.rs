//! Course repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use brightclass_core::{CourseId, CourseStatus};

use super::RepositoryError;
use crate::models::content::{Course, CourseUpdate, NewCourse};

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: i32,
    title: String,
    slug: String,
    description: String,
    price: Decimal,
    duration_weeks: i32,
    level: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CourseRow> for Course {
    type Error = RepositoryError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let status: CourseStatus = row
            .status
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid status: {e}")))?;

        Ok(Self {
            id: CourseId::new(row.id),
            title: row.title,
            slug: row.slug,
            description: row.description,
            price: row.price,
            duration_weeks: row.duration_weeks,
            level: row.level,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const COLUMNS: &str =
    "id, title, slug, description, price, duration_weeks, level, status, created_at, updated_at";

/// Repository for course database operations.
pub struct CourseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CourseRepository<'a> {
    /// Create a new course repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List courses, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, status: Option<CourseStatus>) -> Result<Vec<Course>, RepositoryError> {
        let rows: Vec<CourseRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM course \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY created_at DESC"
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a course by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CourseId) -> Result<Option<Course>, RepositoryError> {
        let row: Option<CourseRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM course WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a course.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewCourse) -> Result<Course, RepositoryError> {
        let status = new.status.unwrap_or(CourseStatus::Draft);

        let row: CourseRow = sqlx::query_as(&format!(
            "INSERT INTO course (title, slug, description, price, duration_weeks, level, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new.title)
        .bind(&new.slug)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.duration_weeks)
        .bind(&new.level)
        .bind(status.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_unique)?;

        row.try_into()
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the course doesn't exist.
    /// Returns `RepositoryError::Conflict` if a new slug is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: CourseId,
        update: &CourseUpdate,
    ) -> Result<Course, RepositoryError> {
        let row: Option<CourseRow> = sqlx::query_as(&format!(
            "UPDATE course SET \
                 title = COALESCE($2, title), \
                 slug = COALESCE($3, slug), \
                 description = COALESCE($4, description), \
                 price = COALESCE($5, price), \
                 duration_weeks = COALESCE($6, duration_weeks), \
                 level = COALESCE($7, level), \
                 status = COALESCE($8, status), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(update.title.as_deref())
        .bind(update.slug.as_deref())
        .bind(update.description.as_deref())
        .bind(update.price)
        .bind(update.duration_weeks)
        .bind(update.level.as_deref())
        .bind(update.status.map(|s| s.as_str()))
        .fetch_optional(self.pool)
        .await
        .map_err(conflict_on_unique)?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Delete a course.
    ///
    /// # Returns
    ///
    /// Returns `true` if the course was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: CourseId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM course WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn conflict_on_unique(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict("slug already exists".to_owned());
    }
    RepositoryError::Database(e)
}
