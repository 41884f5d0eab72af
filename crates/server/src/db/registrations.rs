//! Course registration repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use brightclass_core::{CourseId, RegistrationId, RegistrationStatus};

use super::RepositoryError;
use crate::models::content::{NewRegistration, Registration, RegistrationUpdate};

#[derive(Debug, sqlx::FromRow)]
struct RegistrationRow {
    id: i32,
    course_id: Option<i32>,
    student_name: String,
    guardian_name: Option<String>,
    guardian_phone: Option<String>,
    email: String,
    message: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RegistrationRow> for Registration {
    type Error = RepositoryError;

    fn try_from(row: RegistrationRow) -> Result<Self, Self::Error> {
        let status: RegistrationStatus = row
            .status
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid status: {e}")))?;

        Ok(Self {
            id: RegistrationId::new(row.id),
            course_id: row.course_id.map(CourseId::new),
            student_name: row.student_name,
            guardian_name: row.guardian_name,
            guardian_phone: row.guardian_phone,
            email: row.email,
            message: row.message,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const COLUMNS: &str = "id, course_id, student_name, guardian_name, guardian_phone, email, \
                       message, status, created_at, updated_at";

/// Repository for registration database operations.
pub struct RegistrationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RegistrationRepository<'a> {
    /// Create a new registration repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List registrations, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<RegistrationStatus>,
    ) -> Result<Vec<Registration>, RepositoryError> {
        let rows: Vec<RegistrationRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM registration \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY created_at DESC"
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a registration by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: RegistrationId) -> Result<Option<Registration>, RepositoryError> {
        let row: Option<RegistrationRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM registration WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a registration (public form submission, state `new`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, new: &NewRegistration) -> Result<Registration, RepositoryError> {
        let row: RegistrationRow = sqlx::query_as(&format!(
            "INSERT INTO registration \
                 (course_id, student_name, guardian_name, guardian_phone, email, message) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        ))
        .bind(new.course_id.map(|id| id.as_i32()))
        .bind(&new.student_name)
        .bind(new.guardian_name.as_deref())
        .bind(new.guardian_phone.as_deref())
        .bind(&new.email)
        .bind(new.message.as_deref())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Apply a partial update (follow-up tracking).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the registration doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: RegistrationId,
        update: &RegistrationUpdate,
    ) -> Result<Registration, RepositoryError> {
        let row: Option<RegistrationRow> = sqlx::query_as(&format!(
            "UPDATE registration SET \
                 student_name = COALESCE($2, student_name), \
                 guardian_name = COALESCE($3, guardian_name), \
                 guardian_phone = COALESCE($4, guardian_phone), \
                 message = COALESCE($5, message), \
                 status = COALESCE($6, status), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(update.student_name.as_deref())
        .bind(update.guardian_name.as_deref())
        .bind(update.guardian_phone.as_deref())
        .bind(update.message.as_deref())
        .bind(update.status.map(|s| s.as_str()))
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Delete a registration.
    ///
    /// # Returns
    ///
    /// Returns `true` if the registration was deleted, `false` if it didn't
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: RegistrationId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM registration WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
