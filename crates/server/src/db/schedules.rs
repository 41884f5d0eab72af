//! Class schedule repository.
//!
//! Besides plain CRUD, this exposes the reminder scan's read path: the
//! schedules due today joined with the staff member's contact details.

use chrono::{DateTime, NaiveTime, Utc};
use sqlx::PgPool;

use brightclass_core::{AccountId, ScheduleId};

use super::RepositoryError;
use crate::models::{ClassSchedule, NewSchedule, ReminderCandidate, ScheduleUpdate};

#[derive(Debug, sqlx::FromRow)]
struct ScheduleRow {
    id: i32,
    staff_id: i32,
    student_name: String,
    guardian_phone: String,
    school_name: Option<String>,
    subject: String,
    day_of_week: String,
    start_time: NaiveTime,
    reminder_enabled: bool,
    reminder_time: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ScheduleRow> for ClassSchedule {
    fn from(row: ScheduleRow) -> Self {
        Self {
            id: ScheduleId::new(row.id),
            staff_id: AccountId::new(row.staff_id),
            student_name: row.student_name,
            guardian_phone: row.guardian_phone,
            school_name: row.school_name,
            subject: row.subject,
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            reminder_enabled: row.reminder_enabled,
            reminder_time: row.reminder_time,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CandidateRow {
    id: i32,
    student_name: String,
    guardian_phone: String,
    subject: String,
    start_time: NaiveTime,
    reminder_time: i32,
    staff_name: String,
    staff_phone: Option<String>,
}

impl From<CandidateRow> for ReminderCandidate {
    fn from(row: CandidateRow) -> Self {
        Self {
            schedule_id: ScheduleId::new(row.id),
            student_name: row.student_name,
            guardian_phone: row.guardian_phone,
            subject: row.subject,
            start_time: row.start_time,
            reminder_time: row.reminder_time,
            staff_name: row.staff_name,
            staff_phone: row.staff_phone,
        }
    }
}

const COLUMNS: &str = "id, staff_id, student_name, guardian_phone, school_name, subject, \
                       day_of_week, start_time, reminder_enabled, reminder_time, is_active, \
                       created_at, updated_at";

/// Repository for class schedule database operations.
pub struct ScheduleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScheduleRepository<'a> {
    /// Create a new schedule repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List schedules, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<ClassSchedule>, RepositoryError> {
        let rows: Vec<ScheduleRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM class_schedule ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a schedule by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ScheduleId) -> Result<Option<ClassSchedule>, RepositoryError> {
        let row: Option<ScheduleRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM class_schedule WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Into::into))
    }

    /// Reminder scan read path: active, reminder-enabled schedules for the
    /// given weekday joined with the staff contact.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn due_on(&self, weekday: &str) -> Result<Vec<ReminderCandidate>, RepositoryError> {
        let rows: Vec<CandidateRow> = sqlx::query_as(
            r"
            SELECT s.id, s.student_name, s.guardian_phone, s.subject, s.start_time,
                   s.reminder_time, a.full_name AS staff_name, a.phone AS staff_phone
            FROM class_schedule s
            JOIN portal_account a ON a.id = s.staff_id
            WHERE s.day_of_week = $1
              AND s.is_active
              AND s.reminder_enabled
            ORDER BY s.start_time
            ",
        )
        .bind(weekday)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a schedule.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails (including a
    /// foreign-key violation for an unknown staff account).
    pub async fn create(&self, new: &NewSchedule) -> Result<ClassSchedule, RepositoryError> {
        let row: ScheduleRow = sqlx::query_as(&format!(
            "INSERT INTO class_schedule \
                 (staff_id, student_name, guardian_phone, school_name, subject, day_of_week, \
                  start_time, reminder_enabled, reminder_time, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, \
                     COALESCE($8, TRUE), COALESCE($9, 30), COALESCE($10, TRUE)) \
             RETURNING {COLUMNS}"
        ))
        .bind(new.staff_id.as_i32())
        .bind(&new.student_name)
        .bind(&new.guardian_phone)
        .bind(new.school_name.as_deref())
        .bind(&new.subject)
        .bind(&new.day_of_week)
        .bind(new.start_time)
        .bind(new.reminder_enabled)
        .bind(new.reminder_time)
        .bind(new.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the schedule doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ScheduleId,
        update: &ScheduleUpdate,
    ) -> Result<ClassSchedule, RepositoryError> {
        let row: Option<ScheduleRow> = sqlx::query_as(&format!(
            "UPDATE class_schedule SET \
                 student_name = COALESCE($2, student_name), \
                 guardian_phone = COALESCE($3, guardian_phone), \
                 school_name = COALESCE($4, school_name), \
                 subject = COALESCE($5, subject), \
                 day_of_week = COALESCE($6, day_of_week), \
                 start_time = COALESCE($7, start_time), \
                 reminder_enabled = COALESCE($8, reminder_enabled), \
                 reminder_time = COALESCE($9, reminder_time), \
                 is_active = COALESCE($10, is_active), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(update.student_name.as_deref())
        .bind(update.guardian_phone.as_deref())
        .bind(update.school_name.as_deref())
        .bind(update.subject.as_deref())
        .bind(update.day_of_week.as_deref())
        .bind(update.start_time)
        .bind(update.reminder_enabled)
        .bind(update.reminder_time)
        .bind(update.is_active)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a schedule.
    ///
    /// # Returns
    ///
    /// Returns `true` if the schedule was deleted, `false` if it didn't
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ScheduleId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM class_schedule WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
