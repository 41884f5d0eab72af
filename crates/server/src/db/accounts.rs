//! Portal account repository.
//!
//! All three portals share one table with a `kind` discriminator; the
//! `UNIQUE (kind, email)` constraint is the real duplicate-signup guard.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use brightclass_core::{AccountId, AccountKind, AccountRole, AccountStatus, Email};

use super::RepositoryError;
use crate::models::{Account, NewAccount};

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i32,
    kind: String,
    email: String,
    full_name: String,
    phone: Option<String>,
    status: String,
    role: Option<String>,
    approved: bool,
    business_name: Option<String>,
    region: Option<String>,
    subject: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let kind: AccountKind = row
            .kind
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid kind: {e}")))?;
        let status: AccountStatus = row
            .status
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid status: {e}")))?;
        let role = row
            .role
            .map(|r| r.parse::<AccountRole>())
            .transpose()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid role: {e}")))?;
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: AccountId::new(row.id),
            kind,
            email,
            full_name: row.full_name,
            phone: row.phone,
            status,
            role,
            approved: row.approved,
            business_name: row.business_name,
            region: row.region,
            subject: row.subject,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const ACCOUNT_COLUMNS: &str = "id, kind, email, full_name, phone, status, role, approved, \
                               business_name, region, subject, created_at, updated_at";

/// Repository for portal account database operations.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an account by portal kind and email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(
        &self,
        kind: AccountKind,
        email: &Email,
    ) -> Result<Option<Account>, RepositoryError> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM portal_account WHERE kind = $1 AND email = $2"
        ))
        .bind(kind.as_str())
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get an account by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM portal_account WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List accounts for a portal, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        kind: AccountKind,
        status: Option<AccountStatus>,
    ) -> Result<Vec<Account>, RepositoryError> {
        let rows: Vec<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM portal_account \
             WHERE kind = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY created_at DESC"
        ))
        .bind(kind.as_str())
        .bind(status.map(|s| s.as_str()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Create a pending account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an account already exists for
    /// this kind and email. Returns `RepositoryError::Database` for other
    /// database errors.
    pub async fn create(&self, new: &NewAccount<'_>) -> Result<Account, RepositoryError> {
        let row: AccountRow = sqlx::query_as(&format!(
            "INSERT INTO portal_account \
                 (kind, email, full_name, phone, role, business_name, region, subject) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(new.kind.as_str())
        .bind(new.email.as_str())
        .bind(new.full_name)
        .bind(new.phone)
        .bind(new.role.map(|r| r.as_str()))
        .bind(new.business_name)
        .bind(new.region)
        .bind(new.subject)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "account already exists for this email".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Flip a pending account to active, optionally assigning a role.
    ///
    /// Called only by the verification flow; the role argument carries the
    /// admin portal's verify-time role assignment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn activate(
        &self,
        id: AccountId,
        role: Option<AccountRole>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE portal_account \
             SET status = 'active', role = COALESCE($2, role), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id.as_i32())
        .bind(role.map(|r| r.as_str()))
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Set an account's lifecycle status (manual admin transition).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_status(
        &self,
        id: AccountId,
        status: AccountStatus,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE portal_account SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id.as_i32())
                .bind(status.as_str())
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Set an admin account's role (elevation), independent of verification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no admin account matches.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_role(&self, id: AccountId, role: AccountRole) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE portal_account SET role = $2, updated_at = NOW() \
             WHERE id = $1 AND kind = 'admin'",
        )
        .bind(id.as_i32())
        .bind(role.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Set the staff-only approval flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no staff account matches.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_approved(&self, id: AccountId, approved: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE portal_account SET approved = $2, updated_at = NOW() \
             WHERE id = $1 AND kind = 'staff'",
        )
        .bind(id.as_i32())
        .bind(approved)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
