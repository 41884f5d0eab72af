//! Verification token repository.
//!
//! Consumption is an atomic `DELETE ... RETURNING`, so concurrent verify
//! calls can never both succeed for the same token.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use brightclass_core::{AccountId, AccountKind};

use super::RepositoryError;
use crate::models::VerificationToken;

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct TokenRow {
    token: String,
    account_id: i32,
    kind: String,
    email: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl TryFrom<TokenRow> for VerificationToken {
    type Error = RepositoryError;

    fn try_from(row: TokenRow) -> Result<Self, Self::Error> {
        let kind: AccountKind = row
            .kind
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid kind: {e}")))?;

        Ok(Self {
            token: row.token,
            account_id: AccountId::new(row.account_id),
            kind,
            email: row.email,
            created_at: row.created_at,
            expires_at: row.expires_at,
        })
    }
}

/// Repository for verification token database operations.
pub struct TokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenRepository<'a> {
    /// Create a new token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a freshly issued token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a token value collision
    /// (practically impossible with 128 random bits).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(
        &self,
        token: &str,
        account_id: AccountId,
        kind: AccountKind,
        email: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<VerificationToken, RepositoryError> {
        let row: TokenRow = sqlx::query_as(
            r"
            INSERT INTO verification_token (token, account_id, kind, email, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING token, account_id, kind, email, created_at, expires_at
            ",
        )
        .bind(token)
        .bind(account_id.as_i32())
        .bind(kind.as_str())
        .bind(email)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("token collision".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Atomically consume a token: delete it and return the record, if any.
    ///
    /// The kind filter stops a token issued for one portal from verifying
    /// an account on another.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn consume(
        &self,
        token: &str,
        kind: AccountKind,
    ) -> Result<Option<VerificationToken>, RepositoryError> {
        let row: Option<TokenRow> = sqlx::query_as(
            r"
            DELETE FROM verification_token
            WHERE token = $1 AND kind = $2
            RETURNING token, account_id, kind, email, created_at, expires_at
            ",
        )
        .bind(token)
        .bind(kind.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Delete any outstanding tokens for an account (used before re-issuing,
    /// so at most one redeemable token exists per account).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_for_account(&self, account_id: AccountId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM verification_token WHERE account_id = $1")
            .bind(account_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete expired tokens (cleanup sweep).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_expired(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM verification_token WHERE expires_at < NOW()")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
