//! Token verification service.
//!
//! Issues, validates and expires single-use verification tokens for all
//! three portals. This service never mutates accounts - callers flip the
//! account status after a successful verify, which keeps it reusable
//! across the admin, franchise and staff lifecycles.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use thiserror::Error;

use brightclass_core::{AccountId, AccountKind};

use crate::db::{RepositoryError, TokenRepository};
use crate::models::{Account, VerificationToken};

/// Number of random bytes in a token (128 bits, hex-encoded to 32 chars).
const TOKEN_BYTES: usize = 16;

/// Errors surfaced by token verification.
#[derive(Debug, Error)]
pub enum TokenError {
    /// No redeemable record matches the presented token.
    #[error("verification token not found")]
    NotFound,

    /// The token existed but its expiry has passed.
    #[error("verification token expired")]
    Expired,

    /// Underlying database failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Service for issuing and redeeming verification tokens.
pub struct TokenService<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenService<'a> {
    /// Create a new token service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Issue a token for a pending account.
    ///
    /// The TTL is kind-specific: 24 hours for admin and staff, 7 days for
    /// franchise partners. Issuing has no side effect on the account.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Repository` if the insert fails.
    pub async fn issue(&self, account: &Account) -> Result<VerificationToken, TokenError> {
        let ttl = Duration::hours(account.kind.token_ttl_hours());
        let expires_at = Utc::now() + ttl;
        let token = generate_token();

        let record = TokenRepository::new(self.pool)
            .insert(
                &token,
                account.id,
                account.kind,
                account.email.as_str(),
                expires_at,
            )
            .await?;

        Ok(record)
    }

    /// Redeem a token, consuming it.
    ///
    /// The record is deleted atomically, so a second call with the same
    /// token fails with `NotFound` - one-time use is structural, not
    /// advisory. An expired record is also deleted when encountered and
    /// reported as `Expired`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::NotFound` if no record matches (or the kind
    /// doesn't), `TokenError::Expired` past the deadline, and
    /// `TokenError::Repository` on database failure.
    pub async fn verify(&self, token: &str, kind: AccountKind) -> Result<AccountId, TokenError> {
        let record = TokenRepository::new(self.pool)
            .consume(token, kind)
            .await?
            .ok_or(TokenError::NotFound)?;

        if record.is_expired() {
            return Err(TokenError::Expired);
        }

        Ok(record.account_id)
    }

    /// Drop any outstanding tokens for an account before re-issuing.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Repository` if the delete fails.
    pub async fn revoke_for_account(&self, account_id: AccountId) -> Result<u64, TokenError> {
        Ok(TokenRepository::new(self.pool)
            .delete_for_account(account_id)
            .await?)
    }

    /// Delete expired tokens (operator cleanup).
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Repository` if the delete fails.
    pub async fn sweep_expired(&self) -> Result<u64, TokenError> {
        Ok(TokenRepository::new(self.pool).delete_expired().await?)
    }
}

/// Generate an opaque token: 128 random bits, hex-encoded.
#[must_use]
pub fn generate_token() -> String {
    use rand::Rng;
    let bytes: [u8; TOKEN_BYTES] = rand::rng().random();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_format() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(token, token.to_lowercase());
    }

    #[test]
    fn test_generate_token_unique() {
        // 128 bits of randomness; a collision here means the RNG is broken
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }
}
