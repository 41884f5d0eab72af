//! Email verification token model.

use chrono::{DateTime, Utc};

use brightclass_core::{AccountId, AccountKind};

/// A single-use email verification token.
///
/// Issued at signup, consumed (deleted) on successful verification, or left
/// to expire. The token value is 32 lowercase hex characters (128 random
/// bits), so guessing is infeasible.
#[derive(Debug, Clone)]
pub struct VerificationToken {
    /// The opaque token value (primary key).
    pub token: String,
    /// Account the token verifies.
    pub account_id: AccountId,
    /// Portal the token belongs to.
    pub kind: AccountKind,
    /// Email the token was sent to.
    pub email: String,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
    /// When the token stops being redeemable.
    pub expires_at: DateTime<Utc>,
}

impl VerificationToken {
    /// Returns true if the token is past its expiry at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Returns true if the token is past its expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn token_expiring_at(expires_at: DateTime<Utc>) -> VerificationToken {
        VerificationToken {
            token: "a".repeat(32),
            account_id: AccountId::new(1),
            kind: AccountKind::Staff,
            email: "staff@example.com".to_string(),
            created_at: expires_at - Duration::hours(24),
            expires_at,
        }
    }

    #[test]
    fn test_not_expired_before_deadline() {
        let now = Utc::now();
        let token = token_expiring_at(now + Duration::hours(1));
        assert!(!token.is_expired_at(now));
    }

    #[test]
    fn test_expired_after_deadline() {
        let now = Utc::now();
        let token = token_expiring_at(now - Duration::seconds(1));
        assert!(token.is_expired_at(now));
    }

    #[test]
    fn test_boundary_is_not_expired() {
        // expires_at itself is still redeemable; only now > expires_at fails
        let now = Utc::now();
        let token = token_expiring_at(now);
        assert!(!token.is_expired_at(now));
    }
}
