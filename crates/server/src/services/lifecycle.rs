//! Parameterized account lifecycle controller.
//!
//! One implementation of signup -> verify -> activate shared by the admin,
//! franchise and staff portals, driven by a kind-specific [`KindPolicy`]
//! (token TTL, email-domain allowlist, approval requirement) instead of
//! three copy-pasted flows.
//!
//! Signup is deliberately non-transactional: once the pending account and
//! its token are persisted, a failed email send downgrades the result to a
//! success-with-warning rather than rolling anything back. Callers must
//! treat signup as "account exists, notification best-effort".

use sqlx::PgPool;
use serde::Deserialize;
use thiserror::Error;

use brightclass_core::{AccountId, AccountKind, AccountRole, AccountStatus, Email};

use crate::config::ServerConfig;
use crate::db::{AccountRepository, RepositoryError};
use crate::models::{Account, NewAccount};
use crate::services::email::EmailService;
use crate::services::tokens::{TokenError, TokenService};
use crate::state::AppState;

/// Errors surfaced by lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Missing or malformed fields (client error, checked before any write).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An account with this email already exists for the portal.
    #[error("an account with this email already exists")]
    DuplicateEmail,

    /// The referenced account does not exist.
    #[error("account not found")]
    AccountNotFound,

    /// Token verification failure.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Underlying database failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Signup request payload, shared by all three portals.
///
/// Kind-specific requirements are enforced by validation: franchise
/// signups must carry a business name, staff signups a teaching subject.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    pub region: Option<String>,
    pub subject: Option<String>,
}

/// Result of a signup: the pending account plus an optional warning when
/// the verification email could not be delivered.
#[derive(Debug)]
pub struct SignupOutcome {
    pub account: Account,
    pub warning: Option<String>,
}

/// Kind-specific lifecycle configuration.
#[derive(Debug, Clone)]
pub struct KindPolicy<'a> {
    /// Which portal this policy is for.
    pub kind: AccountKind,
    /// Required email domain for signups (None disables the check).
    pub email_domain: Option<&'a str>,
    /// Whether activation still leaves the account awaiting operator
    /// approval (teaching staff).
    pub requires_approval: bool,
}

impl<'a> KindPolicy<'a> {
    /// Build the policy for a portal from server configuration.
    #[must_use]
    pub fn for_kind(kind: AccountKind, config: &'a ServerConfig) -> Self {
        let email_domain = match kind {
            AccountKind::Admin => config.admin_email_domain.as_deref(),
            AccountKind::Franchise => config.franchise_email_domain.as_deref(),
            AccountKind::Staff => None,
        };

        Self {
            kind,
            email_domain,
            requires_approval: kind == AccountKind::Staff,
        }
    }

    /// Token time-to-live for this portal, in hours.
    #[must_use]
    pub const fn token_ttl_hours(&self) -> i64 {
        self.kind.token_ttl_hours()
    }
}

/// The lifecycle controller for one portal kind.
pub struct AccountLifecycle<'a> {
    pool: &'a PgPool,
    email: Option<&'a EmailService>,
    base_url: &'a str,
    policy: KindPolicy<'a>,
}

impl<'a> AccountLifecycle<'a> {
    /// Build a controller for a portal from application state.
    #[must_use]
    pub fn new(state: &'a AppState, kind: AccountKind) -> Self {
        Self {
            pool: state.pool(),
            email: state.email(),
            base_url: state.config().base_url_trimmed(),
            policy: KindPolicy::for_kind(kind, state.config()),
        }
    }

    /// Create a pending account, issue a verification token and send the
    /// verification email.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for field/allowlist failures (before any store
    /// write), `DuplicateEmail` for an existing account, `Repository` /
    /// `Token` for store failures. A failed email send is NOT an error -
    /// it surfaces as `SignupOutcome::warning`.
    pub async fn signup(&self, req: &SignupRequest) -> Result<SignupOutcome, LifecycleError> {
        let email = validate_signup(&self.policy, req)?;

        let accounts = AccountRepository::new(self.pool);

        // Advisory pre-check; the UNIQUE (kind, email) constraint is the
        // real guard against concurrent duplicates.
        if accounts
            .get_by_email(self.policy.kind, &email)
            .await?
            .is_some()
        {
            return Err(LifecycleError::DuplicateEmail);
        }

        let account = accounts
            .create(&NewAccount {
                kind: self.policy.kind,
                email: &email,
                full_name: req.full_name.trim(),
                phone: req.phone.as_deref(),
                role: (self.policy.kind == AccountKind::Admin).then_some(AccountRole::Member),
                business_name: req.business_name.as_deref(),
                region: req.region.as_deref(),
                subject: req.subject.as_deref(),
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => LifecycleError::DuplicateEmail,
                other => LifecycleError::Repository(other),
            })?;

        let token = TokenService::new(self.pool).issue(&account).await?;
        let warning = self.deliver_verification(&account, &token.token).await;

        tracing::info!(
            account_id = %account.id,
            kind = %account.kind,
            "Pending account created"
        );

        Ok(SignupOutcome { account, warning })
    }

    /// Redeem a verification token and activate the account.
    ///
    /// The admin portal additionally gets its role set at verify time;
    /// franchise partners receive a best-effort welcome email.
    ///
    /// # Errors
    ///
    /// `Token(NotFound | Expired)` for verification failures,
    /// `AccountNotFound` if the account vanished underneath the token.
    pub async fn confirm(&self, token: &str) -> Result<Account, LifecycleError> {
        let account_id = TokenService::new(self.pool)
            .verify(token, self.policy.kind)
            .await?;

        let accounts = AccountRepository::new(self.pool);
        let verify_role =
            (self.policy.kind == AccountKind::Admin).then_some(AccountRole::Admin);

        accounts
            .activate(account_id, verify_role)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => LifecycleError::AccountNotFound,
                other => LifecycleError::Repository(other),
            })?;

        let account = accounts
            .get(account_id)
            .await?
            .ok_or(LifecycleError::AccountNotFound)?;

        if self.policy.kind == AccountKind::Franchise
            && let Some(email_service) = self.email
            && let Err(e) = email_service
                .send_franchise_welcome(
                    account.email.as_str(),
                    &account.full_name,
                    &format!("{}/franchise", self.base_url),
                )
                .await
        {
            tracing::warn!(error = %e, "Failed to send franchise welcome email");
        }

        if self.policy.requires_approval && !account.approved {
            tracing::info!(account_id = %account.id, "Verified account awaiting operator approval");
        }

        tracing::info!(account_id = %account.id, kind = %account.kind, "Account verified");

        Ok(account)
    }

    /// Re-issue a verification token for a pending account and resend the
    /// email. Outstanding tokens for the account are revoked first.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if no account matches, `InvalidInput` if the
    /// account is not pending.
    pub async fn resend(&self, email_raw: &str) -> Result<Option<String>, LifecycleError> {
        let email = Email::parse(email_raw.trim().to_lowercase().as_str())
            .map_err(|e| LifecycleError::InvalidInput(e.to_string()))?;

        let account = AccountRepository::new(self.pool)
            .get_by_email(self.policy.kind, &email)
            .await?
            .ok_or(LifecycleError::AccountNotFound)?;

        if account.status != AccountStatus::Pending {
            return Err(LifecycleError::InvalidInput(
                "account is already verified".to_owned(),
            ));
        }

        let tokens = TokenService::new(self.pool);
        tokens.revoke_for_account(account.id).await?;
        let token = tokens.issue(&account).await?;

        Ok(self.deliver_verification(&account, &token.token).await)
    }

    /// Elevate an admin account's role, decoupled from email verification.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for non-admin portals, `AccountNotFound` if no admin
    /// account matches.
    pub async fn elevate(&self, id: AccountId) -> Result<(), LifecycleError> {
        if self.policy.kind != AccountKind::Admin {
            return Err(LifecycleError::InvalidInput(
                "role elevation only applies to the admin portal".to_owned(),
            ));
        }

        AccountRepository::new(self.pool)
            .set_role(id, AccountRole::Admin)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => LifecycleError::AccountNotFound,
                other => LifecycleError::Repository(other),
            })
    }

    /// Send the verification email, returning a warning string instead of
    /// failing when delivery is impossible.
    async fn deliver_verification(&self, account: &Account, token: &str) -> Option<String> {
        let verify_url = format!(
            "{}/{}/verify-email?token={token}",
            self.base_url, self.policy.kind
        );

        match self.email {
            Some(email_service) => {
                match email_service
                    .send_verification_email(
                        account.email.as_str(),
                        self.policy.kind.as_str(),
                        &verify_url,
                        self.policy.token_ttl_hours(),
                    )
                    .await
                {
                    Ok(()) => None,
                    Err(e) => {
                        tracing::warn!(
                            account_id = %account.id,
                            error = %e,
                            "Failed to send verification email"
                        );
                        Some(
                            "account created, but the verification email could not be sent; \
                             request a new verification email later"
                                .to_owned(),
                        )
                    }
                }
            }
            None => {
                // Development mode - log the link
                tracing::warn!(
                    account_id = %account.id,
                    verify_url = %verify_url,
                    "SMTP not configured - verification link logged (dev mode)"
                );
                Some("email service not configured; verification link logged".to_owned())
            }
        }
    }
}

/// Validate a signup request against a portal policy.
///
/// Runs entirely before any store write; the returned [`Email`] is the
/// trimmed, lowercased address to persist.
fn validate_signup(policy: &KindPolicy<'_>, req: &SignupRequest) -> Result<Email, LifecycleError> {
    if req.full_name.trim().is_empty() {
        return Err(LifecycleError::InvalidInput(
            "full_name is required".to_owned(),
        ));
    }

    let email = Email::parse(req.email.trim().to_lowercase().as_str())
        .map_err(|e| LifecycleError::InvalidInput(e.to_string()))?;

    if let Some(domain) = policy.email_domain
        && !email.matches_domain(domain)
    {
        return Err(LifecycleError::InvalidInput(format!(
            "email must belong to the {domain} domain"
        )));
    }

    match policy.kind {
        AccountKind::Franchise => {
            if req
                .business_name
                .as_deref()
                .is_none_or(|s| s.trim().is_empty())
            {
                return Err(LifecycleError::InvalidInput(
                    "business_name is required".to_owned(),
                ));
            }
        }
        AccountKind::Staff => {
            if req.subject.as_deref().is_none_or(|s| s.trim().is_empty()) {
                return Err(LifecycleError::InvalidInput(
                    "subject is required".to_owned(),
                ));
            }
        }
        AccountKind::Admin => {}
    }

    Ok(email)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(email: &str) -> SignupRequest {
        SignupRequest {
            full_name: "Ada Obi".to_owned(),
            email: email.to_owned(),
            phone: None,
            business_name: Some("Obi Learning Ltd".to_owned()),
            region: Some("Lagos".to_owned()),
            subject: Some("Mathematics".to_owned()),
        }
    }

    fn policy(kind: AccountKind, email_domain: Option<&str>) -> KindPolicy<'_> {
        KindPolicy {
            kind,
            email_domain,
            requires_approval: kind == AccountKind::Staff,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_signup() {
        let email = validate_signup(
            &policy(AccountKind::Staff, None),
            &request("Ada@Example.com "),
        )
        .unwrap();
        // Trimmed and lowercased before persistence
        assert_eq!(email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut req = request("ada@example.com");
        req.full_name = "   ".to_owned();
        let err = validate_signup(&policy(AccountKind::Admin, None), &req).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidInput(_)));
    }

    #[test]
    fn test_validate_rejects_malformed_email() {
        let err = validate_signup(&policy(AccountKind::Admin, None), &request("not-an-email"))
            .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidInput(_)));
    }

    #[test]
    fn test_validate_enforces_domain_allowlist() {
        let err = validate_signup(
            &policy(AccountKind::Admin, Some("brightclass.co")),
            &request("ada@gmail.com"),
        )
        .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidInput(_)));

        assert!(
            validate_signup(
                &policy(AccountKind::Admin, Some("brightclass.co")),
                &request("ada@brightclass.co"),
            )
            .is_ok()
        );
    }

    #[test]
    fn test_validate_franchise_requires_business_name() {
        let mut req = request("ada@example.com");
        req.business_name = None;
        let err = validate_signup(&policy(AccountKind::Franchise, None), &req).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidInput(_)));
    }

    #[test]
    fn test_validate_staff_requires_subject() {
        let mut req = request("ada@example.com");
        req.subject = Some(String::new());
        let err = validate_signup(&policy(AccountKind::Staff, None), &req).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidInput(_)));
    }

    #[test]
    fn test_policy_ttls_match_portal_kind() {
        assert_eq!(policy(AccountKind::Admin, None).token_ttl_hours(), 24);
        assert_eq!(policy(AccountKind::Staff, None).token_ttl_hours(), 24);
        assert_eq!(policy(AccountKind::Franchise, None).token_ttl_hours(), 168);
    }

    #[test]
    fn test_only_staff_requires_approval() {
        assert!(policy(AccountKind::Staff, None).requires_approval);
        assert!(!policy(AccountKind::Admin, None).requires_approval);
        assert!(!policy(AccountKind::Franchise, None).requires_approval);
    }
}
