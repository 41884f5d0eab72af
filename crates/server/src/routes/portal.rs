//! Portal account lifecycle route handlers.
//!
//! One set of handlers serves all three portals; the `{portal}` path
//! segment selects the [`AccountKind`] and with it the kind-specific
//! policy (token TTL, email-domain allowlist).

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use brightclass_core::{AccountId, AccountKind, AccountStatus};

use crate::db::AccountRepository;
use crate::error::{AppError, Result};
use crate::models::Account;
use crate::services::lifecycle::{AccountLifecycle, LifecycleError, SignupRequest};
use crate::services::tokens::TokenError;
use crate::state::AppState;

/// Build the portal router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{portal}/signup", post(signup))
        .route("/api/{portal}/verify-email", post(verify_email))
        .route("/api/{portal}/send-verification", post(send_verification))
        .route("/api/{portal}/accounts", get(list_accounts))
        .route("/api/{portal}/accounts/{id}", patch(update_account))
        .route("/api/admin/accounts/{id}/elevate", post(elevate))
        // Emailed link target; verifies and redirects with a status code
        .route("/{portal}/verify-email", get(verify_email_link))
}

// =============================================================================
// Signup
// =============================================================================

/// Response for a successful signup.
///
/// `warning` is present when the account and token were persisted but the
/// verification email could not be delivered - signup is best-effort past
/// the store writes, never rolled back.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub account: Account,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// POST /api/{portal}/signup
#[instrument(skip(state, req), fields(portal = %portal))]
async fn signup(
    State(state): State<AppState>,
    Path(portal): Path<AccountKind>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>)> {
    let outcome = AccountLifecycle::new(&state, portal).signup(&req).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            account: outcome.account,
            warning: outcome.warning,
        }),
    ))
}

// =============================================================================
// Verification
// =============================================================================

/// Request to redeem a verification token.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

/// Response after successful verification.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub account: Account,
}

/// POST /api/{portal}/verify-email
#[instrument(skip(state, req), fields(portal = %portal))]
async fn verify_email(
    State(state): State<AppState>,
    Path(portal): Path<AccountKind>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>> {
    let account = AccountLifecycle::new(&state, portal)
        .confirm(req.token.trim())
        .await?;

    Ok(Json(VerifyResponse {
        success: true,
        account,
    }))
}

/// Query parameters of the emailed verification link.
#[derive(Debug, Deserialize)]
pub struct VerifyLinkQuery {
    pub token: Option<String>,
}

/// GET /{portal}/verify-email?token=...
///
/// Target of the emailed link. Verifies the token and redirects to the
/// portal login page with a query-encoded outcome, so the flow works
/// without any client-side JSON handling.
#[instrument(skip(state, query), fields(portal = %portal))]
async fn verify_email_link(
    State(state): State<AppState>,
    Path(portal): Path<AccountKind>,
    Query(query): Query<VerifyLinkQuery>,
) -> Redirect {
    let base = state.config().base_url_trimmed().to_owned();

    let Some(token) = query.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        return Redirect::to(&format!("{base}/{portal}/login?error=invalid_request"));
    };

    match AccountLifecycle::new(&state, portal).confirm(token).await {
        Ok(_) => Redirect::to(&format!("{base}/{portal}/login?status=verified")),
        Err(e) => {
            let code = redirect_error_code(&e);
            tracing::warn!(error = %e, code, "Verification link failed");
            Redirect::to(&format!("{base}/{portal}/login?error={code}"))
        }
    }
}

/// Map a lifecycle failure to the query-encoded error code used by the
/// link-based flow.
fn redirect_error_code(e: &LifecycleError) -> &'static str {
    match e {
        LifecycleError::Token(TokenError::NotFound) => "token_not_found",
        LifecycleError::Token(TokenError::Expired) => "token_expired",
        LifecycleError::InvalidInput(_) => "invalid_request",
        LifecycleError::AccountNotFound => "account_not_found",
        _ => "server_error",
    }
}

// =============================================================================
// Resend verification
// =============================================================================

/// Request to re-send the verification email.
#[derive(Debug, Deserialize)]
pub struct ResendRequest {
    pub email: String,
}

/// Response after re-issuing a verification token.
#[derive(Debug, Serialize)]
pub struct ResendResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// POST /api/{portal}/send-verification
#[instrument(skip(state, req), fields(portal = %portal))]
async fn send_verification(
    State(state): State<AppState>,
    Path(portal): Path<AccountKind>,
    Json(req): Json<ResendRequest>,
) -> Result<Json<ResendResponse>> {
    let warning = AccountLifecycle::new(&state, portal)
        .resend(&req.email)
        .await?;

    Ok(Json(ResendResponse {
        success: true,
        warning,
    }))
}

// =============================================================================
// Account administration
// =============================================================================

/// List filters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<AccountStatus>,
}

/// GET /api/{portal}/accounts
#[instrument(skip(state), fields(portal = %portal))]
async fn list_accounts(
    State(state): State<AppState>,
    Path(portal): Path<AccountKind>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Account>>> {
    let accounts = AccountRepository::new(state.pool())
        .list(portal, query.status)
        .await?;
    Ok(Json(accounts))
}

/// Manual account transition payload (operator action).
#[derive(Debug, Deserialize)]
pub struct AccountUpdateRequest {
    pub status: Option<AccountStatus>,
    pub approved: Option<bool>,
}

/// PATCH /api/{portal}/accounts/{id}
///
/// Direct operator CRUD: reject/deactivate an account or set the staff
/// approval flag. Activation stays exclusive to token verification.
#[instrument(skip(state, req), fields(portal = %portal))]
async fn update_account(
    State(state): State<AppState>,
    Path((portal, id)): Path<(AccountKind, AccountId)>,
    Json(req): Json<AccountUpdateRequest>,
) -> Result<Json<Account>> {
    if req.status.is_none() && req.approved.is_none() {
        return Err(AppError::InvalidInput(
            "provide status and/or approved".to_owned(),
        ));
    }
    if req.status == Some(AccountStatus::Active) {
        return Err(AppError::InvalidInput(
            "accounts become active only through email verification".to_owned(),
        ));
    }
    if req.approved.is_some() && portal != AccountKind::Staff {
        return Err(AppError::InvalidInput(
            "approved only applies to the staff portal".to_owned(),
        ));
    }

    let repo = AccountRepository::new(state.pool());

    // Guard against cross-portal ids before mutating anything
    let account = repo
        .get(id)
        .await?
        .filter(|a| a.kind == portal)
        .ok_or_else(|| AppError::NotFound("account".to_owned()))?;

    if let Some(status) = req.status {
        repo.set_status(account.id, status).await?;
    }
    if let Some(approved) = req.approved {
        repo.set_approved(account.id, approved).await?;
    }

    let updated = repo
        .get(account.id)
        .await?
        .ok_or_else(|| AppError::NotFound("account".to_owned()))?;

    Ok(Json(updated))
}

/// POST /api/admin/accounts/{id}/elevate
///
/// Admin role elevation, keyed off the profile's role column and decoupled
/// from the email-confirmed state.
#[instrument(skip(state))]
async fn elevate(State(state): State<AppState>, Path(id): Path<AccountId>) -> Result<StatusCode> {
    AccountLifecycle::new(&state, AccountKind::Admin)
        .elevate(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_error_codes() {
        assert_eq!(
            redirect_error_code(&LifecycleError::Token(TokenError::NotFound)),
            "token_not_found"
        );
        assert_eq!(
            redirect_error_code(&LifecycleError::Token(TokenError::Expired)),
            "token_expired"
        );
        assert_eq!(
            redirect_error_code(&LifecycleError::InvalidInput("x".to_owned())),
            "invalid_request"
        );
        assert_eq!(
            redirect_error_code(&LifecycleError::AccountNotFound),
            "account_not_found"
        );
    }
}
