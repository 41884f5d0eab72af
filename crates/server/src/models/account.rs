//! Portal account model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use brightclass_core::{AccountId, AccountKind, AccountRole, AccountStatus, Email};

/// A portal account (admin, franchise partner, or teaching staff).
///
/// Created in `pending` state at signup and flipped to `active` only via
/// token verification. Kind-specific fields are optional columns on the
/// shared table.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Which portal this account belongs to.
    pub kind: AccountKind,
    /// Email address (unique per kind).
    pub email: Email,
    /// Display name.
    pub full_name: String,
    /// Contact phone (staff accounts receive class reminders here).
    pub phone: Option<String>,
    /// Lifecycle state.
    pub status: AccountStatus,
    /// Admin-portal role (None for franchise/staff).
    pub role: Option<AccountRole>,
    /// Staff-only approval flag (set by operators after vetting).
    pub approved: bool,
    /// Franchise: registered business name.
    pub business_name: Option<String>,
    /// Franchise: operating region.
    pub region: Option<String>,
    /// Staff: teaching subject.
    pub subject: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a pending account.
#[derive(Debug, Clone)]
pub struct NewAccount<'a> {
    pub kind: AccountKind,
    pub email: &'a Email,
    pub full_name: &'a str,
    pub phone: Option<&'a str>,
    pub role: Option<AccountRole>,
    pub business_name: Option<&'a str>,
    pub region: Option<&'a str>,
    pub subject: Option<&'a str>,
}
