//! Portal account management commands.

use brightclass_core::{AccountId, AccountKind, AccountRole, AccountStatus};
use brightclass_server::db::AccountRepository;

use super::{CommandError, connect};

/// List accounts for a portal, optionally filtered by status.
///
/// # Errors
///
/// Returns `CommandError` for bad arguments or database failures.
#[allow(clippy::print_stdout)]
pub async fn list(kind: &str, status: Option<&str>) -> Result<(), CommandError> {
    let kind: AccountKind = kind
        .parse()
        .map_err(|e| CommandError::InvalidArgument(format!("{e}")))?;
    let status: Option<AccountStatus> = status
        .map(str::parse)
        .transpose()
        .map_err(|e| CommandError::InvalidArgument(format!("{e}")))?;

    let pool = connect().await?;
    let accounts = AccountRepository::new(&pool).list(kind, status).await?;

    println!(
        "{:>6}  {:<32}  {:<10}  {:<8}  name",
        "id", "email", "status", "approved"
    );
    for account in &accounts {
        println!(
            "{:>6}  {:<32}  {:<10}  {:<8}  {}",
            account.id,
            account.email,
            account.status,
            account.approved,
            account.full_name
        );
    }
    println!("{} account(s)", accounts.len());

    Ok(())
}

/// Approve a vetted staff account.
///
/// # Errors
///
/// Returns `CommandError` if no staff account matches or the update fails.
pub async fn approve(id: i32) -> Result<(), CommandError> {
    let pool = connect().await?;
    AccountRepository::new(&pool)
        .set_approved(AccountId::new(id), true)
        .await?;

    tracing::info!(account_id = id, "Staff account approved");
    Ok(())
}

/// Elevate an admin account to the admin role.
///
/// # Errors
///
/// Returns `CommandError` if no admin account matches or the update fails.
pub async fn elevate(id: i32) -> Result<(), CommandError> {
    let pool = connect().await?;
    AccountRepository::new(&pool)
        .set_role(AccountId::new(id), AccountRole::Admin)
        .await?;

    tracing::info!(account_id = id, "Admin account elevated");
    Ok(())
}
