//! Verification token maintenance commands.

use brightclass_server::db::TokenRepository;

use super::{CommandError, connect};

/// Delete expired verification tokens.
///
/// Expired tokens are also removed lazily when a verify call trips over
/// them; this sweep keeps the table small regardless of traffic.
///
/// # Errors
///
/// Returns `CommandError` if the delete fails.
pub async fn sweep() -> Result<(), CommandError> {
    let pool = connect().await?;
    let deleted = TokenRepository::new(&pool).delete_expired().await?;

    tracing::info!(deleted, "Expired verification tokens removed");
    Ok(())
}
