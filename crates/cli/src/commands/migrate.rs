//! Database migration commands.
//!
//! Migrations are embedded from `crates/server/migrations/` at compile
//! time; the server never applies them on startup, so this command is the
//! only write path to the schema.

use super::{CommandError, connect};

/// Apply pending migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), CommandError> {
    tracing::info!("Connecting to database...");
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}

/// Show which embedded migrations have been applied.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable.
#[allow(clippy::print_stdout)]
pub async fn status() -> Result<(), CommandError> {
    let pool = connect().await?;

    let applied: Vec<i64> = match sqlx::query_scalar::<_, i64>(
        "SELECT version FROM _sqlx_migrations WHERE success ORDER BY version",
    )
    .fetch_all(&pool)
    .await
    {
        Ok(versions) => versions,
        // 42P01 = undefined_table: nothing has ever been applied
        Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some("42P01") => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    let migrator = sqlx::migrate!("../server/migrations");
    for migration in migrator.iter() {
        let marker = if applied.contains(&migration.version) {
            "applied"
        } else {
            "pending"
        };
        println!("{:>14}  {}  [{marker}]", migration.version, migration.description);
    }

    Ok(())
}
