//! Brightclass CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! bc-cli migrate run
//!
//! # Show migration status
//! bc-cli migrate status
//!
//! # List staff accounts awaiting approval
//! bc-cli accounts list -k staff -s active
//!
//! # Approve a vetted staff account
//! bc-cli accounts approve -i 42
//!
//! # Elevate an admin account's role
//! bc-cli accounts elevate -i 7
//!
//! # Delete expired verification tokens
//! bc-cli tokens sweep
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bc-cli")]
#[command(author, version, about = "Brightclass CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Manage portal accounts
    Accounts {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Manage verification tokens
    Tokens {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply pending migrations
    Run,
    /// Show applied migrations
    Status,
}

#[derive(Subcommand)]
enum AccountAction {
    /// List accounts for a portal
    List {
        /// Portal kind (`admin`, `franchise`, `staff`)
        #[arg(short, long)]
        kind: String,

        /// Filter by status (`pending`, `active`, `rejected`, `deactivated`)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Set the approval flag on a staff account
    Approve {
        /// Account ID
        #[arg(short, long)]
        id: i32,
    },
    /// Elevate an admin account to the admin role
    Elevate {
        /// Account ID
        #[arg(short, long)]
        id: i32,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Delete expired verification tokens
    Sweep,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { action } => match action {
            MigrateAction::Run => commands::migrate::run().await?,
            MigrateAction::Status => commands::migrate::status().await?,
        },
        Commands::Accounts { action } => match action {
            AccountAction::List { kind, status } => {
                commands::accounts::list(&kind, status.as_deref()).await?;
            }
            AccountAction::Approve { id } => commands::accounts::approve(id).await?,
            AccountAction::Elevate { id } => commands::accounts::elevate(id).await?,
        },
        Commands::Tokens { action } => match action {
            TokenAction::Sweep => commands::tokens::sweep().await?,
        },
    }
    Ok(())
}
