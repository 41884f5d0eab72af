//! Database operations for the Brightclass `PostgreSQL` database.
//!
//! # Tables
//!
//! - `portal_account` - Admin/franchise/staff accounts (kind discriminator)
//! - `verification_token` - Single-use email verification tokens
//! - `blog_post`, `course`, `gallery_image`, `portfolio_item`,
//!   `testimonial`, `registration` - Public-site content
//! - `class_schedule` - Weekly schedules scanned by the reminder job
//!
//! Repositories use the sqlx runtime query API with `FromRow` row structs
//! converted into domain models via `TryFrom`, so a build never needs a
//! live database.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p brightclass-cli -- migrate run
//! ```

pub mod accounts;
pub mod blog_posts;
pub mod courses;
pub mod gallery;
pub mod portfolio;
pub mod registrations;
pub mod schedules;
pub mod testimonials;
pub mod tokens;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use accounts::AccountRepository;
pub use blog_posts::BlogPostRepository;
pub use courses::CourseRepository;
pub use gallery::GalleryRepository;
pub use portfolio::PortfolioRepository;
pub use registrations::RegistrationRepository;
pub use schedules::ScheduleRepository;
pub use testimonials::TestimonialRepository;
pub use tokens::TokenRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
