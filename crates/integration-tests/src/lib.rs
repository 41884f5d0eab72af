//! Integration tests for the Brightclass platform.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and run migrations
//! cargo run -p brightclass-cli -- migrate run
//!
//! # Start the server
//! cargo run -p brightclass-server
//!
//! # Run the ignored integration tests
//! cargo test -p brightclass-integration-tests -- --ignored
//! ```
//!
//! Tests are `#[ignore]`d by default because they require a running server
//! (`BRIGHTCLASS_BASE_URL`, default `http://localhost:3000`) and, for the
//! verification flow, direct database access (`BRIGHTCLASS_DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Shared context for integration tests.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Build a context from environment configuration.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed.
    #[must_use]
    pub fn new() -> Self {
        let base_url = std::env::var("BRIGHTCLASS_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Self {
            client: Client::builder()
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL for a path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Connect straight to the database (for assertions the API does not
    /// expose, e.g. reading a verification token).
    ///
    /// # Panics
    ///
    /// Panics if `BRIGHTCLASS_DATABASE_URL`/`DATABASE_URL` is unset or the
    /// connection fails.
    pub async fn pool(&self) -> PgPool {
        let url = std::env::var("BRIGHTCLASS_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .expect("BRIGHTCLASS_DATABASE_URL must be set for database-backed tests");

        PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("Failed to connect to test database")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A unique email for this test run, to dodge duplicate-email conflicts.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("{prefix}+{nanos:x}@example.com")
}
