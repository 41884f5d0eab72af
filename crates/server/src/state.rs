//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::email::EmailService;
use crate::services::messaging::MessagingClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Provider clients are built once at startup
/// from their optional config blocks; an absent client means that
/// capability is not configured in this deployment.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    email: Option<EmailService>,
    messaging: Option<MessagingClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP transport cannot be constructed from
    /// the configured relay parameters.
    pub fn new(
        config: ServerConfig,
        pool: PgPool,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let email = config.email.as_ref().map(EmailService::new).transpose()?;
        let messaging = config.messaging.as_ref().map(MessagingClient::new);

        if email.is_none() {
            tracing::warn!("SMTP not configured - verification emails disabled");
        }
        if messaging.is_none() {
            tracing::warn!("WhatsApp not configured - class reminders disabled");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                email,
                messaging,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the email service, if SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }

    /// Get the messaging client, if the provider is configured.
    #[must_use]
    pub fn messaging(&self) -> Option<&MessagingClient> {
        self.inner.messaging.as_ref()
    }
}
