//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BRIGHTCLASS_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)
//! - `BRIGHTCLASS_BASE_URL` - Public URL for the site (used in email links)
//!
//! ## Optional
//! - `BRIGHTCLASS_HOST` - Bind address (default: 127.0.0.1)
//! - `BRIGHTCLASS_PORT` - Listen port (default: 3000)
//! - `ADMIN_EMAIL_DOMAIN` - Required email domain for admin signups
//! - `FRANCHISE_EMAIL_DOMAIN` - Required email domain for franchise signups
//! - `REMINDER_UTC_OFFSET_MINUTES` - Local-time offset for the reminder scan
//!   (default: 60, West Africa Time)
//! - `REMINDER_COUNTRY_CODE` - Calling code for trunk-prefix rewriting
//!   (default: +234)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! ## Optional (SMTP - enables transactional email)
//! - `SMTP_HOST` / `SMTP_PORT` (default 587) / `SMTP_USERNAME` /
//!   `SMTP_PASSWORD` / `SMTP_FROM`
//!
//! ## Optional (WhatsApp Cloud API - enables class reminders)
//! - `WHATSAPP_ACCESS_TOKEN` - Bearer token
//! - `WHATSAPP_PHONE_NUMBER_ID` - Sender phone-number id

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site (email verification links)
    pub base_url: String,
    /// Required email domain for admin signups (None disables the check)
    pub admin_email_domain: Option<String>,
    /// Required email domain for franchise signups (None disables the check)
    pub franchise_email_domain: Option<String>,
    /// Reminder scan configuration
    pub reminder: ReminderConfig,
    /// SMTP configuration (optional - disables email when absent)
    pub email: Option<EmailConfig>,
    /// WhatsApp Cloud API configuration (optional - disables reminders)
    pub messaging: Option<MessagingConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "staging", "production")
    pub sentry_environment: Option<String>,
}

/// Reminder scan configuration.
#[derive(Debug, Clone)]
pub struct ReminderConfig {
    /// Minutes added to UTC to get local wall-clock time.
    pub utc_offset_minutes: i32,
    /// Country calling code used for trunk-prefix phone rewriting.
    pub country_code: String,
}

/// Email (SMTP) configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP authentication username
    pub smtp_username: String,
    /// SMTP authentication password
    pub smtp_password: SecretString,
    /// Email sender address (From header)
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

/// WhatsApp Cloud API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct MessagingConfig {
    /// Graph API bearer token
    pub access_token: SecretString,
    /// Sender phone-number id
    pub phone_number_id: String,
}

impl std::fmt::Debug for MessagingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagingConfig")
            .field("access_token", &"[REDACTED]")
            .field("phone_number_id", &self.phone_number_id)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("BRIGHTCLASS_DATABASE_URL")?;
        let host = get_env_or_default("BRIGHTCLASS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BRIGHTCLASS_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("BRIGHTCLASS_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BRIGHTCLASS_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("BRIGHTCLASS_BASE_URL")?;

        let admin_email_domain = get_optional_env("ADMIN_EMAIL_DOMAIN");
        let franchise_email_domain = get_optional_env("FRANCHISE_EMAIL_DOMAIN");

        let reminder = ReminderConfig::from_env()?;
        let email = EmailConfig::from_env()?;
        let messaging = MessagingConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            admin_email_domain,
            franchise_email_domain,
            reminder,
            email,
            messaging,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the base URL with any trailing slash removed.
    #[must_use]
    pub fn base_url_trimmed(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl ReminderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let utc_offset_minutes = get_env_or_default("REMINDER_UTC_OFFSET_MINUTES", "60")
            .parse::<i32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("REMINDER_UTC_OFFSET_MINUTES".to_string(), e.to_string())
            })?;
        let country_code = get_env_or_default("REMINDER_COUNTRY_CODE", "+234");

        if !country_code.starts_with('+') {
            return Err(ConfigError::InvalidEnvVar(
                "REMINDER_COUNTRY_CODE".to_string(),
                "must start with '+'".to_string(),
            ));
        }

        Ok(Self {
            utc_offset_minutes,
            country_code,
        })
    }
}

impl EmailConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let host = get_optional_env("SMTP_HOST");
        let username = get_optional_env("SMTP_USERNAME");
        let password = get_optional_env("SMTP_PASSWORD");
        let from_address = get_optional_env("SMTP_FROM");

        match (host, username, password, from_address) {
            (Some(smtp_host), Some(smtp_username), Some(password), Some(from_address)) => {
                let smtp_port = get_env_or_default("SMTP_PORT", "587")
                    .parse::<u16>()
                    .map_err(|e| {
                        ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string())
                    })?;

                Ok(Some(Self {
                    smtp_host,
                    smtp_port,
                    smtp_username,
                    smtp_password: SecretString::from(password),
                    from_address,
                }))
            }
            (None, None, None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "SMTP_*".to_string(),
                "SMTP_HOST, SMTP_USERNAME, SMTP_PASSWORD and SMTP_FROM must be set together"
                    .to_string(),
            )),
        }
    }
}

impl MessagingConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let access_token = get_optional_env("WHATSAPP_ACCESS_TOKEN");
        let phone_number_id = get_optional_env("WHATSAPP_PHONE_NUMBER_ID");

        match (access_token, phone_number_id) {
            (Some(token), Some(id)) => {
                // Real provider tokens are long and random; reject placeholders
                validate_secret_strength(&token, "WHATSAPP_ACCESS_TOKEN")?;
                Ok(Some(Self {
                    access_token: SecretString::from(token),
                    phone_number_id: id,
                }))
            }
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "WHATSAPP_*".to_string(),
                "Both WHATSAPP_ACCESS_TOKEN and WHATSAPP_PHONE_NUMBER_ID must be set together"
                    .to_string(),
            )),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real provider tokens have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the real provider token."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_base_url_trimmed() {
        let config = test_config("https://brightclass.co/");
        assert_eq!(config.base_url_trimmed(), "https://brightclass.co");
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config("http://localhost:3000");
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_messaging_config_debug_redacts_token() {
        let config = MessagingConfig {
            access_token: SecretString::from("EAAG-very-secret-token"),
            phone_number_id: "123456789".to_string(),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("123456789"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("EAAG-very-secret-token"));
    }

    fn test_config(base_url: &str) -> ServerConfig {
        ServerConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: base_url.to_string(),
            admin_email_domain: Some("brightclass.co".to_string()),
            franchise_email_domain: None,
            reminder: ReminderConfig {
                utc_offset_minutes: 60,
                country_code: "+234".to_string(),
            },
            email: None,
            messaging: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}
