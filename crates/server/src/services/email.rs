//! Email service for verification links and welcome notifications.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// HTML template for the verification link email.
#[derive(Template)]
#[template(path = "email/verify_link.html")]
struct VerifyLinkEmailHtml<'a> {
    portal: &'a str,
    verify_url: &'a str,
    ttl_hours: i64,
}

/// Plain text template for the verification link email.
#[derive(Template)]
#[template(path = "email/verify_link.txt")]
struct VerifyLinkEmailText<'a> {
    portal: &'a str,
    verify_url: &'a str,
    ttl_hours: i64,
}

/// HTML template for the franchise welcome email.
#[derive(Template)]
#[template(path = "email/franchise_welcome.html")]
struct FranchiseWelcomeEmailHtml<'a> {
    name: &'a str,
    portal_url: &'a str,
}

/// Plain text template for the franchise welcome email.
#[derive(Template)]
#[template(path = "email/franchise_welcome.txt")]
struct FranchiseWelcomeEmailText<'a> {
    name: &'a str,
    portal_url: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay parameters are invalid.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send a signup verification link.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_verification_email(
        &self,
        to: &str,
        portal: &str,
        verify_url: &str,
        ttl_hours: i64,
    ) -> Result<(), EmailError> {
        let html = VerifyLinkEmailHtml {
            portal,
            verify_url,
            ttl_hours,
        }
        .render()?;
        let text = VerifyLinkEmailText {
            portal,
            verify_url,
            ttl_hours,
        }
        .render()?;

        self.send_multipart_email(to, "Verify your Brightclass email address", &text, &html)
            .await
    }

    /// Send the franchise partner welcome email after verification.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_franchise_welcome(
        &self,
        to: &str,
        name: &str,
        portal_url: &str,
    ) -> Result<(), EmailError> {
        let html = FranchiseWelcomeEmailHtml { name, portal_url }.render()?;
        let text = FranchiseWelcomeEmailText { name, portal_url }.render()?;

        self.send_multipart_email(to, "Welcome to the Brightclass partner network", &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_link_templates_render() {
        let html = VerifyLinkEmailHtml {
            portal: "staff",
            verify_url: "https://brightclass.co/staff/verify-email?token=abc123",
            ttl_hours: 24,
        }
        .render()
        .unwrap();
        assert!(html.contains("staff"));
        assert!(html.contains("token=abc123"));
        assert!(html.contains("24 hours"));

        let text = VerifyLinkEmailText {
            portal: "franchise",
            verify_url: "https://brightclass.co/franchise/verify-email?token=abc123",
            ttl_hours: 168,
        }
        .render()
        .unwrap();
        assert!(text.contains("franchise"));
        assert!(text.contains("168 hours"));
    }

    #[test]
    fn test_franchise_welcome_templates_render() {
        let html = FranchiseWelcomeEmailHtml {
            name: "Ada",
            portal_url: "https://brightclass.co/franchise",
        }
        .render()
        .unwrap();
        assert!(html.contains("Ada"));

        let text = FranchiseWelcomeEmailText {
            name: "Ada",
            portal_url: "https://brightclass.co/franchise",
        }
        .render()
        .unwrap();
        assert!(text.contains("https://brightclass.co/franchise"));
    }
}
