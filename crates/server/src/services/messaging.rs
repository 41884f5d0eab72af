//! WhatsApp Cloud API client for class reminder messages.
//!
//! Thin JSON client over the Graph API's `/{phone-number-id}/messages`
//! endpoint. Send failures are reported per message and never retried;
//! the reminder scan tolerates individual failures.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use brightclass_core::Phone;

use crate::config::MessagingConfig;

/// Graph API base URL.
const GRAPH_API_BASE: &str = "https://graph.facebook.com/v21.0";

/// Errors that can occur when sending a chat message.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// HTTP request failed.
    #[error("request error: {0}")]
    Request(String),

    /// Provider returned an error response.
    #[error("provider error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// WhatsApp Cloud API client.
#[derive(Clone)]
pub struct MessagingClient {
    client: Client,
    access_token: SecretString,
    phone_number_id: String,
}

impl std::fmt::Debug for MessagingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagingClient")
            .field("access_token", &"[REDACTED]")
            .field("phone_number_id", &self.phone_number_id)
            .finish_non_exhaustive()
    }
}

/// Subset of the provider's send response we care about.
#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    messages: Vec<SentMessage>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    id: String,
}

impl MessagingClient {
    /// Create a new messaging client.
    #[must_use]
    pub fn new(config: &MessagingConfig) -> Self {
        Self {
            client: Client::new(),
            access_token: config.access_token.clone(),
            phone_number_id: config.phone_number_id.clone(),
        }
    }

    /// Send a plain text message to a normalized phone number.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider rejects it.
    #[instrument(skip(self, body), fields(to = %to))]
    pub async fn send_text(&self, to: &Phone, body: &str) -> Result<(), MessagingError> {
        let url = format!("{GRAPH_API_BASE}/{}/messages", self.phone_number_id);

        let payload = serde_json::json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": to.as_str(),
            "type": "text",
            "text": { "body": body }
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.access_token.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| MessagingError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MessagingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let result: SendResponse = response
            .json()
            .await
            .map_err(|e| MessagingError::Request(e.to_string()))?;

        debug!(
            message_id = ?result.messages.first().map(|m| m.id.as_str()),
            "Chat message accepted by provider"
        );

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let client = MessagingClient::new(&MessagingConfig {
            access_token: SecretString::from("EAAG0token0value"),
            phone_number_id: "15550001111".to_string(),
        });

        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(debug_output.contains("15550001111"));
        assert!(!debug_output.contains("EAAG0token0value"));
    }

    #[test]
    fn test_send_response_parses_with_and_without_messages() {
        let with: SendResponse =
            serde_json::from_str(r#"{"messages":[{"id":"wamid.123"}]}"#).unwrap();
        assert_eq!(with.messages.first().map(|m| m.id.as_str()), Some("wamid.123"));

        let without: SendResponse = serde_json::from_str("{}").unwrap();
        assert!(without.messages.is_empty());
    }
}
