//! Telegram run notifications.
//!
//! Optional: the notifier exists only when the `telegram` config section is
//! present. Delivery is a single request with no retries, and a failure is
//! the caller's to log and ignore — it never affects the run outcome.
//!
//! Security: the bot token is a credential. It appears in the request URL
//! (that is how the Bot API works) but never in log output; the logged
//! endpoint is redacted.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("client build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("telegram API rejected the message ({status}): {description}")]
    Api {
        status: StatusCode,
        description: String,
    },
}

/// Client for the Telegram Bot API `sendMessage` endpoint.
pub struct TelegramNotifier {
    http: Client,
    bot_token: String,
    chat_id: String,
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str, chat_id: &str) -> Result<Self, NotifyError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| NotifyError::Build(e.to_string()))?;
        Ok(Self {
            http,
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }

    /// Post one message to the configured chat.
    pub async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("{API_BASE}/bot{}/sendMessage", self.bot_token);
        debug!(
            target: "notify.telegram",
            endpoint = %redacted_endpoint(),
            "sending run notification"
        );

        let resp = self
            .http
            .post(&url)
            .json(&message_payload(&self.chat_id, text))
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;
        // The Bot API reports failures both ways: an HTTP status and an
        // `ok: false` envelope. Treat either as a rejection.
        let reply: ApiReply = serde_json::from_str(&body).unwrap_or(ApiReply {
            ok: status.is_success(),
            description: None,
        });

        if !status.is_success() || !reply.ok {
            return Err(NotifyError::Api {
                status,
                description: reply
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }

        debug!(target: "notify.telegram", "run notification delivered");
        Ok(())
    }
}

fn message_payload(chat_id: &str, text: &str) -> serde_json::Value {
    json!({ "chat_id": chat_id, "text": text })
}

fn redacted_endpoint() -> String {
    format!("{API_BASE}/bot<redacted>/sendMessage")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_chat_id_and_text() {
        let payload = message_payload("12345", "run complete");
        assert_eq!(payload["chat_id"], "12345");
        assert_eq!(payload["text"], "run complete");
    }

    #[test]
    fn logged_endpoint_never_contains_a_token() {
        let endpoint = redacted_endpoint();
        assert!(endpoint.contains("<redacted>"));
        assert!(!endpoint.contains("bot1"));
    }

    #[test]
    fn error_envelope_is_parsed() {
        let reply: ApiReply =
            serde_json::from_str(r#"{"ok":false,"description":"chat not found"}"#).unwrap();
        assert!(!reply.ok);
        assert_eq!(reply.description.as_deref(), Some("chat not found"));
    }
}
