//! WhatsApp notifier — delivers a generated match profile over the
//! UltraMsg gateway.
//!
//! One synchronous POST per delivery: `{base}/{instance_id}/messages/chat`
//! with a URL-encoded form carrying the API token, destination number, and
//! message body. No retry and no idempotency key, so a duplicate
//! submission produces a duplicate outbound message.

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

const ULTRAMSG_BASE_URL: &str = "https://api.ultramsg.com";

#[derive(Debug, Error)]
pub enum WhatsAppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway error (status {status}): {message}")]
    Gateway { status: u16, message: String },

    #[error("Gateway rejected the message: {0}")]
    Rejected(String),
}

/// Parsed gateway response for a delivered message.
#[derive(Debug, Clone)]
pub struct SendReceipt {
    pub response: Value,
}

/// UltraMsg API client.
#[derive(Debug, Clone)]
pub struct WhatsAppClient {
    client: Client,
    base_url: String,
    instance_id: String,
    token: String,
}

impl WhatsAppClient {
    pub fn new(instance_id: String, token: String) -> Self {
        Self::with_base_url(instance_id, token, ULTRAMSG_BASE_URL.to_string())
    }

    /// Points the client at an alternative gateway host; used by tests to
    /// target a mock server.
    pub fn with_base_url(instance_id: String, token: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            instance_id,
            token,
        }
    }

    /// Sends one chat message to `to` (E.164-style number with leading '+').
    ///
    /// Success is an HTTP 2xx whose JSON body carries no `error` key. Every
    /// failure path is logged before being returned; callers surface the
    /// error to the user instead of raising.
    pub async fn send_chat(&self, to: &str, body: &str) -> Result<SendReceipt, WhatsAppError> {
        let url = format!("{}/{}/messages/chat", self.base_url, self.instance_id);
        let form = [("token", self.token.as_str()), ("to", to), ("body", body)];

        let result = self.send_chat_inner(&url, &form).await;
        match &result {
            Ok(_) => info!("WhatsApp message delivered to {to}"),
            Err(e) => error!("WhatsApp delivery to {to} failed: {e}"),
        }
        result
    }

    async fn send_chat_inner(
        &self,
        url: &str,
        form: &[(&str, &str); 3],
    ) -> Result<SendReceipt, WhatsAppError> {
        let response = self.client.post(url).form(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WhatsAppError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        let response: Value = response.json().await?;
        if let Some(err) = response.get("error") {
            let message = match err {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(WhatsAppError::Rejected(message));
        }

        Ok(SendReceipt { response })
    }
}

/// Wraps a generated profile into the message body sent to the user.
pub fn format_message_body(user_name: &str, profile: &str) -> String {
    format!(
        "Assalam-o-Alaikum {user_name},\n\n\
         Your request has been processed and a match was found for you.\n\
         Here are the details:\n\n\
         {profile}\n\n\
         Hope the details meet your expectations!\n\
         If interested, reply to arrange the next steps."
    )
}
