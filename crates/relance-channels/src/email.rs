//! Email adapter (Resend-style API).
//!
//! The email is an operator notification, not a message to the client: it
//! carries the client's identity, phone number and the rendered text so the
//! operator can follow up by hand if SMS delivery is off.

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use relance_core::config::EmailConfig;
use relance_core::validate::escape_html;

use crate::channel::{Channel, OutboundReminder};
use crate::error::ChannelError;

const DEFAULT_BASE_URL: &str = "https://api.resend.com";

pub struct EmailChannel {
    client: reqwest::Client,
    config: EmailConfig,
    base_url: String,
}

impl EmailChannel {
    pub fn new(config: EmailConfig) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL.to_string())
    }

    /// Point the adapter at a different endpoint (tests, mock servers).
    pub fn with_base_url(config: EmailConfig, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn subject(reminder: &OutboundReminder) -> String {
        format!("Relance pour {}", reminder.display_name())
    }

    fn html_body(reminder: &OutboundReminder) -> String {
        let name = escape_html(&reminder.display_name());
        let telephone = escape_html(&reminder.telephone);
        let message = escape_html(&reminder.message).replace('\n', "<br>");
        format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
             <h2>Relance client</h2>\
             <p><strong>Client:</strong> {name}</p>\
             <p><strong>Téléphone:</strong> {telephone}</p>\
             <hr>\
             <p><strong>Message à envoyer:</strong></p>\
             <p style=\"background: #f5f5f5; padding: 15px; border-radius: 5px;\">{message}</p>\
             </div>"
        )
    }
}

#[async_trait]
impl Channel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, reminder: &OutboundReminder) -> Result<(), ChannelError> {
        let url = format!("{}/emails", self.base_url);

        debug!(client_id = %reminder.client_id, "sending notification email");

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&json!({
                "from": self.config.from,
                "to": [self.config.to],
                "subject": Self::subject(reminder),
                "html": Self::html_body(reminder),
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!(status, body = %body, "email provider error");
            return Err(ChannelError::Api { status, body });
        }
        Ok(())
    }
}
