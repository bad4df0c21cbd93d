//! Transactional SMS adapter (Brevo-style API).

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use relance_core::config::SmsConfig;

use crate::channel::{Channel, OutboundReminder};
use crate::error::ChannelError;
use crate::phone;

const DEFAULT_BASE_URL: &str = "https://api.brevo.com";

pub struct SmsChannel {
    client: reqwest::Client,
    config: SmsConfig,
    base_url: String,
}

impl SmsChannel {
    pub fn new(config: SmsConfig) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL.to_string())
    }

    /// Point the adapter at a different endpoint (tests, mock servers).
    pub fn with_base_url(config: SmsConfig, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn content(&self, reminder: &OutboundReminder) -> String {
        match &self.config.prefix {
            Some(prefix) => format!("{prefix} - {}", reminder.message),
            None => reminder.message.clone(),
        }
    }
}

#[async_trait]
impl Channel for SmsChannel {
    fn name(&self) -> &'static str {
        "sms"
    }

    async fn send(&self, reminder: &OutboundReminder) -> Result<(), ChannelError> {
        let recipient = phone::normalize(&reminder.telephone)?;
        let url = format!("{}/v3/transactionalSMS/send", self.base_url);

        debug!(client_id = %reminder.client_id, "sending SMS");

        let resp = self
            .client
            .post(&url)
            .header("api-key", &self.config.api_key)
            .header("accept", "application/json")
            .json(&json!({
                "sender": self.config.sender,
                "recipient": recipient,
                "content": self.content(reminder),
                "type": "transactional",
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!(status, body = %body, "SMS provider error");
            return Err(ChannelError::Api { status, body });
        }
        Ok(())
    }
}
