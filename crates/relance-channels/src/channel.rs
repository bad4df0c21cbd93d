use async_trait::async_trait;

use crate::error::ChannelError;

/// One personalized follow-up, ready for delivery.
#[derive(Debug, Clone)]
pub struct OutboundReminder {
    pub client_id: String,
    pub prenom: String,
    pub nom: String,
    /// Raw phone number as stored; adapters normalize at send time.
    pub telephone: String,
    /// Rendered message — the template token is already substituted.
    pub message: String,
}

impl OutboundReminder {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom)
    }
}

/// Common interface implemented by every delivery adapter (SMS, email).
///
/// Implementations must be `Send + Sync` so the dispatcher can hold them as
/// trait objects and drive them sequentially from a Tokio task.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Stable lowercase identifier (`"sms"`, `"email"`), used as the key in
    /// run reports.
    fn name(&self) -> &'static str;

    /// Deliver one reminder. A failure is recorded against the client and
    /// never aborts the dispatch run.
    async fn send(&self, reminder: &OutboundReminder) -> Result<(), ChannelError>;
}
