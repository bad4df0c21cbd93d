//! Structured results of a dispatch run.

use serde::Serialize;

/// Outcome of one channel attempt for one client.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelOutcome {
    pub channel: &'static str,
    pub sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-client report item.
#[derive(Debug, Clone, Serialize)]
pub struct ClientOutcome {
    pub client_id: String,
    pub name: String,
    pub telephone: String,
    /// True iff at least one channel accepted the message.
    pub sent: bool,
    pub channels: Vec<ChannelOutcome>,
    /// Validation failure recorded before any channel was attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

/// Channel-level error detail, included only for verbose (debug) runs.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchErrorDetail {
    pub client: String,
    pub channel: String,
    pub error: String,
}

/// Aggregate result of a dispatch run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
    pub summary: String,
    pub results: Vec<ClientOutcome>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<DispatchErrorDetail>,
}

impl RunReport {
    pub fn new(results: Vec<ClientOutcome>, errors: Vec<DispatchErrorDetail>) -> Self {
        let total = results.len();
        let sent = results.iter().filter(|r| r.sent).count();
        let failed = total - sent;
        let summary = format!("{sent} sent, {failed} failed out of {total} due client(s)");
        Self {
            total,
            sent,
            failed,
            summary,
            results,
            errors,
        }
    }
}
