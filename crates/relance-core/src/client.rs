use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A client record as held by the remote data service.
///
/// `date_relance` and `relance_envoyee_at` drive the reminder logic:
/// a client is due when the former has passed (Europe/Paris) and the latter
/// does not fall on today's Paris calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Opaque unique key issued by the store.
    pub id: String,
    pub prenom: String,
    pub nom: String,
    /// Free text in whatever format the operator typed; normalized only at
    /// send time.
    pub telephone: String,
    /// Follow-up message template; may contain the `{{prenom}}` token.
    #[serde(default)]
    pub message_relance: String,
    /// Follow-up due date. `None` means no reminder is scheduled.
    #[serde(default)]
    pub date_relance: Option<DateTime<Utc>>,
    /// Last-sent marker; written exclusively by the dispatcher after a
    /// confirmed successful send.
    #[serde(default)]
    pub relance_envoyee_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom)
    }
}

/// Fields accepted when creating a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
    pub prenom: String,
    pub nom: String,
    pub telephone: String,
    #[serde(default)]
    pub message_relance: String,
    #[serde(default)]
    pub date_relance: Option<DateTime<Utc>>,
}

/// Partial update; absent fields are left untouched.
///
/// `date_relance` is doubly optional so that an explicit `null` clears the
/// due date while an absent field leaves it alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prenom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_relance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_relance: Option<Option<DateTime<Utc>>>,
}
