//! In-memory store and stub channel shared by the selector and dispatcher
//! tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use relance_channels::{Channel, ChannelError, OutboundReminder};
use relance_core::client::{Client, ClientPatch, NewClient};
use relance_store::{ClientStore, StoreError};

pub fn client_due(
    id: &str,
    date_relance: Option<DateTime<Utc>>,
    relance_envoyee_at: Option<DateTime<Utc>>,
) -> Client {
    Client {
        id: id.to_string(),
        prenom: "Léa".to_string(),
        nom: "Martin".to_string(),
        telephone: "06 12 34 56 78".to_string(),
        message_relance: "Bonjour {{prenom}}, votre suivi est prévu.".to_string(),
        date_relance,
        relance_envoyee_at,
        created_at: "2025-01-01T00:00:00Z".parse().unwrap(),
    }
}

pub struct MemoryStore {
    clients: Mutex<Vec<Client>>,
    fail: bool,
    fail_mark_sent: bool,
}

impl MemoryStore {
    pub fn with_clients(clients: Vec<Client>) -> Self {
        Self {
            clients: Mutex::new(clients),
            fail: false,
            fail_mark_sent: false,
        }
    }

    /// A store whose every operation errors, for fatal-path tests.
    pub fn failing() -> Self {
        Self {
            clients: Mutex::new(Vec::new()),
            fail: true,
            fail_mark_sent: false,
        }
    }

    /// A store that serves everything normally but errors on every marker
    /// write, for lost-marker tests.
    pub fn failing_mark_sent(clients: Vec<Client>) -> Self {
        Self {
            clients: Mutex::new(clients),
            fail: false,
            fail_mark_sent: true,
        }
    }

    pub fn get(&self, id: &str) -> Option<Client> {
        self.clients
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    fn check_fail(&self) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Api {
                status: 503,
                body: "store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ClientStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Client>, StoreError> {
        self.check_fail()?;
        let mut clients = self.clients.lock().unwrap().clone();
        clients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(clients)
    }

    async fn create(&self, new: NewClient) -> Result<Client, StoreError> {
        self.check_fail()?;
        let client = Client {
            id: uuid::Uuid::new_v4().to_string(),
            prenom: new.prenom,
            nom: new.nom,
            telephone: new.telephone,
            message_relance: new.message_relance,
            date_relance: new.date_relance,
            relance_envoyee_at: None,
            created_at: Utc::now(),
        };
        self.clients.lock().unwrap().push(client.clone());
        Ok(client)
    }

    async fn update(&self, id: &str, patch: ClientPatch) -> Result<Client, StoreError> {
        self.check_fail()?;
        let mut clients = self.clients.lock().unwrap();
        let client = clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        if let Some(prenom) = patch.prenom {
            client.prenom = prenom;
        }
        if let Some(nom) = patch.nom {
            client.nom = nom;
        }
        if let Some(telephone) = patch.telephone {
            client.telephone = telephone;
        }
        if let Some(message) = patch.message_relance {
            client.message_relance = message;
        }
        if let Some(date) = patch.date_relance {
            client.date_relance = date;
        }
        Ok(client.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.check_fail()?;
        let mut clients = self.clients.lock().unwrap();
        let before = clients.len();
        clients.retain(|c| c.id != id);
        if clients.len() == before {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        Ok(())
    }

    async fn due_on_or_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Client>, StoreError> {
        self.check_fail()?;
        Ok(self
            .clients
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c.date_relance, Some(due) if due <= cutoff))
            .cloned()
            .collect())
    }

    async fn set_relance_date(
        &self,
        id: &str,
        date: Option<DateTime<Utc>>,
    ) -> Result<Client, StoreError> {
        self.update(
            id,
            ClientPatch {
                date_relance: Some(date),
                ..ClientPatch::default()
            },
        )
        .await
    }

    async fn mark_sent(&self, id: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.check_fail()?;
        if self.fail_mark_sent {
            return Err(StoreError::Api {
                status: 503,
                body: "marker write failed".to_string(),
            });
        }
        let mut clients = self.clients.lock().unwrap();
        let client = clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        client.relance_envoyee_at = Some(at);
        Ok(())
    }
}

/// Stub channel: succeeds for everyone except the client IDs in `fail_for`,
/// records every delivery it accepted and the instant of every call.
pub struct StubChannel {
    name: &'static str,
    fail_for: Vec<String>,
    pub delivered: Mutex<Vec<String>>,
    pub call_instants: Mutex<Vec<tokio::time::Instant>>,
}

impl StubChannel {
    pub fn ok(name: &'static str) -> Self {
        Self {
            name,
            fail_for: Vec::new(),
            delivered: Mutex::new(Vec::new()),
            call_instants: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_for(name: &'static str, ids: &[&str]) -> Self {
        Self {
            name,
            fail_for: ids.iter().map(|s| s.to_string()).collect(),
            delivered: Mutex::new(Vec::new()),
            call_instants: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Channel for StubChannel {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(&self, reminder: &OutboundReminder) -> Result<(), ChannelError> {
        self.call_instants
            .lock()
            .unwrap()
            .push(tokio::time::Instant::now());
        if self.fail_for.contains(&reminder.client_id) {
            return Err(ChannelError::Api {
                status: 400,
                body: "provider rejected the message".to_string(),
            });
        }
        self.delivered.lock().unwrap().push(reminder.client_id.clone());
        Ok(())
    }
}
