use async_trait::async_trait;
use chrono::{DateTime, Utc};

use relance_core::client::{Client, ClientPatch, NewClient};

use crate::error::StoreError;

/// Interface to the remote client store.
///
/// The production implementation is [`RestStore`](crate::rest::RestStore);
/// dispatch tests substitute an in-memory implementation. Implementations
/// must be `Send + Sync` so a single handle can serve all gateway handlers.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// All clients, newest first.
    async fn list(&self) -> Result<Vec<Client>, StoreError>;

    async fn create(&self, new: NewClient) -> Result<Client, StoreError>;

    async fn update(&self, id: &str, patch: ClientPatch) -> Result<Client, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Clients whose due date is non-null and ≤ `cutoff`, in store order.
    /// The same-day last-sent filter is applied in-process by the selector,
    /// not here.
    async fn due_on_or_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Client>, StoreError>;

    /// Set or clear the follow-up due date.
    async fn set_relance_date(
        &self,
        id: &str,
        date: Option<DateTime<Utc>>,
    ) -> Result<Client, StoreError>;

    /// Record a confirmed successful send. Never touches the due date.
    async fn mark_sent(&self, id: &str, at: DateTime<Utc>) -> Result<(), StoreError>;
}
