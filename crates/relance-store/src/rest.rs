//! REST implementation of [`ClientStore`] for a PostgREST-style data service.
//!
//! The service exposes the `clients` table at `{url}/rest/v1/clients` with
//! query-string filters (`date_relance=lte.<ts>`, `id=eq.<id>`) and returns
//! affected rows when asked via `Prefer: return=representation`.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use relance_core::client::{Client, ClientPatch, NewClient};
use relance_core::config::StoreConfig;

use crate::error::StoreError;
use crate::store::ClientStore;

pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/clients", self.base_url)
    }

    /// Apply the service's auth headers (API key + Bearer of the same key).
    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Err(StoreError::Api { status, body })
    }

    /// PATCH one row by id and return the updated record.
    async fn patch_one(
        &self,
        id: &str,
        body: &serde_json::Value,
    ) -> Result<Client, StoreError> {
        let builder = self
            .client
            .patch(self.endpoint())
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(body);
        let resp = Self::check(self.apply_auth(builder).send().await?).await?;
        let mut rows: Vec<Client> = resp.json().await?;
        rows.pop().ok_or_else(|| StoreError::NotFound {
            id: id.to_string(),
        })
    }
}

fn ts(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl ClientStore for RestStore {
    async fn list(&self) -> Result<Vec<Client>, StoreError> {
        let builder = self
            .client
            .get(self.endpoint())
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let resp = Self::check(self.apply_auth(builder).send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn create(&self, new: NewClient) -> Result<Client, StoreError> {
        // The service expects a row array on insert.
        let builder = self
            .client
            .post(self.endpoint())
            .header("Prefer", "return=representation")
            .json(&vec![new]);
        let resp = Self::check(self.apply_auth(builder).send().await?).await?;
        let mut rows: Vec<Client> = resp.json().await?;
        rows.pop().ok_or(StoreError::Api {
            status: 200,
            body: "insert returned no row".to_string(),
        })
    }

    async fn update(&self, id: &str, patch: ClientPatch) -> Result<Client, StoreError> {
        let body = serde_json::to_value(&patch)?;
        self.patch_one(id, &body).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let builder = self
            .client
            .delete(self.endpoint())
            .query(&[("id", format!("eq.{id}"))]);
        Self::check(self.apply_auth(builder).send().await?).await?;
        Ok(())
    }

    async fn due_on_or_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Client>, StoreError> {
        debug!(cutoff = %ts(cutoff), "querying due clients");
        let builder = self.client.get(self.endpoint()).query(&[
            ("select", "*".to_string()),
            ("date_relance", "not.is.null".to_string()),
            ("date_relance", format!("lte.{}", ts(cutoff))),
        ]);
        let resp = Self::check(self.apply_auth(builder).send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn set_relance_date(
        &self,
        id: &str,
        date: Option<DateTime<Utc>>,
    ) -> Result<Client, StoreError> {
        let body = serde_json::json!({ "date_relance": date.map(ts) });
        self.patch_one(id, &body).await
    }

    async fn mark_sent(&self, id: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let body = serde_json::json!({ "relance_envoyee_at": ts(at) });
        self.patch_one(id, &body).await?;
        Ok(())
    }
}
