use thiserror::Error;

/// Errors surfaced by the remote client store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The HTTP request itself failed (DNS, TLS, timeout, …).
    #[error("Store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("Store responded {status}: {body}")]
    Api { status: u16, body: String },

    /// No row matched the given identifier.
    #[error("Client not found: {id}")]
    NotFound { id: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
