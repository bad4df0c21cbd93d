use thiserror::Error;

/// Errors that can occur within any delivery adapter.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The stored phone number could not be normalized to a dialable form.
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    /// The HTTP request to the provider failed outright.
    #[error("Provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Provider responded {status}: {body}")]
    Api { status: u16, body: String },
}
