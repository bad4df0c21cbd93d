use thiserror::Error;

/// Shared error taxonomy for config loading and input validation. Store and
/// channel failures carry their own error types in their own crates.
#[derive(Debug, Error)]
pub enum RelanceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl RelanceError {
    /// Short error code string included in HTTP error responses.
    pub fn code(&self) -> &'static str {
        match self {
            RelanceError::Config(_) => "CONFIG_ERROR",
            RelanceError::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, RelanceError>;
