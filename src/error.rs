use thiserror::Error;

/// Errors that can occur while browsing recipes or persisting favorites
#[derive(Error, Debug)]
pub enum BrowseError {
    /// Failed to reach the recipe API
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body could not be decoded into the expected shape
    #[error("Failed to deserialize response: {0}")]
    Deserialization(String),

    /// Recipe id was malformed or unknown to the API
    #[error("No recipe with id {0}")]
    InvalidIdentifier(u64),

    /// Failed to read from the persistent favorites store
    #[error("Storage read error: {0}")]
    StorageRead(String),

    /// Failed to write to the persistent favorites store
    #[error("Storage write error: {0}")]
    StorageWrite(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl BrowseError {
    /// True for failures that should surface a retry affordance to the user.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BrowseError::Network(_) | BrowseError::Deserialization(_))
    }
}
