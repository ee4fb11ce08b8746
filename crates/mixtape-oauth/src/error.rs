//! Error types for the OAuth client.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, OAuthError>;

/// Errors that can occur in the OAuth client.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(String),

    /// Provider token endpoint returned an error.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No usable credentials in the session.
    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),
}

impl From<reqwest::Error> for OAuthError {
    fn from(e: reqwest::Error) -> Self {
        OAuthError::Network(e.to_string())
    }
}
