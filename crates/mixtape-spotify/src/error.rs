//! Error types for the Spotify Web API client.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, SpotifyError>;

/// Errors that can occur talking to the Spotify Web API.
#[derive(Debug, thiserror::Error)]
pub enum SpotifyError {
    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(String),

    /// API returned a non-success status.
    #[error("Spotify API returned status {0}")]
    Status(u16),

    /// Payload did not match the expected shape.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for SpotifyError {
    fn from(e: reqwest::Error) -> Self {
        SpotifyError::Network(e.to_string())
    }
}
