//! Error types for the server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use mixtape_oauth::OAuthError;

/// Error type for the on-demand refresh route.
///
/// Maps to a status code with no body: callers poll this route blindly and
/// the interesting detail goes to the log, not the wire.
#[derive(Debug)]
pub struct RefreshError(OAuthError);

impl From<OAuthError> for RefreshError {
    fn from(err: OAuthError) -> Self {
        Self(err)
    }
}

impl IntoResponse for RefreshError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            OAuthError::NotAuthenticated(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_GATEWAY,
        };
        tracing::warn!(status = %status, error = %self.0, "Failed to obtain new access token");
        status.into_response()
    }
}
