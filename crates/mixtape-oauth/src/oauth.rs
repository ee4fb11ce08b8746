//! OAuth 2.0 authorization-code flow against the Spotify Accounts service.

use serde::Deserialize;

use crate::error::{OAuthError, Result};

/// Spotify Accounts authorize endpoint.
pub const SPOTIFY_AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";

/// Spotify Accounts token endpoint.
pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Scope granting read access to the currently-playing resource.
pub const DEFAULT_SCOPE: &str = "user-read-currently-playing";

/// OAuth client configuration for one registered application.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub redirect_uri: String,
    pub scope: String,
}

impl OAuthConfig {
    /// Create a config for the Spotify Accounts service.
    pub fn spotify(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authorize_url: SPOTIFY_AUTHORIZE_URL.to_string(),
            token_url: SPOTIFY_TOKEN_URL.to_string(),
            redirect_uri: redirect_uri.into(),
            scope: DEFAULT_SCOPE.to_string(),
        }
    }

    /// Override the requested scope set.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Override the token endpoint. Tests point this at a local fixture.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }
}

/// Build the authorization URL for the user-agent redirect.
pub fn build_authorization_url(config: &OAuthConfig, state: &str) -> String {
    let params = [
        ("response_type", "code"),
        ("client_id", config.client_id.as_str()),
        ("scope", config.scope.as_str()),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("state", state),
    ];

    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", config.authorize_url, query)
}

/// Token endpoint response, for both grant types.
///
/// `refresh_token` and `scope` may be absent on refresh grants; the caller
/// keeps the previous values in that case.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: u64,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Exchange an authorization code for an access/refresh token pair.
pub async fn exchange_code_for_tokens(config: &OAuthConfig, code: &str) -> Result<TokenResponse> {
    let form = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", config.redirect_uri.as_str()),
    ];
    post_token_request(config, &form).await
}

/// Obtain a new access token using a refresh token.
pub async fn refresh_access_token(
    config: &OAuthConfig,
    refresh_token: &str,
) -> Result<TokenResponse> {
    let form = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
    ];
    post_token_request(config, &form).await
}

/// POST a form-encoded grant request with Basic client authentication.
async fn post_token_request(config: &OAuthConfig, form: &[(&str, &str)]) -> Result<TokenResponse> {
    let client = reqwest::Client::new();
    let response = client
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(form)
        .send()
        .await
        .map_err(|e| OAuthError::Network(format!("Token request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(OAuthError::Provider(format!(
            "Token endpoint returned {}: {}",
            status, error_text
        )));
    }

    response
        .json()
        .await
        .map_err(|e| OAuthError::Serialization(format!("Failed to parse token response: {}", e)))
}
