//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [spotify]
//! client_id = "..."
//! client_secret = "..."
//! redirect_uri = "http://localhost:8888/callback"
//!
//! [server]
//! bind_address = "127.0.0.1:8888"
//! expose_tokens = false
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default listen address.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8888";

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g., project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MixtapeConfig {
    /// Provider application credentials (`[spotify]`).
    pub spotify: Option<SpotifySection>,

    /// Server configuration (`[server]`).
    pub server: Option<ServerSection>,
}

impl MixtapeConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    ///
    /// Credentials merge field-wise; the server section is replaced whole.
    pub fn merge(&mut self, other: MixtapeConfig) {
        if let Some(sp) = other.spotify {
            let base = self.spotify.get_or_insert_default();
            if sp.client_id.is_some() {
                base.client_id = sp.client_id;
            }
            if sp.client_secret.is_some() {
                base.client_secret = sp.client_secret;
            }
            if sp.redirect_uri.is_some() {
                base.redirect_uri = sp.redirect_uri;
            }
            if sp.scope.is_some() {
                base.scope = sp.scope;
            }
        }
        if let Some(sv) = other.server {
            self.server = Some(sv);
        }
    }

    /// The server section, defaulted when absent.
    pub fn server(&self) -> ServerSection {
        self.server.clone().unwrap_or_default()
    }

    /// Validate that the required provider credentials are present.
    pub fn validate(&self) -> Result<Credentials> {
        let spotify = self.spotify.clone().unwrap_or_default();
        Ok(Credentials {
            client_id: require(spotify.client_id, "client_id")?,
            client_secret: require(spotify.client_secret, "client_secret")?,
            redirect_uri: require(spotify.redirect_uri, "redirect_uri")?,
            scope: spotify.scope,
        })
    }
}

fn require(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingField {
            field: field.to_string(),
            context: "[spotify]".to_string(),
        }),
    }
}

/// Provider application credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifySection {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    /// Requested scope set; the OAuth client supplies a default when unset.
    pub scope: Option<String>,
}

/// Server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Address to bind the server to.
    pub bind_address: String,

    /// Directory of static assets served at the root, if any.
    pub public_dir: Option<PathBuf>,

    /// Include tokens in the post-login redirect fragment.
    /// Off by default; the browser never sees credentials.
    pub expose_tokens: bool,

    /// Enable permissive CORS.
    pub cors: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            public_dir: None,
            expose_tokens: false,
            cors: true,
        }
    }
}

/// Resolved provider credentials, post-validation.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: Option<String>,
}
