//! Application state shared across handlers.

use std::sync::Arc;

use mixtape_oauth::{OAuthConfig, Refresher, SharedSession, shared_session};
use mixtape_spotify::NowPlayingClient;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// OAuth client configuration.
    pub oauth: Arc<OAuthConfig>,

    /// Server configuration.
    pub config: Arc<ServerConfig>,

    /// The single in-process session.
    pub session: SharedSession,

    /// Background refresh task owner.
    pub refresher: Arc<Refresher>,

    /// Read-only Spotify Web API client.
    pub spotify: NowPlayingClient,
}

impl AppState {
    /// Create a new application state with a fresh session.
    pub fn new(oauth: OAuthConfig, config: ServerConfig) -> Self {
        let session = shared_session();
        let refresher = Arc::new(Refresher::new(oauth.clone(), session.clone()));
        Self {
            oauth: Arc::new(oauth),
            config: Arc::new(config),
            session,
            refresher,
            spotify: NowPlayingClient::new(),
        }
    }

    /// Replace the resource client. Tests point it at a local fixture.
    pub fn with_spotify_client(mut self, client: NowPlayingClient) -> Self {
        self.spotify = client;
        self
    }
}
