//! HTTP surface for the mixtape OAuth bridge.
//!
//! Routes:
//!
//! - `GET /login` — start the authorization-code flow
//! - `GET /callback` — provider redirect target
//! - `GET /refresh_token` — on-demand token refresh
//! - `GET /song` — now-playing proxy
//! - `GET /health` — liveness
//!
//! Static assets are served at the root when a public directory is
//! configured.
//!
//! # Example
//!
//! ```ignore
//! use mixtape_oauth::OAuthConfig;
//! use mixtape_server::{AppState, Server, ServerConfig};
//!
//! let oauth = OAuthConfig::spotify(client_id, client_secret, redirect_uri);
//! let state = AppState::new(oauth, ServerConfig::default());
//! Server::new(state).run().await?;
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::RefreshError;
pub use routes::STATE_COOKIE;
pub use state::AppState;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The mixtape HTTP server.
pub struct Server {
    /// Application state.
    state: AppState,
}

impl Server {
    /// Create a new server from a pre-built application state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/login", get(routes::login_handler))
            .route("/callback", get(routes::callback_handler))
            .route("/refresh_token", get(routes::refresh_handler))
            .route("/song", get(routes::song_handler))
            .route("/health", get(routes::health_handler));

        if let Some(dir) = &self.state.config.public_dir {
            router = router.fallback_service(ServeDir::new(dir));
        }

        let mut router = router.with_state(self.state.clone());

        if self.state.config.cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        router.layer(TraceLayer::new_for_http())
    }

    /// Run the server.
    pub async fn run(self) -> std::io::Result<()> {
        let addr = self.state.config.bind_address;
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!(addr = %local_addr, "Listening");
        axum::serve(listener, self.router()).await
    }
}
