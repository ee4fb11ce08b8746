//! Serve command - runs the OAuth bridge server.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mixtape_config::{apply_env_overrides, load_config, load_config_file};
use mixtape_oauth::OAuthConfig;
use mixtape_server::{AppState, Server, ServerConfig};
use tracing::info;

/// Arguments for the serve command.
///
/// CLI arguments override config file and environment values.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on (overrides config; or set PORT env var)
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind to (overrides config)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Directory of static assets to serve at the root (overrides config)
    #[arg(long)]
    pub public_dir: Option<PathBuf>,

    /// Include tokens in the post-login redirect fragment (unsafe)
    #[arg(long)]
    pub expose_tokens: bool,

    /// Path to config file (overrides default discovery)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the serve command.
pub async fn run(args: ServeArgs) -> Result<()> {
    // ── Load configuration ──────────────────────────────────────────────

    let mut config = if let Some(ref path) = args.config {
        // Explicit config file
        let config = load_config_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?;
        info!(path = %path.display(), "Loaded config");
        config
    } else {
        let loaded = load_config(None)?;
        for path in loaded.loaded_from() {
            info!(path = %path.display(), "Loaded config");
        }
        loaded.config
    };
    apply_env_overrides(&mut config);

    let credentials = config.validate()?;
    let server_section = config.server();

    // ── Resolve bind address (CLI > config) ─────────────────────────────

    let mut bind_address: SocketAddr = server_section
        .bind_address
        .parse()
        .with_context(|| format!("invalid bind_address '{}'", server_section.bind_address))?;
    if let Some(ref bind) = args.bind {
        bind_address = bind
            .parse()
            .with_context(|| format!("invalid bind address '{}'", bind))?;
    }
    if let Some(port) = args.port {
        bind_address.set_port(port);
    }

    // ── Build state and serve ───────────────────────────────────────────

    let mut oauth = OAuthConfig::spotify(
        credentials.client_id,
        credentials.client_secret,
        credentials.redirect_uri,
    );
    if let Some(scope) = credentials.scope {
        oauth = oauth.with_scope(scope);
    }

    let server_config = ServerConfig::new()
        .with_bind_address(bind_address)
        .with_expose_tokens(args.expose_tokens || server_section.expose_tokens)
        .with_cors(server_section.cors)
        .with_public_dir(args.public_dir.or(server_section.public_dir));

    let state = AppState::new(oauth, server_config);
    Server::new(state).run().await.context("server error")?;

    Ok(())
}
