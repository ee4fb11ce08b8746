//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Include tokens in the post-login redirect fragment.
    /// Off by default; the browser never sees credentials.
    pub expose_tokens: bool,

    /// Enable permissive CORS.
    pub cors: bool,

    /// Directory of static assets served at the root, if any.
    pub public_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8888".parse().unwrap(),
            expose_tokens: false,
            cors: true,
            public_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Enable or disable token exposure in the post-login fragment.
    pub fn with_expose_tokens(mut self, enabled: bool) -> Self {
        self.expose_tokens = enabled;
        self
    }

    /// Enable or disable CORS.
    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }

    /// Set the static asset directory.
    pub fn with_public_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.public_dir = dir;
        self
    }
}
