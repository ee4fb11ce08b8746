//! OAuth 2.0 authorization-code client for the Spotify Accounts service.
//!
//! Implements the token lifecycle for a single in-process user session:
//! obtain a token pair through the authorization-code handshake, cache it,
//! renew the access token in the background before it expires, and hand the
//! cached token to callers until the process exits.
//!
//! # Components
//!
//! - [`state`] — CSRF state nonce generation
//! - [`oauth`] — authorization URL, code exchange, token refresh
//! - [`session`] — process-lifetime token cache
//! - [`refresher`] — background access-token renewal task

pub mod error;
pub mod oauth;
pub mod refresher;
pub mod session;
pub mod state;

pub use error::{OAuthError, Result};
pub use oauth::{
    OAuthConfig, TokenResponse, build_authorization_url, exchange_code_for_tokens,
    refresh_access_token,
};
pub use refresher::Refresher;
pub use session::{EXPIRY_MARGIN_SECS, Session, SharedSession, TokenSet, now_millis, shared_session};
pub use state::{STATE_LENGTH, generate_state};
