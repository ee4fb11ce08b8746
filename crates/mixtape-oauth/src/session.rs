//! Process-lifetime session state for the single authorized user.
//!
//! Tokens live only in memory; a restart forces a fresh authorization flow.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::oauth::TokenResponse;

/// Safety margin subtracted from the provider-reported TTL, in seconds.
///
/// Renewal is scheduled slightly early so a request never races expiry.
pub const EXPIRY_MARGIN_SECS: u64 = 5;

/// Current Unix time in milliseconds.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

/// An access/refresh token pair with its effective expiry.
#[derive(Debug, Clone)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix millis at which the access token counts as stale.
    /// [`EXPIRY_MARGIN_SECS`] is already folded in.
    pub expires_at: u64,
    pub scope: String,
}

impl TokenSet {
    /// Whether the access token is stale at `now` (Unix millis).
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

/// Expiry instant for a grant issued at `now`.
fn effective_expiry(now: u64, expires_in: u64) -> u64 {
    now + expires_in.saturating_sub(EXPIRY_MARGIN_SECS) * 1000
}

/// The single in-process session.
///
/// Mutated by the callback handler (initial install) and by refresh firings
/// (access token + expiry overwrite). Shared as [`SharedSession`]; the lock
/// makes each token replacement atomic for readers.
#[derive(Debug, Default)]
pub struct Session {
    tokens: Option<TokenSet>,
    needs_reauth: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install tokens from an authorization-code exchange.
    pub fn install(&mut self, response: &TokenResponse, now: u64) {
        self.tokens = Some(TokenSet {
            access_token: response.access_token.clone(),
            refresh_token: response.refresh_token.clone().unwrap_or_default(),
            expires_at: effective_expiry(now, response.expires_in),
            scope: response.scope.clone().unwrap_or_default(),
        });
        self.needs_reauth = false;
    }

    /// Overwrite the access token and expiry after a refresh firing.
    ///
    /// Refresh grants may omit the refresh token and scope; the previous
    /// values stay in effect then.
    pub fn apply_refresh(&mut self, response: &TokenResponse, now: u64) {
        let (prev_refresh, prev_scope) = match &self.tokens {
            Some(t) => (t.refresh_token.clone(), t.scope.clone()),
            None => (String::new(), String::new()),
        };
        self.tokens = Some(TokenSet {
            access_token: response.access_token.clone(),
            refresh_token: response.refresh_token.clone().unwrap_or(prev_refresh),
            expires_at: effective_expiry(now, response.expires_in),
            scope: response.scope.clone().unwrap_or(prev_scope),
        });
        self.needs_reauth = false;
    }

    pub fn tokens(&self) -> Option<&TokenSet> {
        self.tokens.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.access_token.as_str())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.refresh_token.as_str())
    }

    pub fn expires_at(&self) -> Option<u64> {
        self.tokens.as_ref().map(|t| t.expires_at)
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_some()
    }

    /// Set when the background refresh loop gives up; a fresh login clears it.
    pub fn needs_reauth(&self) -> bool {
        self.needs_reauth
    }

    pub fn mark_needs_reauth(&mut self) {
        self.needs_reauth = true;
    }
}

/// Session shared across handlers and the refresh task.
pub type SharedSession = Arc<RwLock<Session>>;

/// Create a fresh shared session.
pub fn shared_session() -> SharedSession {
    Arc::new(RwLock::new(Session::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(access: &str, refresh: Option<&str>, expires_in: u64) -> TokenResponse {
        TokenResponse {
            access_token: access.to_string(),
            refresh_token: refresh.map(str::to_string),
            expires_in,
            scope: Some("user-read-currently-playing".to_string()),
            token_type: Some("Bearer".to_string()),
        }
    }

    #[test]
    fn test_install_applies_expiry_margin() {
        let mut session = Session::new();
        session.install(&response("A", Some("R"), 3600), 1_000_000);

        let tokens = session.tokens().unwrap();
        assert_eq!(tokens.access_token, "A");
        assert_eq!(tokens.refresh_token, "R");
        assert_eq!(tokens.expires_at, 1_000_000 + 3595 * 1000);
    }

    #[test]
    fn test_refresh_keeps_previous_refresh_token() {
        let mut session = Session::new();
        session.install(&response("A", Some("R"), 3600), 1_000_000);

        let mut refreshed = response("B", None, 3600);
        refreshed.scope = None;
        session.apply_refresh(&refreshed, 2_000_000);

        let tokens = session.tokens().unwrap();
        assert_eq!(tokens.access_token, "B");
        assert_eq!(tokens.refresh_token, "R");
        assert_eq!(tokens.scope, "user-read-currently-playing");
        assert_eq!(tokens.expires_at, 2_000_000 + 3595 * 1000);
    }

    #[test]
    fn test_refresh_rotates_refresh_token_when_present() {
        let mut session = Session::new();
        session.install(&response("A", Some("R"), 3600), 1_000_000);
        session.apply_refresh(&response("B", Some("R2"), 3600), 2_000_000);

        assert_eq!(session.refresh_token(), Some("R2"));
    }

    #[test]
    fn test_is_expired() {
        let mut session = Session::new();
        session.install(&response("A", Some("R"), 3600), 1_000_000);
        let tokens = session.tokens().unwrap();

        assert!(!tokens.is_expired(1_000_000));
        assert!(tokens.is_expired(1_000_000 + 3595 * 1000));
    }

    #[test]
    fn test_short_ttl_saturates_to_immediate_expiry() {
        let mut session = Session::new();
        session.install(&response("A", Some("R"), 3), 1_000_000);
        assert_eq!(session.expires_at(), Some(1_000_000));
    }

    #[test]
    fn test_install_clears_needs_reauth() {
        let mut session = Session::new();
        session.mark_needs_reauth();
        assert!(session.needs_reauth());

        session.install(&response("A", Some("R"), 3600), 1_000_000);
        assert!(!session.needs_reauth());
    }

    #[test]
    fn test_empty_session() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert!(session.access_token().is_none());
        assert!(session.expires_at().is_none());
    }
}
