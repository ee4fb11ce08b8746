//! Background access-token renewal.
//!
//! The schedule is an explicit task: sleep until the session's stored
//! expiry, refresh, continue on success, exit on failure. A failed firing is
//! fatal to the session (it is marked as needing re-authentication), not to
//! the process; a fresh login flow recovers.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::{OAuthError, Result};
use crate::oauth::{OAuthConfig, refresh_access_token};
use crate::session::{SharedSession, now_millis};

/// Owns the background refresh task for the process session.
///
/// Re-arming aborts the previous task, so there is never more than one
/// pending refresh no matter how many times the user logs in.
#[derive(Debug)]
pub struct Refresher {
    config: OAuthConfig,
    session: SharedSession,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Refresher {
    pub fn new(config: OAuthConfig, session: SharedSession) -> Self {
        Self {
            config,
            session,
            task: Mutex::new(None),
        }
    }

    /// Arm the refresh task against the session's current expiry.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn arm(&self) {
        let mut slot = self.task.lock();
        if let Some(previous) = slot.take() {
            if !previous.is_finished() {
                debug!("Aborting previously armed refresh task");
                previous.abort();
            }
        }
        let config = self.config.clone();
        let session = self.session.clone();
        *slot = Some(tokio::spawn(run_refresh_loop(config, session)));
    }

    /// Whether a refresh task is currently armed.
    pub fn is_armed(&self) -> bool {
        self.task.lock().as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Fire a refresh immediately, outside the armed schedule.
    ///
    /// Uses `refresh_token` when given, otherwise the session's stored one.
    /// Returns the new access token; a failure leaves the session as it was.
    pub async fn refresh_now(&self, refresh_token: Option<&str>) -> Result<String> {
        let stored = self
            .session
            .read()
            .await
            .refresh_token()
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let token = refresh_token
            .map(str::to_string)
            .or(stored)
            .ok_or_else(|| {
                OAuthError::NotAuthenticated(
                    "No refresh token in session; complete the login flow first".to_string(),
                )
            })?;

        let response = refresh_access_token(&self.config, &token).await?;
        let mut session = self.session.write().await;
        session.apply_refresh(&response, now_millis());
        info!("New access token obtained");
        Ok(response.access_token)
    }
}

/// Sleep until the session's expiry, refresh, repeat.
///
/// Exits when the session holds no tokens or a firing fails.
async fn run_refresh_loop(config: OAuthConfig, session: SharedSession) {
    loop {
        let deadline = session.read().await.expires_at();
        let Some(deadline) = deadline else {
            debug!("Refresh task exiting: session holds no tokens");
            return;
        };

        let now = now_millis();
        if deadline > now {
            info!(sleep_ms = deadline - now, "Refresh task armed");
            tokio::time::sleep(Duration::from_millis(deadline - now)).await;
        }

        // An on-demand refresh may have replaced the tokens while we slept;
        // sleep again against the new deadline instead of firing early.
        let (current_deadline, refresh_token) = {
            let guard = session.read().await;
            (
                guard.expires_at(),
                guard.refresh_token().map(str::to_string),
            )
        };
        match current_deadline {
            Some(d) if d > deadline => continue,
            Some(_) => {}
            None => {
                debug!("Refresh task exiting: session holds no tokens");
                return;
            }
        }
        let Some(refresh_token) = refresh_token else {
            return;
        };

        info!("Access token expires soon, refreshing");
        match refresh_access_token(&config, &refresh_token).await {
            Ok(response) => {
                let mut guard = session.write().await;
                guard.apply_refresh(&response, now_millis());
                info!(expires_at = guard.expires_at(), "New access token obtained");
            }
            Err(e) => {
                error!(error = %e, "Failed to obtain new access token; session needs re-authentication");
                session.write().await.mark_needs_reauth();
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::TokenResponse;
    use crate::session::{EXPIRY_MARGIN_SECS, shared_session};
    use axum::Json;
    use axum::http::StatusCode;
    use axum::routing::post;

    fn test_config() -> OAuthConfig {
        OAuthConfig::spotify(
            "test-client",
            "test-secret",
            "http://localhost:8888/callback",
        )
    }

    fn response(access: &str, refresh: Option<&str>, expires_in: u64) -> TokenResponse {
        TokenResponse {
            access_token: access.to_string(),
            refresh_token: refresh.map(str::to_string),
            expires_in,
            scope: None,
            token_type: Some("Bearer".to_string()),
        }
    }

    async fn spawn_token_endpoint(status: StatusCode, body: serde_json::Value) -> String {
        let app = axum::Router::new().route(
            "/api/token",
            post(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/token", addr)
    }

    #[tokio::test]
    async fn test_arm_with_empty_session_exits() {
        let session = shared_session();
        let refresher = Refresher::new(test_config(), session);

        refresher.arm();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!refresher.is_armed());
    }

    #[tokio::test]
    async fn test_rearming_leaves_one_task() {
        let session = shared_session();
        session
            .write()
            .await
            .install(&response("A", Some("R"), 3600), now_millis());
        let refresher = Refresher::new(test_config(), session);

        refresher.arm();
        refresher.arm();
        refresher.arm();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(refresher.is_armed());
    }

    #[tokio::test]
    async fn test_loop_fires_and_rearms() {
        let token_url = spawn_token_endpoint(
            StatusCode::OK,
            serde_json::json!({
                "access_token": "B",
                "token_type": "Bearer",
                "expires_in": 3600
            }),
        )
        .await;
        let config = test_config().with_token_url(token_url);

        let session = shared_session();
        // TTL equal to the margin: effective expiry is "now", so the loop
        // fires immediately.
        session
            .write()
            .await
            .install(&response("A", Some("R"), EXPIRY_MARGIN_SECS), now_millis());

        let refresher = Refresher::new(config, session.clone());
        refresher.arm();
        tokio::time::sleep(Duration::from_millis(500)).await;

        let guard = session.read().await;
        assert_eq!(guard.access_token(), Some("B"));
        assert_eq!(guard.refresh_token(), Some("R"));
        assert!(!guard.needs_reauth());
        drop(guard);
        // Renewed an hour out, the loop is asleep again.
        assert!(refresher.is_armed());
    }

    #[tokio::test]
    async fn test_loop_failure_marks_needs_reauth() {
        let token_url = spawn_token_endpoint(
            StatusCode::BAD_REQUEST,
            serde_json::json!({"error": "invalid_grant"}),
        )
        .await;
        let config = test_config().with_token_url(token_url);

        let session = shared_session();
        session
            .write()
            .await
            .install(&response("A", Some("R"), EXPIRY_MARGIN_SECS), now_millis());

        let refresher = Refresher::new(config, session.clone());
        refresher.arm();
        tokio::time::sleep(Duration::from_millis(500)).await;

        let guard = session.read().await;
        assert!(guard.needs_reauth());
        // Session keeps the stale token pair; only the flag changed.
        assert_eq!(guard.access_token(), Some("A"));
        drop(guard);
        assert!(!refresher.is_armed());
    }

    #[tokio::test]
    async fn test_refresh_now_updates_session() {
        let token_url = spawn_token_endpoint(
            StatusCode::OK,
            serde_json::json!({
                "access_token": "B",
                "token_type": "Bearer",
                "expires_in": 3600
            }),
        )
        .await;
        let config = test_config().with_token_url(token_url);

        let session = shared_session();
        session
            .write()
            .await
            .install(&response("A", Some("R"), 3600), now_millis());

        let refresher = Refresher::new(config, session.clone());
        let access = refresher.refresh_now(None).await.unwrap();
        assert_eq!(access, "B");
        assert_eq!(session.read().await.access_token(), Some("B"));
    }

    #[tokio::test]
    async fn test_refresh_now_without_session_token() {
        let session = shared_session();
        let refresher = Refresher::new(test_config(), session);

        let result = refresher.refresh_now(None).await;
        assert!(matches!(result, Err(OAuthError::NotAuthenticated(_))));
    }
}
