//! On-demand token refresh handler.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::RefreshError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RefreshParams {
    pub refresh_token: Option<String>,
}

/// Response body for a successful on-demand refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// GET /refresh_token — fire a refresh immediately, outside the armed
/// schedule. An explicit `refresh_token` query parameter overrides the
/// session's stored one.
pub async fn refresh_handler(
    State(app): State<AppState>,
    Query(params): Query<RefreshParams>,
) -> Result<Json<RefreshResponse>, RefreshError> {
    info!("Requesting new access token");
    let access_token = app
        .refresher
        .refresh_now(params.refresh_token.as_deref())
        .await?;
    Ok(Json(RefreshResponse { access_token }))
}
