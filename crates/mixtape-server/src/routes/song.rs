//! Now-playing proxy handler.

use axum::extract::State;
use tracing::{info, warn};

use mixtape_spotify::{QUIET_FALLBACK, format_now_playing};

use crate::state::AppState;

/// GET /song — plain-text now-playing line, or the fixed fallback.
///
/// Degrades, never errors: an absent or stale token simply fails upstream
/// and yields the fallback body.
pub async fn song_handler(State(app): State<AppState>) -> String {
    let token = app.session.read().await.access_token().map(str::to_string);
    let Some(token) = token else {
        warn!("Song requested without an authorized session");
        return QUIET_FALLBACK.to_string();
    };

    match app.spotify.currently_playing(&token).await {
        Ok(Some(playing)) => {
            let line = format_now_playing(&playing);
            info!(song = %line, "Current song requested");
            line
        }
        Ok(None) => {
            info!("No song is currently playing");
            QUIET_FALLBACK.to_string()
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch currently-playing resource");
            QUIET_FALLBACK.to_string()
        }
    }
}
