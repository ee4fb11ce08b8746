//! Currently-playing resource fetch and message formatting.

use serde::Deserialize;

use crate::error::{Result, SpotifyError};

/// Spotify Web API base URL.
pub const SPOTIFY_API_URL: &str = "https://api.spotify.com";

/// Currently-playing resource path.
const CURRENTLY_PLAYING_PATH: &str = "/v1/me/player/currently-playing";

/// Fixed response body when nothing is playing or the lookup fails.
pub const QUIET_FALLBACK: &str = "It's quiet. Too quiet...";

/// Payload subset of the currently-playing resource.
///
/// `item` is null between tracks and for some content types.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    pub item: Option<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub name: String,
    pub external_urls: ExternalUrls,
    pub artists: Vec<Artist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalUrls {
    pub spotify: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub name: String,
}

/// Client for the read-only playback resources.
#[derive(Debug, Clone)]
pub struct NowPlayingClient {
    client: reqwest::Client,
    base_url: String,
}

impl NowPlayingClient {
    pub fn new() -> Self {
        Self::with_base_url(SPOTIFY_API_URL)
    }

    /// Point the client at a different API base URL. Tests use a local
    /// fixture.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the currently-playing resource with a Bearer token.
    ///
    /// Returns `Ok(None)` when the provider reports no active playback
    /// (204 No Content).
    pub async fn currently_playing(&self, access_token: &str) -> Result<Option<CurrentlyPlaying>> {
        let url = format!("{}{}", self.base_url, CURRENTLY_PLAYING_PATH);

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| SpotifyError::Network(format!("Currently-playing request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NO_CONTENT {
            tracing::debug!("Provider reported no active playback");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(SpotifyError::Status(response.status().as_u16()));
        }

        let playing = response.json::<CurrentlyPlaying>().await.map_err(|e| {
            SpotifyError::Serialization(format!("Failed to parse currently-playing response: {}", e))
        })?;
        Ok(Some(playing))
    }
}

impl Default for NowPlayingClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Format the one-line now-playing message.
///
/// Artists appear in payload order, joined with ", ". Returns the fixed
/// fallback when the payload carries no track.
pub fn format_now_playing(playing: &CurrentlyPlaying) -> String {
    let Some(track) = &playing.item else {
        return QUIET_FALLBACK.to_string();
    };

    let artists = track
        .artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let prefix = if playing.is_playing {
        "Currently playing:"
    } else {
        "Playback paused, last played song:"
    };

    format!(
        "{} {} - {} {}",
        prefix, artists, track.name, track.external_urls.spotify
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::http::StatusCode;
    use axum::routing::get;

    fn playing(is_playing: bool, artists: &[&str]) -> CurrentlyPlaying {
        CurrentlyPlaying {
            is_playing,
            item: Some(Track {
                name: "X".to_string(),
                external_urls: ExternalUrls {
                    spotify: "u".to_string(),
                },
                artists: artists
                    .iter()
                    .map(|name| Artist {
                        name: name.to_string(),
                    })
                    .collect(),
            }),
        }
    }

    async fn spawn_api(status: StatusCode, body: serde_json::Value) -> String {
        let app = axum::Router::new().route(
            "/v1/me/player/currently-playing",
            get(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_format_currently_playing() {
        let line = format_now_playing(&playing(true, &["A", "B"]));
        assert_eq!(line, "Currently playing: A, B - X u");
    }

    #[test]
    fn test_format_paused() {
        let line = format_now_playing(&playing(false, &["A"]));
        assert_eq!(line, "Playback paused, last played song: A - X u");
    }

    #[test]
    fn test_format_single_artist_has_no_separator() {
        let line = format_now_playing(&playing(true, &["A"]));
        assert_eq!(line, "Currently playing: A - X u");
    }

    #[test]
    fn test_format_without_item_falls_back() {
        let empty = CurrentlyPlaying {
            is_playing: true,
            item: None,
        };
        assert_eq!(format_now_playing(&empty), QUIET_FALLBACK);
    }

    #[test]
    fn test_payload_deserialization() {
        let json = r#"{
            "is_playing": true,
            "item": {
                "name": "X",
                "external_urls": { "spotify": "u" },
                "artists": [ { "name": "A" }, { "name": "B" } ]
            }
        }"#;
        let playing: CurrentlyPlaying = serde_json::from_str(json).unwrap();
        assert_eq!(format_now_playing(&playing), "Currently playing: A, B - X u");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let base = spawn_api(
            StatusCode::OK,
            serde_json::json!({
                "is_playing": true,
                "item": {
                    "name": "X",
                    "external_urls": { "spotify": "u" },
                    "artists": [ { "name": "A" } ]
                }
            }),
        )
        .await;

        let client = NowPlayingClient::with_base_url(base);
        let playing = client.currently_playing("token").await.unwrap().unwrap();
        assert!(playing.is_playing);
        assert_eq!(playing.item.unwrap().name, "X");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let base = spawn_api(
            StatusCode::UNAUTHORIZED,
            serde_json::json!({"error": {"status": 401, "message": "The access token expired"}}),
        )
        .await;

        let client = NowPlayingClient::with_base_url(base);
        let result = client.currently_playing("stale").await;
        assert!(matches!(result, Err(SpotifyError::Status(401))));
    }
}
