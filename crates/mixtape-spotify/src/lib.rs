//! Read-only Spotify Web API client for the currently-playing resource.
//!
//! # Components
//!
//! - [`now_playing`] — resource fetch with Bearer auth, payload model, and
//!   the one-line message formatting
//! - [`error`] — error types

pub mod error;
pub mod now_playing;

pub use error::{Result, SpotifyError};
pub use now_playing::{
    Artist, CurrentlyPlaying, ExternalUrls, NowPlayingClient, QUIET_FALLBACK, SPOTIFY_API_URL,
    Track, format_now_playing,
};
