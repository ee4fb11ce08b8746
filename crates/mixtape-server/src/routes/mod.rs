//! HTTP route handlers.

pub mod auth;
pub mod health;
pub mod song;
pub mod token;

pub use auth::{STATE_COOKIE, callback_handler, login_handler};
pub use health::health_handler;
pub use song::song_handler;
pub use token::refresh_handler;
