//! Configuration system for the mixtape OAuth bridge.
//!
//! Provides TOML-based configuration with:
//! - Config file layering (XDG user config + project-local overrides)
//! - Environment variable overrides for the provider credentials
//! - Credential validation before the server starts

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    apply_env_overrides, apply_env_overrides_with, load_config, load_config_file,
    load_config_with_options, xdg_config_dir, xdg_config_path, ConfigSource, LoadedConfig,
};
pub use error::{ConfigError, Result};
pub use types::{Credentials, MixtapeConfig, ServerSection, SpotifySection};
