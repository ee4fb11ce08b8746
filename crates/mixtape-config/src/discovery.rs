//! Config file discovery, layered merging, and environment overrides.
//!
//! Resolution order (later overrides earlier):
//! 1. `~/.config/mixtape/config.toml` (XDG user config)
//! 2. `./mixtape.toml` (project-local)
//! 3. Environment variables
//! 4. CLI arguments (handled externally)

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::types::MixtapeConfig;

/// Default config filename for project-local config.
const PROJECT_CONFIG_FILE: &str = "mixtape.toml";

/// Default config filename within the XDG config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Application name for XDG directory resolution.
const APP_NAME: &str = "mixtape";

/// Environment variable to override the config directory.
const CONFIG_DIR_ENV: &str = "MIXTAPE_CONFIG_DIR";

/// Credential override variables.
const ENV_CLIENT_ID: &str = "MIXTAPE_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "MIXTAPE_CLIENT_SECRET";
const ENV_REDIRECT_URI: &str = "MIXTAPE_REDIRECT_URI";

/// Tracks where each config layer was loaded from.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the config file.
    pub path: PathBuf,
    /// Whether the file was found and loaded.
    pub loaded: bool,
}

/// Result of config discovery and loading.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The merged configuration.
    pub config: MixtapeConfig,
    /// Sources that were checked, in order of precedence (lowest first).
    pub sources: Vec<ConfigSource>,
}

impl LoadedConfig {
    /// Get paths of sources that were actually loaded.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }
}

/// Load configuration by discovering and merging all config layers.
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(project_dir, None)
}

/// Load configuration with explicit control over the user config directory.
///
/// `config_dir` overrides both `MIXTAPE_CONFIG_DIR` and the platform
/// default. Environment overrides are applied on top of the merged files.
pub fn load_config_with_options(
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    let mut config = MixtapeConfig::new();
    let mut sources = Vec::new();

    // 1. User config — explicit override, then env var, then platform default
    let user_config_path = match config_dir {
        Some(dir) => Some(dir.join(USER_CONFIG_FILE)),
        None => xdg_config_path(),
    };
    if let Some(path) = user_config_path {
        sources.push(load_layer(&mut config, &path)?);
    }

    // 2. Project-local config
    let project_path = project_dir
        .map(|d| d.join(PROJECT_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));
    sources.push(load_layer(&mut config, &project_path)?);

    // 3. Environment variables
    apply_env_overrides(&mut config);

    Ok(LoadedConfig { config, sources })
}

/// Load config from a specific file path (no discovery, no env overlay).
pub fn load_config_file(path: &Path) -> Result<MixtapeConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    MixtapeConfig::from_toml(&contents)
}

/// Merge one file layer into `config` if the file exists.
fn load_layer(config: &mut MixtapeConfig, path: &Path) -> Result<ConfigSource> {
    if !path.exists() {
        return Ok(ConfigSource {
            path: path.to_path_buf(),
            loaded: false,
        });
    }
    let layer = load_config_file(path)?;
    config.merge(layer);
    Ok(ConfigSource {
        path: path.to_path_buf(),
        loaded: true,
    })
}

/// Apply credential overrides from the process environment.
pub fn apply_env_overrides(config: &mut MixtapeConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

/// Testable core of [`apply_env_overrides`].
pub fn apply_env_overrides_with(
    config: &mut MixtapeConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let spotify = config.spotify.get_or_insert_default();
    if let Some(v) = lookup(ENV_CLIENT_ID) {
        spotify.client_id = Some(v);
    }
    if let Some(v) = lookup(ENV_CLIENT_SECRET) {
        spotify.client_secret = Some(v);
    }
    if let Some(v) = lookup(ENV_REDIRECT_URI) {
        spotify.redirect_uri = Some(v);
    }
}

/// Get the config directory for mixtape.
///
/// Checks `MIXTAPE_CONFIG_DIR` first, then falls back to the platform
/// default (`~/.config/mixtape` on Linux).
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the user config file path.
pub fn xdg_config_path() -> Option<PathBuf> {
    xdg_config_dir().map(|d| d.join(USER_CONFIG_FILE))
}
