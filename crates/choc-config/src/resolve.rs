//! Settings-file path resolution.
//!
//! Resolution order: CLI argument → environment variables → XDG path → defaults.

use std::path::{Path, PathBuf};

/// A discovered settings file and where it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPath {
    /// Path to settings.json (or None when using built-in defaults).
    pub path: Option<PathBuf>,

    /// Source of the settings (for diagnostics).
    pub source: SettingsSource,
}

/// Where a settings file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettingsSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for SettingsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsSource::CliArgument => write!(f, "CLI argument"),
            SettingsSource::Environment => write!(f, "environment variable"),
            SettingsSource::XdgConfig => write!(f, "XDG config"),
            SettingsSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable naming a settings file directly.
pub const ENV_SETTINGS_PATH: &str = "CHOC_SETTINGS";

/// Environment variable naming a directory that holds settings.json.
pub const ENV_CONFIG_DIR: &str = "CHOC_CONFIG_DIR";

const SETTINGS_FILENAME: &str = "settings.json";

const APP_NAME: &str = "chocula";

/// Resolve the settings file path.
///
/// 1. Explicit CLI path (if it exists)
/// 2. `CHOC_SETTINGS`
/// 3. `CHOC_CONFIG_DIR` + settings.json
/// 4. XDG config directory (~/.config/chocula/settings.json)
/// 5. Built-in defaults (None)
pub fn resolve_settings(cli_path: Option<&Path>) -> SettingsPath {
    if let Some(path) = cli_path {
        if path.exists() {
            return found(path.to_path_buf(), SettingsSource::CliArgument);
        }
    }

    if let Ok(env_path) = std::env::var(ENV_SETTINGS_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return found(path, SettingsSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(SETTINGS_FILENAME);
        if path.exists() {
            return found(path, SettingsSource::Environment);
        }
    }

    if let Some(xdg_config) = dirs::config_dir() {
        let path = xdg_config.join(APP_NAME).join(SETTINGS_FILENAME);
        if path.exists() {
            return found(path, SettingsSource::XdgConfig);
        }
    }

    SettingsPath::default()
}

fn found(path: PathBuf, source: SettingsSource) -> SettingsPath {
    SettingsPath {
        path: Some(path),
        source,
    }
}
