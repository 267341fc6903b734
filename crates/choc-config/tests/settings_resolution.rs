//! Settings loading, validation, and resolution tests against real files.
//!
//! Covers:
//! - Loading and validating settings files written to a temp directory
//! - Resolution order (CLI > env > config dir > XDG)

use choc_config::resolve::{resolve_settings, SettingsSource, ENV_CONFIG_DIR, ENV_SETTINGS_PATH};
use choc_config::validate::{validate_settings, ValidationError};
use choc_config::Settings;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const ENV_KEYS: &[&str] = &[ENV_SETTINGS_PATH, ENV_CONFIG_DIR, "XDG_CONFIG_HOME"];

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let saved = keys.iter().map(|key| env::var(key).ok()).collect();
        for key in keys {
            env::remove_var(key);
        }
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, saved) in self.keys.iter().zip(&self.saved) {
            match saved {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .expect("env lock poisoned");
    f()
}

fn write_settings(dir: &Path, json: &str) {
    fs::create_dir_all(dir).expect("create settings dir");
    fs::write(dir.join("settings.json"), json).expect("write settings");
}

const VALID: &str = r#"{
    "schema_version": "1.0.0",
    "feldman_cousins": { "confidence_level": 0.95, "grid": { "min": 0.0, "max": 20.0, "step": 0.1 } },
    "bayesian": { "one_sided": true }
}"#;

#[test]
fn test_load_and_validate_file() {
    let temp = TempDir::new().expect("temp dir");
    write_settings(temp.path(), VALID);

    let settings = Settings::from_file(&temp.path().join("settings.json")).expect("load");
    validate_settings(&settings).expect("valid settings should pass");
    assert_eq!(settings.feldman_cousins.confidence_level, 0.95);
    assert_eq!(settings.feldman_cousins.grid.max, 20.0);
    assert!(settings.bayesian.one_sided);
}

#[test]
fn test_validate_rejects_bad_confidence_level() {
    let settings =
        Settings::from_str(r#"{ "bayesian": { "confidence_level": 1.2 } }"#).expect("parse");
    let err = validate_settings(&settings).expect_err("cl > 1 should fail");
    assert!(matches!(err, ValidationError::InvalidValue { .. }));
    assert_eq!(err.code(), 65);
}

#[test]
fn test_missing_file_is_io_error() {
    let temp = TempDir::new().expect("temp dir");
    let err = Settings::from_file(&temp.path().join("absent.json")).expect_err("missing file");
    assert!(matches!(err, ValidationError::IoError(_)));
}

#[test]
fn test_resolve_cli_over_env() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_KEYS);

        let temp = TempDir::new().expect("temp dir");
        let cli_dir = temp.path().join("cli");
        let env_dir = temp.path().join("env");
        write_settings(&cli_dir, VALID);
        write_settings(&env_dir, VALID);

        env::set_var(
            ENV_SETTINGS_PATH,
            env_dir.join("settings.json").display().to_string(),
        );

        let cli_path = cli_dir.join("settings.json");
        let resolved = resolve_settings(Some(&cli_path));
        assert_eq!(resolved.source, SettingsSource::CliArgument);
        assert_eq!(resolved.path.unwrap(), cli_path);
    });
}

#[test]
fn test_resolve_env_over_config_dir() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_KEYS);

        let temp = TempDir::new().expect("temp dir");
        let env_dir = temp.path().join("env");
        let config_dir = temp.path().join("config_dir");
        write_settings(&env_dir, VALID);
        write_settings(&config_dir, VALID);

        env::set_var(
            ENV_SETTINGS_PATH,
            env_dir.join("settings.json").display().to_string(),
        );
        env::set_var(ENV_CONFIG_DIR, config_dir.display().to_string());

        let resolved = resolve_settings(None);
        assert_eq!(resolved.source, SettingsSource::Environment);
        assert_eq!(resolved.path.unwrap(), env_dir.join("settings.json"));
    });
}

#[test]
fn test_resolve_missing_cli_path_falls_through() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_KEYS);

        let temp = TempDir::new().expect("temp dir");
        let config_dir = temp.path().join("config_dir");
        write_settings(&config_dir, VALID);
        env::set_var(ENV_CONFIG_DIR, config_dir.display().to_string());

        let resolved = resolve_settings(Some(&temp.path().join("nope.json")));
        assert_eq!(resolved.source, SettingsSource::Environment);
        assert_eq!(resolved.path.unwrap(), config_dir.join("settings.json"));
    });
}

#[cfg(target_os = "linux")]
#[test]
fn test_resolve_xdg_fallback() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_KEYS);

        let temp = TempDir::new().expect("temp dir");
        let xdg_dir = temp.path().join("xdg");
        let app_dir = xdg_dir.join("chocula");
        write_settings(&app_dir, VALID);

        env::set_var("XDG_CONFIG_HOME", xdg_dir.display().to_string());

        let resolved = resolve_settings(None);
        assert_eq!(resolved.source, SettingsSource::XdgConfig);
        assert_eq!(resolved.path.unwrap(), app_dir.join("settings.json"));
    });
}
