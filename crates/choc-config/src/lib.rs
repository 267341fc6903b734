//! Chocula settings loading and validation.
//!
//! This crate provides:
//! - Typed settings for the Feldman-Cousins and Bayesian engines
//! - Settings-file resolution (CLI → env → XDG → defaults)
//! - Semantic validation of grids, confidence levels, and marginalization

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{resolve_settings, SettingsPath, SettingsSource};
pub use settings::{
    BayesianSettings, FeldmanCousinsSettings, MarginalizationSettings, MuGrid, Settings,
};
pub use validate::{ValidationError, ValidationResult};

/// Schema version for settings files.
pub const SETTINGS_SCHEMA_VERSION: &str = "1.0.0";
