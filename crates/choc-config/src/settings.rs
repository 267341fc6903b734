//! Settings types for the interval engines.
//!
//! All fields carry serde defaults, so a settings file only needs to name the
//! values it overrides:
//!
//! ```json
//! { "schema_version": "1.0.0", "feldman_cousins": { "confidence_level": 0.95 } }
//! ```

use serde::{Deserialize, Serialize};

use crate::validate::{ValidationError, ValidationResult};

/// Complete settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub schema_version: String,

    pub description: Option<String>,

    pub feldman_cousins: FeldmanCousinsSettings,

    pub bayesian: BayesianSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: crate::SETTINGS_SCHEMA_VERSION.to_string(),
            description: None,
            feldman_cousins: FeldmanCousinsSettings::default(),
            bayesian: BayesianSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn from_file(path: &std::path::Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_str(&content)
    }

    /// Parse settings from a JSON string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> ValidationResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ValidationError::ParseError(format!("Serialize failed: {}", e)))
    }
}

/// Uniform grid of hypothesized true signal rates, `[min, max)` by `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MuGrid {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl MuGrid {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Grid used by the Feldman-Cousins engine unless overridden.
    pub const fn feldman_cousins_default() -> Self {
        Self::new(0.0, 50.0, 0.05)
    }

    /// Grid used by the Bayesian engine unless overridden.
    pub const fn bayesian_default() -> Self {
        Self::new(0.0, 250.0, 0.01)
    }
}

/// How the Gaussian background nuisance parameter is integrated out.
///
/// The integral is a weighted sum over `b' in [b - w*sigma, b + w*sigma]`
/// sampled every `step_sigmas * sigma`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginalizationSettings {
    /// Half-width of the truncated background domain, in units of sigma.
    pub width_sigmas: f64,
    /// Sampling step, in units of sigma.
    pub step_sigmas: f64,
}

impl Default for MarginalizationSettings {
    fn default() -> Self {
        Self {
            width_sigmas: 5.0,
            step_sigmas: 0.1,
        }
    }
}

/// Feldman-Cousins belt construction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeldmanCousinsSettings {
    pub confidence_level: f64,

    /// Gaussian uncertainty on the expected background; 0 means exact.
    pub background_sigma: f64,

    pub grid: MuGrid,

    pub marginalization: MarginalizationSettings,

    /// Size of the candidate count space. Derived from the grid when unset.
    pub max_count: Option<u64>,
}

impl Default for FeldmanCousinsSettings {
    fn default() -> Self {
        Self {
            confidence_level: 0.9,
            background_sigma: 0.0,
            grid: MuGrid::feldman_cousins_default(),
            marginalization: MarginalizationSettings::default(),
            max_count: None,
        }
    }
}

/// Bayesian credible-interval parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BayesianSettings {
    pub confidence_level: f64,

    /// Report an upper limit instead of a two-sided interval.
    pub one_sided: bool,

    pub background_sigma: f64,

    pub grid: MuGrid,

    pub marginalization: MarginalizationSettings,
}

impl Default for BayesianSettings {
    fn default() -> Self {
        Self {
            confidence_level: 0.9,
            one_sided: false,
            background_sigma: 0.0,
            grid: MuGrid::bayesian_default(),
            marginalization: MarginalizationSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.schema_version, crate::SETTINGS_SCHEMA_VERSION);
        assert_eq!(s.feldman_cousins.confidence_level, 0.9);
        assert_eq!(s.feldman_cousins.grid, MuGrid::new(0.0, 50.0, 0.05));
        assert_eq!(s.bayesian.grid, MuGrid::new(0.0, 250.0, 0.01));
        assert!(!s.bayesian.one_sided);
        assert_eq!(s.bayesian.marginalization.width_sigmas, 5.0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s = Settings::from_str(
            r#"{ "feldman_cousins": { "confidence_level": 0.95, "background_sigma": 0.4 } }"#,
        )
        .unwrap();
        assert_eq!(s.feldman_cousins.confidence_level, 0.95);
        assert_eq!(s.feldman_cousins.background_sigma, 0.4);
        assert_eq!(s.feldman_cousins.grid, MuGrid::feldman_cousins_default());
        assert_eq!(s.bayesian, BayesianSettings::default());
    }

    #[test]
    fn json_round_trip() {
        let mut s = Settings::default();
        s.bayesian.one_sided = true;
        s.feldman_cousins.max_count = Some(120);
        let back = Settings::from_str(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = Settings::from_str("{ not json").unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }
}
