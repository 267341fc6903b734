//! Settings validation errors and semantic validation.

use thiserror::Error;

use crate::settings::{
    BayesianSettings, FeldmanCousinsSettings, MarginalizationSettings, MuGrid, Settings,
};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Settings validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }

    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a full settings file.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    if settings.schema_version != crate::SETTINGS_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::SETTINGS_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }
    validate_feldman_cousins(&settings.feldman_cousins)?;
    validate_bayesian(&settings.bayesian)?;
    Ok(())
}

/// Validate Feldman-Cousins belt parameters.
pub fn validate_feldman_cousins(fc: &FeldmanCousinsSettings) -> ValidationResult<()> {
    validate_confidence_level("feldman_cousins.confidence_level", fc.confidence_level)?;
    validate_sigma("feldman_cousins.background_sigma", fc.background_sigma)?;
    validate_grid("feldman_cousins.grid", &fc.grid)?;
    validate_marginalization("feldman_cousins.marginalization", &fc.marginalization)?;
    if fc.max_count == Some(0) {
        return Err(ValidationError::invalid(
            "feldman_cousins.max_count",
            "Must be >= 1 when set",
        ));
    }
    Ok(())
}

/// Validate Bayesian interval parameters.
pub fn validate_bayesian(bayes: &BayesianSettings) -> ValidationResult<()> {
    validate_confidence_level("bayesian.confidence_level", bayes.confidence_level)?;
    validate_sigma("bayesian.background_sigma", bayes.background_sigma)?;
    validate_grid("bayesian.grid", &bayes.grid)?;
    validate_marginalization("bayesian.marginalization", &bayes.marginalization)
}

/// Confidence level must lie strictly inside (0, 1).
pub fn validate_confidence_level(field: &str, cl: f64) -> ValidationResult<()> {
    if !cl.is_finite() || cl <= 0.0 || cl >= 1.0 {
        return Err(ValidationError::invalid(
            field,
            format!("Must be in (0, 1), got {}", cl),
        ));
    }
    Ok(())
}

/// A background uncertainty must be finite and non-negative.
pub fn validate_sigma(field: &str, sigma: f64) -> ValidationResult<()> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(ValidationError::invalid(
            field,
            format!("Must be finite and >= 0, got {}", sigma),
        ));
    }
    Ok(())
}

/// Grid must be finite, non-negative, non-empty, and have a positive step.
pub fn validate_grid(field: &str, grid: &MuGrid) -> ValidationResult<()> {
    if !(grid.min.is_finite() && grid.max.is_finite() && grid.step.is_finite()) {
        return Err(ValidationError::invalid(field, "Grid bounds must be finite"));
    }
    if grid.min < 0.0 {
        return Err(ValidationError::invalid(
            field,
            format!("min must be >= 0, got {}", grid.min),
        ));
    }
    if grid.max <= grid.min {
        return Err(ValidationError::invalid(
            field,
            format!("Empty or inverted range [{}, {})", grid.min, grid.max),
        ));
    }
    if grid.step <= 0.0 {
        return Err(ValidationError::invalid(
            field,
            format!("step must be > 0, got {}", grid.step),
        ));
    }
    Ok(())
}

/// Truncation width must be positive and the step must fit inside it.
pub fn validate_marginalization(
    field: &str,
    m: &MarginalizationSettings,
) -> ValidationResult<()> {
    if !m.width_sigmas.is_finite() || m.width_sigmas <= 0.0 {
        return Err(ValidationError::invalid(
            field,
            format!("width_sigmas must be > 0, got {}", m.width_sigmas),
        ));
    }
    if !m.step_sigmas.is_finite() || m.step_sigmas <= 0.0 || m.step_sigmas > m.width_sigmas {
        return Err(ValidationError::invalid(
            field,
            format!(
                "step_sigmas must be in (0, width_sigmas], got {}",
                m.step_sigmas
            ),
        ));
    }
    Ok(())
}
