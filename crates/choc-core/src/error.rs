//! Error types for the interval engines.
//!
//! Every failure is local and synchronous: bad input is rejected at entry,
//! and a computation that would produce NaN or infinity in a returned
//! interval is reported as [`IntervalError::NumericFailure`] instead.
//!
//! A Feldman-Cousins query that finds no covering hypothesis is *not* an
//! error; see [`crate::interval::IntervalStatus::NoCoverage`].

use choc_config::ValidationError;
use choc_math::MathError;
use thiserror::Error;

/// Result type alias for interval operations.
pub type Result<T> = std::result::Result<T, IntervalError>;

/// Unified error type for the interval engines.
#[derive(Error, Debug)]
pub enum IntervalError {
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Numeric failure: {0}")]
    NumericFailure(String),

    #[error(transparent)]
    Math(#[from] MathError),

    #[error(transparent)]
    Config(#[from] ValidationError),
}

impl IntervalError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        IntervalError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Stable error code for structured reporting.
    pub fn code(&self) -> u32 {
        match self {
            IntervalError::InvalidParameter { .. } => 30,
            IntervalError::NumericFailure(_) => 31,
            IntervalError::Math(_) => 32,
            IntervalError::Config(e) => e.code(),
        }
    }

    /// Whether the error traces back to the caller's inputs.
    ///
    /// Numeric failures count: they only arise from inputs the engines
    /// cannot represent.
    pub fn is_invalid_parameter(&self) -> bool {
        match self {
            IntervalError::InvalidParameter { .. }
            | IntervalError::NumericFailure(_)
            | IntervalError::Math(_) => true,
            IntervalError::Config(e) => matches!(e, ValidationError::InvalidValue { .. }),
        }
    }
}

/// Reject negative or non-finite physical quantities.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(IntervalError::invalid(
            name,
            format!("must be finite and >= 0, got {}", value),
        ));
    }
    Ok(())
}
