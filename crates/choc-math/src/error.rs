//! Errors raised by the distribution primitives.

use thiserror::Error;

/// Result type for choc-math operations.
pub type Result<T> = std::result::Result<T, MathError>;

/// Invalid input to a distribution or numerical kernel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Length mismatch: x has {x} points, y has {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("Non-finite value for {name}")]
    NonFinite { name: &'static str },
}

impl MathError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        MathError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Reject NaN and infinities for a named input.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MathError::NonFinite { name })
    }
}

/// Reject negative (or non-finite) values for a named input.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value < 0.0 {
        return Err(MathError::invalid(name, format!("must be >= 0, got {}", value)));
    }
    Ok(())
}

/// Reject zero, negative, or non-finite values for a named input.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value <= 0.0 {
        return Err(MathError::invalid(name, format!("must be > 0, got {}", value)));
    }
    Ok(())
}
