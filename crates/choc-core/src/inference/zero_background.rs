//! Closed-form limits and count/lifetime conversions.
//!
//! With zero expected background the probability of seeing no events at a
//! decay rate `r` is `exp(-r)`, so the `cl` upper limit on the number of
//! signal events is `-ln(1 - cl)`. Exposure converts counts to half-life:
//!
//! `T_1/2 = ln(2) * N * t * f / counts`

use std::f64::consts::LN_2;

use choc_config::validate::validate_confidence_level;

use crate::error::{ensure_non_negative, IntervalError, Result};

/// Half-life limit for a background-free counting experiment.
///
/// `n_atoms` is the number of source nuclei, `live_time` the exposure time
/// (the result is in the same unit), `efficiency` the signal acceptance.
/// Linear in each of the three exposure factors.
pub fn poisson_zero_background(
    n_atoms: f64,
    live_time: f64,
    efficiency: f64,
    cl: f64,
) -> Result<f64> {
    let exposure = exposure(n_atoms, live_time, efficiency)?;
    validate_confidence_level("cl", cl)?;
    Ok(-LN_2 / (1.0 - cl).ln() * exposure)
}

/// Convert a limit in signal counts to a half-life limit.
pub fn counts_to_lifetime(
    n_atoms: f64,
    live_time: f64,
    efficiency: f64,
    counts: f64,
) -> Result<f64> {
    let exposure = exposure(n_atoms, live_time, efficiency)?;
    ensure_positive("counts", counts)?;
    Ok(LN_2 * exposure / counts)
}

/// Convert a half-life limit to a limit in signal counts.
pub fn lifetime_to_counts(
    n_atoms: f64,
    live_time: f64,
    efficiency: f64,
    lifetime: f64,
) -> Result<f64> {
    let exposure = exposure(n_atoms, live_time, efficiency)?;
    ensure_positive("lifetime", lifetime)?;
    Ok(LN_2 * exposure / lifetime)
}

fn exposure(n_atoms: f64, live_time: f64, efficiency: f64) -> Result<f64> {
    ensure_non_negative("n_atoms", n_atoms)?;
    ensure_non_negative("live_time", live_time)?;
    ensure_non_negative("efficiency", efficiency)?;
    Ok(n_atoms * live_time * efficiency)
}

fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(IntervalError::invalid(
            name,
            format!("must be finite and > 0, got {}", value),
        ));
    }
    Ok(())
}
