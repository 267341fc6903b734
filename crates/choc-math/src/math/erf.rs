//! Inverse error function.

use std::f64::consts::{PI, SQRT_2};

use crate::error::{ensure_finite, MathError, Result};

/// Inverse error function for real `z` in [-1, 1].
///
/// Closed-form Abramowitz-Stegun style approximation (relative error about
/// 2e-3). `erfinv(±1)` is ±infinity.
///
/// # Errors
/// `InvalidParameter` for |z| > 1, `NonFinite` for NaN.
pub fn erfinv(z: f64) -> Result<f64> {
    ensure_finite("z", z)?;
    if z.abs() > 1.0 {
        return Err(MathError::invalid(
            "z",
            format!("must be in [-1, 1], got {}", z),
        ));
    }
    if z == 0.0 {
        return Ok(0.0);
    }
    if z.abs() == 1.0 {
        return Ok(z * f64::INFINITY);
    }
    let a = 8.0 * (PI - 3.0) / (3.0 * PI * (4.0 - PI));
    let ln_term = (1.0 - z * z).ln();
    let x = 2.0 / (PI * a) + 0.5 * ln_term;
    let s = ((x * x - ln_term / a).sqrt() - x).sqrt();
    Ok(z.signum() * s)
}

/// Standard normal quantile: the `z` with `Phi(z) = p`.
pub fn normal_quantile(p: f64) -> Result<f64> {
    ensure_finite("p", p)?;
    if p <= 0.0 || p >= 1.0 {
        return Err(MathError::invalid("p", format!("must be in (0, 1), got {}", p)));
    }
    Ok(SQRT_2 * erfinv(2.0 * p - 1.0)?)
}
