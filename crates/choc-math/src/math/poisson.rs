//! Poisson probability mass, generalized to non-integer counts.
//!
//! `Pois(n; mu) = mu^n * e^-mu / Gamma(n + 1)`
//!
//! Evaluation happens in the log domain so that large means or counts do not
//! overflow; probabilities too small to represent come back as exactly 0.

use super::stable::log_gamma;
use crate::error::{ensure_non_negative, Result};

/// Log of the Poisson mass at (possibly fractional) count `n` and mean `mu`.
///
/// Caller guarantees `n >= 0` and `mu >= 0`. `mu == 0` puts all mass on
/// `n == 0`.
pub fn poisson_log_pmf_unchecked(n: f64, mu: f64) -> f64 {
    if mu == 0.0 {
        return if n == 0.0 { 0.0 } else { f64::NEG_INFINITY };
    }
    n * mu.ln() - mu - log_gamma(n + 1.0)
}

/// Log Poisson mass with a precomputed `log_gamma(n + 1)`.
///
/// Used in tight loops where the same count is evaluated against many means.
#[inline]
pub fn poisson_log_pmf_with_norm(n: f64, mu: f64, log_norm: f64) -> f64 {
    if mu == 0.0 {
        return if n == 0.0 { 0.0 } else { f64::NEG_INFINITY };
    }
    n * mu.ln() - mu - log_norm
}

/// Log of the Poisson mass, validating inputs.
pub fn poisson_log_pmf(n: f64, mu: f64) -> Result<f64> {
    ensure_non_negative("n", n)?;
    ensure_non_negative("mu", mu)?;
    Ok(poisson_log_pmf_unchecked(n, mu))
}

/// Poisson probability of observing `n` events given mean `mu`.
///
/// Non-integer `n` interpolates through the Gamma function. Results that
/// underflow are returned as 0.
///
/// # Errors
/// `InvalidParameter` for negative `n` or `mu`, `NonFinite` for NaN/inf.
pub fn poisson_pmf(n: f64, mu: f64) -> Result<f64> {
    Ok(poisson_log_pmf(n, mu)?.exp())
}

/// Poisson mass for each count in `ns` at a single mean.
pub fn poisson_pmf_counts(ns: &[f64], mu: f64) -> Result<Vec<f64>> {
    ensure_non_negative("mu", mu)?;
    ns.iter()
        .map(|&n| {
            ensure_non_negative("n", n)?;
            Ok(poisson_log_pmf_unchecked(n, mu).exp())
        })
        .collect()
}

/// Poisson mass of a single count under each mean in `mus`.
pub fn poisson_pmf_means(n: f64, mus: &[f64]) -> Result<Vec<f64>> {
    ensure_non_negative("n", n)?;
    let log_norm = log_gamma(n + 1.0);
    mus.iter()
        .map(|&mu| {
            ensure_non_negative("mu", mu)?;
            Ok(poisson_log_pmf_with_norm(n, mu, log_norm).exp())
        })
        .collect()
}
