//! Detector-resolution smearing of a sampled spectrum.
//!
//! The resolution width grows with energy as `sigma(x) = sqrt(x / scale)`,
//! where `scale` is the detector light yield (hits per unit energy).
//! Smearing is a brute-force O(N^2) convolution on an oversampled grid.
//! Boundaries are not treated specially: mass that the Gaussian tails carry
//! past the ends of the grid is recovered by the final renormalization.

use serde::{Deserialize, Serialize};

use super::gaussian::gaussian_pdf_unchecked;
use super::stable::{linear_interp, linspace};
use crate::error::{ensure_finite, ensure_positive, MathError, Result};

/// Default oversampling factor.
pub const DEFAULT_OVERSAMPLE: usize = 4;

/// Floor on the per-point Gaussian width.
pub const MIN_RESOLUTION_SIGMA: f64 = 1e-6;

/// Options for [`apply_resolution_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolutionOptions {
    /// Number of fine-grid points per input point.
    pub oversample: usize,
    /// Lower bound applied to `sigma(x)`.
    pub min_sigma: f64,
}

impl Default for ResolutionOptions {
    fn default() -> Self {
        Self {
            oversample: DEFAULT_OVERSAMPLE,
            min_sigma: MIN_RESOLUTION_SIGMA,
        }
    }
}

/// Smear `y(x)` with the default options.
pub fn apply_resolution(x: &[f64], y: &[f64], resolution_scale: f64) -> Result<Vec<f64>> {
    apply_resolution_with(x, y, resolution_scale, ResolutionOptions::default())
}

/// Smear `y(x)` with an energy-dependent Gaussian resolution.
///
/// 1. Oversample `x` by `options.oversample` and linearly interpolate `y`.
/// 2. Spread every fine-grid sample with a Gaussian of width
///    `max(min_sigma, sqrt(x / resolution_scale))`.
/// 3. Rescale so the summed output equals the summed fine-grid input.
/// 4. Interpolate back onto `x`.
///
/// # Errors
/// `LengthMismatch` when `x` and `y` differ in length, `InvalidParameter`
/// for fewer than two points, a non-increasing `x`, a non-positive scale, or
/// a zero oversampling factor.
pub fn apply_resolution_with(
    x: &[f64],
    y: &[f64],
    resolution_scale: f64,
    options: ResolutionOptions,
) -> Result<Vec<f64>> {
    if x.len() != y.len() {
        return Err(MathError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(MathError::invalid("x", "need at least two sample points"));
    }
    if options.oversample == 0 {
        return Err(MathError::invalid("oversample", "must be >= 1"));
    }
    ensure_positive("resolution_scale", resolution_scale)?;
    ensure_positive("min_sigma", options.min_sigma)?;
    for (&xi, &yi) in x.iter().zip(y) {
        ensure_finite("x", xi)?;
        ensure_finite("y", yi)?;
    }
    if x.windows(2).any(|w| w[1] <= w[0]) {
        return Err(MathError::invalid("x", "must be strictly increasing"));
    }

    let x_fine = linspace(x[0], x[x.len() - 1], x.len() * options.oversample);
    let y_fine: Vec<f64> = x_fine.iter().map(|&v| linear_interp(v, x, y)).collect();

    let mut smeared = vec![0.0; x_fine.len()];
    for (&center, &weight) in x_fine.iter().zip(&y_fine) {
        if weight == 0.0 {
            continue;
        }
        let sigma = (center.max(0.0) / resolution_scale)
            .sqrt()
            .max(options.min_sigma);
        for (out, &xj) in smeared.iter_mut().zip(&x_fine) {
            *out += weight * gaussian_pdf_unchecked(xj, center, sigma);
        }
    }

    let total_in: f64 = y_fine.iter().sum();
    let total_out: f64 = smeared.iter().sum();
    if total_out != 0.0 && total_out.is_finite() {
        let norm = total_in / total_out;
        smeared.iter_mut().for_each(|v| *v *= norm);
    }

    Ok(x.iter().map(|&v| linear_interp(v, &x_fine, &smeared)).collect())
}
