//! Gaussian density.

use crate::error::{ensure_finite, ensure_positive, Result};

/// 1 / sqrt(2*pi)
const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Gaussian density without parameter checks. Caller guarantees `sigma > 0`.
#[inline]
pub fn gaussian_pdf_unchecked(x: f64, mean: f64, sigma: f64) -> f64 {
    let z = (x - mean) / sigma;
    INV_SQRT_2PI / sigma * (-0.5 * z * z).exp()
}

/// Normal density `N(x; mean, sigma)`.
///
/// # Errors
/// `InvalidParameter` if `sigma <= 0`. A caller that wants a point mass for
/// `sigma == 0` handles that case itself.
pub fn gaussian_pdf(x: f64, mean: f64, sigma: f64) -> Result<f64> {
    ensure_finite("x", x)?;
    ensure_finite("mean", mean)?;
    ensure_positive("sigma", sigma)?;
    Ok(gaussian_pdf_unchecked(x, mean, sigma))
}

/// Normal density evaluated at every point of `xs`.
pub fn gaussian_pdf_vec(xs: &[f64], mean: f64, sigma: f64) -> Result<Vec<f64>> {
    ensure_finite("mean", mean)?;
    ensure_positive("sigma", sigma)?;
    xs.iter()
        .map(|&x| {
            ensure_finite("x", x)?;
            Ok(gaussian_pdf_unchecked(x, mean, sigma))
        })
        .collect()
}
