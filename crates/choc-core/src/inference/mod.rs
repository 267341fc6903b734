//! Interval engines.
//!
//! - [`feldman_cousins`]: unified frequentist belt with likelihood-ratio ordering
//! - [`bayesian`]: flat-prior posterior, credible intervals and upper limits
//! - [`zero_background`]: closed-form lifetime limit and count conversions
//! - [`background`]: Gaussian background nuisance integration shared by both engines

pub mod background;
pub mod bayesian;
pub mod feldman_cousins;
pub mod zero_background;

use choc_config::MuGrid;
use choc_math::arange;

use crate::error::Result;

/// Materialize a validated grid of true signal rates.
pub(crate) fn mu_points(grid: &MuGrid) -> Result<Vec<f64>> {
    Ok(arange(grid.min, grid.max, grid.step)?)
}
