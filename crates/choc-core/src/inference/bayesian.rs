//! Bayesian credible intervals with a flat signal prior.
//!
//! The posterior over the signal rate `s` is proportional to the Poisson
//! likelihood of the observed count with mean `s + b`. When the background
//! carries a Gaussian uncertainty it is integrated out:
//!
//! `L(s) = sum_b exp(ll(s, b) - 0.5 * ((b - b0) / sigma)^2)`
//!
//! All terms are accumulated in the log domain and shifted by the global
//! maximum before exponentiating, so large means never overflow.
//!
//! Nothing is cached between calls; each query rebuilds its curve.

use choc_config::validate::validate_bayesian;
use choc_config::BayesianSettings;
use choc_math::{log_gamma, log_sum_exp};
use tracing::debug;

use super::background::BackgroundNodes;
use super::mu_points;
use crate::error::{ensure_non_negative, IntervalError, Result};
use crate::interval::BayesianLimit;

/// Posterior curve over the signal-rate grid, normalized to sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Posterior {
    mu: Vec<f64>,
    density: Vec<f64>,
}

impl Posterior {
    /// Grid of signal rates.
    pub fn mu(&self) -> &[f64] {
        &self.mu
    }

    /// Posterior mass at each grid point.
    pub fn density(&self) -> &[f64] {
        &self.density
    }

    /// Grid point with the largest posterior mass (first one on ties).
    pub fn mode(&self) -> f64 {
        let mut best = 0;
        for (i, &p) in self.density.iter().enumerate() {
            if p > self.density[best] {
                best = i;
            }
        }
        self.mu[best]
    }

    /// Smallest grid point whose cumulative mass reaches `cl`.
    pub fn upper_limit(&self, cl: f64) -> f64 {
        let mut cumulative = 0.0;
        for (&mu, &p) in self.mu.iter().zip(&self.density) {
            cumulative += p;
            if cumulative >= cl {
                return mu;
            }
        }
        // Rounding can leave the total a hair under 1.
        self.mu[self.mu.len() - 1]
    }

    /// Highest-posterior-density interval with mass `cl`.
    ///
    /// Grid points are taken in order of decreasing density (ties by
    /// increasing `mu`) until the accumulated mass reaches `cl`; the interval
    /// spans the selected points. It is not necessarily equal-tailed.
    pub fn highest_density_interval(&self, cl: f64) -> (f64, f64) {
        let mut order: Vec<usize> = (0..self.mu.len()).collect();
        order.sort_by(|&a, &b| self.density[b].total_cmp(&self.density[a]).then(a.cmp(&b)));

        let mut cumulative = 0.0;
        let mut lower = f64::INFINITY;
        let mut upper = f64::NEG_INFINITY;
        for &i in &order {
            cumulative += self.density[i];
            lower = lower.min(self.mu[i]);
            upper = upper.max(self.mu[i]);
            if cumulative >= cl {
                break;
            }
        }
        (lower, upper)
    }
}

/// Stateless Bayesian engine holding only its configuration.
#[derive(Debug, Clone)]
pub struct BayesianEngine {
    settings: BayesianSettings,
}

impl BayesianEngine {
    /// # Errors
    /// `Config` when the confidence level, grid, or marginalization is invalid.
    pub fn new(settings: BayesianSettings) -> Result<Self> {
        validate_bayesian(&settings)?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &BayesianSettings {
        &self.settings
    }

    /// Posterior curve for an observed count and expected background.
    ///
    /// Both inputs are real-valued (e.g. a scaled count) but must be
    /// finite and non-negative.
    pub fn posterior(&self, observed: f64, background: f64) -> Result<Posterior> {
        ensure_non_negative("observed", observed)?;
        ensure_non_negative("background", background)?;

        let nodes = BackgroundNodes::gaussian(
            background,
            self.settings.background_sigma,
            &self.settings.marginalization,
        )?;
        let mu = mu_points(&self.settings.grid)?;
        let log_norm = log_gamma(observed + 1.0);

        let log_like: Vec<f64> = mu
            .iter()
            .map(|&s| nodes.log_pmf(observed, s, log_norm))
            .collect();

        let max = log_like.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Err(IntervalError::NumericFailure(format!(
                "likelihood vanishes on the whole grid (observed={}, background={})",
                observed, background
            )));
        }
        let log_total = max + log_sum_exp(&log_like.iter().map(|l| l - max).collect::<Vec<_>>());
        let density: Vec<f64> = log_like.iter().map(|l| (l - log_total).exp()).collect();
        if density.iter().any(|p| !p.is_finite()) {
            return Err(IntervalError::NumericFailure(
                "posterior contains non-finite values".to_string(),
            ));
        }

        debug!(
            observed,
            background,
            grid_points = mu.len(),
            background_nodes = nodes.len(),
            "posterior built"
        );
        Ok(Posterior { mu, density })
    }

    /// Upper limit (one-sided) or credible interval (two-sided), per settings.
    pub fn limit(&self, observed: f64, background: f64) -> Result<BayesianLimit> {
        let posterior = self.posterior(observed, background)?;
        let cl = self.settings.confidence_level;
        let limit = if self.settings.one_sided {
            BayesianLimit::UpperLimit {
                upper: posterior.upper_limit(cl),
            }
        } else {
            let (lower, upper) = posterior.highest_density_interval(cl);
            BayesianLimit::Interval { lower, upper }
        };
        debug!(?limit, cl, "bayesian limit");
        Ok(limit)
    }
}

/// One-shot Bayesian limit.
///
/// `settings` carries the one-sided flag, background uncertainty, confidence
/// level, and grid; [`BayesianSettings::default`] gives a two-sided 90%
/// interval on `[0, 250)` with step 0.01.
pub fn bayesian_limit(
    observed: f64,
    background: f64,
    settings: &BayesianSettings,
) -> Result<BayesianLimit> {
    BayesianEngine::new(settings.clone())?.limit(observed, background)
}
