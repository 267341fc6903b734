//! Background nuisance integration.
//!
//! An uncertain background `b ~ N(b0, sigma)` is integrated out with a
//! fixed-step weighted sum over `[b0 - w*sigma, b0 + w*sigma]`. Nodes below
//! zero are dropped (a Poisson mean cannot be negative) and the Gaussian
//! weights are renormalized over the nodes that remain.

use choc_config::MarginalizationSettings;
use choc_math::{log_sum_exp, poisson_log_pmf_with_norm};

use crate::error::{ensure_non_negative, IntervalError, Result};

/// Quadrature nodes for the background prior, with log weights summing to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundNodes {
    values: Vec<f64>,
    log_weights: Vec<f64>,
}

impl BackgroundNodes {
    /// A background known exactly.
    pub fn exact(background: f64) -> Result<Self> {
        ensure_non_negative("background", background)?;
        Ok(Self {
            values: vec![background],
            log_weights: vec![0.0],
        })
    }

    /// Gaussian background prior; falls back to [`exact`](Self::exact) when
    /// `sigma == 0`.
    pub fn gaussian(
        background: f64,
        sigma: f64,
        settings: &MarginalizationSettings,
    ) -> Result<Self> {
        ensure_non_negative("background", background)?;
        ensure_non_negative("background_sigma", sigma)?;
        if sigma == 0.0 {
            return Self::exact(background);
        }
        if settings.width_sigmas <= 0.0
            || settings.step_sigmas <= 0.0
            || !settings.width_sigmas.is_finite()
            || !settings.step_sigmas.is_finite()
        {
            return Err(IntervalError::invalid(
                "marginalization",
                format!(
                    "width and step must be > 0, got {} and {}",
                    settings.width_sigmas, settings.step_sigmas
                ),
            ));
        }

        let steps = (2.0 * settings.width_sigmas / settings.step_sigmas).round() as usize;
        let start = background - settings.width_sigmas * sigma;
        let step = settings.step_sigmas * sigma;

        let values: Vec<f64> = (0..=steps)
            .map(|i| start + step * i as f64)
            .filter(|&b| b >= 0.0)
            .collect();
        let raw: Vec<f64> = values
            .iter()
            .map(|&b| {
                let z = (b - background) / sigma;
                -0.5 * z * z
            })
            .collect();
        let log_norm = log_sum_exp(&raw);
        if !log_norm.is_finite() {
            return Err(IntervalError::NumericFailure(format!(
                "background prior with b={} sigma={} has no support",
                background, sigma
            )));
        }
        let log_weights = raw.iter().map(|w| w - log_norm).collect();

        Ok(Self {
            values,
            log_weights,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Background values at the nodes.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Largest background value carried by any node.
    pub fn max_value(&self) -> f64 {
        self.values.iter().cloned().fold(0.0, f64::max)
    }

    /// Normalized log weights, parallel to [`values`](Self::values).
    pub fn log_weights(&self) -> &[f64] {
        &self.log_weights
    }

    /// log P(n | signal), marginalized over the background nodes.
    ///
    /// `log_norm` is `log_gamma(n + 1)`, hoisted by the caller.
    pub fn log_pmf(&self, n: f64, signal: f64, log_norm: f64) -> f64 {
        if self.values.len() == 1 {
            return poisson_log_pmf_with_norm(n, signal + self.values[0], log_norm);
        }
        let terms: Vec<f64> = self
            .values
            .iter()
            .zip(&self.log_weights)
            .map(|(&b, &lw)| lw + poisson_log_pmf_with_norm(n, signal + b, log_norm))
            .collect();
        log_sum_exp(&terms)
    }
}
