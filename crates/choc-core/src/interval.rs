//! Interval result types.

use serde::{Deserialize, Serialize};

/// Whether an interval was read off a covering acceptance region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalStatus {
    /// At least one hypothesis on the grid accepts the observation.
    Covered,
    /// No hypothesis accepts the observation: the grid or count space is
    /// too small for this configuration. Bounds are reported as (0, 0).
    NoCoverage,
}

/// A closed interval on the true signal rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
    pub status: IntervalStatus,
}

impl Interval {
    pub fn covered(lower: f64, upper: f64) -> Self {
        debug_assert!(lower <= upper);
        Self {
            lower,
            upper,
            status: IntervalStatus::Covered,
        }
    }

    /// The fallback returned when no grid point covers the observation.
    pub fn no_coverage() -> Self {
        Self {
            lower: 0.0,
            upper: 0.0,
            status: IntervalStatus::NoCoverage,
        }
    }

    pub fn is_covered(&self) -> bool {
        self.status == IntervalStatus::Covered
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, mu: f64) -> bool {
        self.is_covered() && self.lower <= mu && mu <= self.upper
    }
}

/// Result of a Bayesian limit computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BayesianLimit {
    /// One-sided upper limit.
    UpperLimit { upper: f64 },
    /// Highest-posterior-density credible interval.
    Interval { lower: f64, upper: f64 },
}

impl BayesianLimit {
    pub fn upper(&self) -> f64 {
        match *self {
            BayesianLimit::UpperLimit { upper } | BayesianLimit::Interval { upper, .. } => upper,
        }
    }

    /// Lower bound; 0 for a one-sided limit.
    pub fn lower(&self) -> f64 {
        match *self {
            BayesianLimit::UpperLimit { .. } => 0.0,
            BayesianLimit::Interval { lower, .. } => lower,
        }
    }

    pub fn is_one_sided(&self) -> bool {
        matches!(self, BayesianLimit::UpperLimit { .. })
    }
}
