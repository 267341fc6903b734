//! Feldman-Cousins unified confidence belt.
//!
//! For every hypothesized signal rate `mu` on a uniform grid, an acceptance
//! region in observed-count space is built by likelihood-ratio ordering:
//!
//! - `p(n | mu)`: Poisson probability of `n` with mean `mu + b` (marginalized
//!   over the background prior when `sigma_b > 0`)
//! - `d(n) = p(n | mu_best(n))` with `mu_best(n) = max(0, n - b)`, the
//!   physically allowed best fit
//! - `r(n) = p(n | mu) / d(n)`
//!
//! Counts are ranked by decreasing `r(n)` (ties by increasing `n`) and added
//! until their summed probability reaches the confidence level. The band is
//! recorded as the inclusive range spanned by the accepted counts.
//!
//! The table is built once at construction and never mutated, so an engine
//! can be shared across threads and queried concurrently.
//!
//! ```no_run
//! use choc_core::FeldmanCousinsEngine;
//!
//! let engine = FeldmanCousinsEngine::with_defaults(3.0).unwrap();
//! let interval = engine.get_interval(3);
//! assert!(interval.is_covered());
//! println!("[{:.2}, {:.2}]", interval.lower, interval.upper);
//! ```

use choc_config::validate::validate_feldman_cousins;
use choc_config::FeldmanCousinsSettings;
use choc_math::log_gamma;
use serde::Serialize;
use tracing::{debug, debug_span, trace, warn};

use super::background::BackgroundNodes;
use super::mu_points;
use crate::error::{ensure_non_negative, Result};
use crate::interval::Interval;

/// Accepted range of observed counts at one grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AcceptanceBand {
    /// Smallest accepted count.
    pub n_lower: u64,
    /// Largest accepted count.
    pub n_upper: u64,
    /// Probability of the rank-selected counts (>= confidence level).
    pub coverage: f64,
    /// Probability of the selection minus its lowest-ranked member (< confidence level).
    pub coverage_without_last: f64,
    /// Number of counts selected by the ranking.
    pub members: usize,
}

impl AcceptanceBand {
    pub fn contains(&self, n: u64) -> bool {
        self.n_lower <= n && n <= self.n_upper
    }
}

/// Signed encoding of a table entry, with `(-1, -1)` for an empty band.
pub fn band_bounds_or_sentinel(band: Option<&AcceptanceBand>) -> (i64, i64) {
    match band {
        Some(b) => (b.n_lower as i64, b.n_upper as i64),
        None => (-1, -1),
    }
}

/// One row of a belt dump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeltRow {
    pub mu: f64,
    pub n_lower: i64,
    pub n_upper: i64,
    pub coverage: Option<f64>,
}

/// Feldman-Cousins engine with a precomputed acceptance table.
#[derive(Debug, Clone)]
pub struct FeldmanCousinsEngine {
    background: f64,
    settings: FeldmanCousinsSettings,
    mu_grid: Vec<f64>,
    max_count: u64,
    table: Vec<Option<AcceptanceBand>>,
}

impl FeldmanCousinsEngine {
    /// Build the belt for expected background `background`.
    ///
    /// # Errors
    /// `InvalidParameter` for a negative or non-finite background, and
    /// `Config` for an invalid confidence level, grid, or marginalization.
    pub fn new(background: f64, settings: FeldmanCousinsSettings) -> Result<Self> {
        ensure_non_negative("background", background)?;
        validate_feldman_cousins(&settings)?;

        let span = debug_span!(
            "fc_belt",
            background,
            cl = settings.confidence_level,
            sigma = settings.background_sigma
        );
        let _enter = span.enter();

        let nodes = BackgroundNodes::gaussian(
            background,
            settings.background_sigma,
            &settings.marginalization,
        )?;
        let mu_grid = mu_points(&settings.grid)?;
        let max_count = settings
            .max_count
            .unwrap_or_else(|| default_max_count(settings.grid.max, nodes.max_value()));

        let table = build_table(
            background,
            settings.confidence_level,
            &nodes,
            &mu_grid,
            max_count,
        );

        let empty = table.iter().filter(|b| b.is_none()).count();
        debug!(
            grid_points = mu_grid.len(),
            max_count,
            background_nodes = nodes.len(),
            empty_bands = empty,
            "acceptance table built"
        );
        if empty > 0 {
            warn!(
                empty_bands = empty,
                max_count, "some grid points never reach the confidence level"
            );
        }

        Ok(Self {
            background,
            settings,
            mu_grid,
            max_count,
            table,
        })
    }

    /// Engine with the default settings (90% CL, grid [0, 50) by 0.05).
    pub fn with_defaults(background: f64) -> Result<Self> {
        Self::new(background, FeldmanCousinsSettings::default())
    }

    /// Confidence interval on the signal rate for an observed count.
    ///
    /// Returns the smallest and largest grid `mu` whose band contains
    /// `n_observed`. When no band does, the result is
    /// [`Interval::no_coverage`], which tests can tell apart from a genuine
    /// zero-width interval via [`Interval::is_covered`].
    pub fn get_interval(&self, n_observed: u64) -> Interval {
        let mut covering = self
            .mu_grid
            .iter()
            .zip(&self.table)
            .filter_map(|(&mu, band)| match band {
                Some(b) if b.contains(n_observed) => Some(mu),
                _ => None,
            });

        let Some(first) = covering.next() else {
            warn!(
                n_observed,
                background = self.background,
                "no grid point covers the observed count"
            );
            return Interval::no_coverage();
        };
        let (lower, upper) =
            covering.fold((first, first), |(lo, hi), mu| (lo.min(mu), hi.max(mu)));
        Interval::covered(lower, upper)
    }

    pub fn background(&self) -> f64 {
        self.background
    }

    pub fn confidence_level(&self) -> f64 {
        self.settings.confidence_level
    }

    pub fn settings(&self) -> &FeldmanCousinsSettings {
        &self.settings
    }

    /// Hypothesized signal rates, strictly increasing.
    pub fn mu_grid(&self) -> &[f64] {
        &self.mu_grid
    }

    /// Size of the candidate count space (counts `0..max_count`).
    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    /// Acceptance table, parallel to [`mu_grid`](Self::mu_grid).
    pub fn acceptance_table(&self) -> &[Option<AcceptanceBand>] {
        &self.table
    }

    pub fn empty_band_count(&self) -> usize {
        self.table.iter().filter(|b| b.is_none()).count()
    }

    /// The belt as rows, empty bands encoded as `(-1, -1)`.
    pub fn belt_rows(&self) -> Vec<BeltRow> {
        self.mu_grid
            .iter()
            .zip(&self.table)
            .map(|(&mu, band)| {
                let (n_lower, n_upper) = band_bounds_or_sentinel(band.as_ref());
                BeltRow {
                    mu,
                    n_lower,
                    n_upper,
                    coverage: band.map(|b| b.coverage),
                }
            })
            .collect()
    }
}

/// Count-space size large enough that the Poisson tail beyond it is
/// negligible for every mean on the grid.
fn default_max_count(mu_max: f64, background_max: f64) -> u64 {
    let top = mu_max + background_max;
    (top + 10.0 * top.sqrt() + 20.0).ceil() as u64
}

fn build_table(
    background: f64,
    cl: f64,
    nodes: &BackgroundNodes,
    mu_grid: &[f64],
    max_count: u64,
) -> Vec<Option<AcceptanceBand>> {
    let counts: Vec<f64> = (0..max_count).map(|n| n as f64).collect();
    let log_norms: Vec<f64> = counts.iter().map(|&n| log_gamma(n + 1.0)).collect();

    // Denominator of the ordering statistic; independent of mu.
    let log_best: Vec<f64> = counts
        .iter()
        .zip(&log_norms)
        .map(|(&n, &ln)| nodes.log_pmf(n, (n - background).max(0.0), ln))
        .collect();

    let mut log_p = vec![0.0; counts.len()];
    let mut log_ratio = vec![0.0; counts.len()];
    let mut order: Vec<usize> = Vec::with_capacity(counts.len());

    mu_grid
        .iter()
        .map(|&mu| {
            for (i, (&n, &ln)) in counts.iter().zip(&log_norms).enumerate() {
                log_p[i] = nodes.log_pmf(n, mu, ln);
                log_ratio[i] = log_p[i] - log_best[i];
            }
            order.clear();
            order.extend(0..counts.len());
            order.sort_by(|&a, &b| log_ratio[b].total_cmp(&log_ratio[a]).then(a.cmp(&b)));

            let band = accept(&order, &log_p, cl);
            match &band {
                Some(b) => trace!(
                    mu,
                    n_lower = b.n_lower,
                    n_upper = b.n_upper,
                    coverage = b.coverage,
                    "band accepted"
                ),
                None => trace!(mu, "band empty"),
            }
            band
        })
        .collect()
}

/// Add ranked counts until the confidence level is reached.
fn accept(order: &[usize], log_p: &[f64], cl: f64) -> Option<AcceptanceBand> {
    let mut coverage = 0.0;
    let mut n_lower = u64::MAX;
    let mut n_upper = 0;
    for (rank, &i) in order.iter().enumerate() {
        let before = coverage;
        coverage += log_p[i].exp();
        n_lower = n_lower.min(i as u64);
        n_upper = n_upper.max(i as u64);
        if coverage >= cl {
            return Some(AcceptanceBand {
                n_lower,
                n_upper,
                coverage,
                coverage_without_last: before,
                members: rank + 1,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use choc_config::MuGrid;

    fn settings(cl: f64, grid: MuGrid) -> FeldmanCousinsSettings {
        FeldmanCousinsSettings {
            confidence_level: cl,
            grid,
            ..Default::default()
        }
    }

    #[test]
    fn default_grid_shape() {
        let engine = FeldmanCousinsEngine::with_defaults(0.5).unwrap();
        assert_eq!(engine.mu_grid().len(), 1000);
        assert_eq!(engine.acceptance_table().len(), 1000);
        assert!(engine.mu_grid().windows(2).all(|w| w[0] < w[1]));
        assert!(*engine.mu_grid().last().unwrap() < 50.0);
        assert!(engine.max_count() as f64 >= 50.0);
    }

    #[test]
    fn zero_background_zero_count_matches_published() {
        // Feldman & Cousins Table IV: b=0, n=0 -> [0.00, 2.44]
        let engine = FeldmanCousinsEngine::with_defaults(0.0).unwrap();
        let interval = engine.get_interval(0);
        assert!(interval.is_covered());
        assert_eq!(interval.lower, 0.0);
        assert!(
            (interval.upper - 2.44).abs() < 0.1,
            "upper {} not near 2.44",
            interval.upper
        );
    }

    #[test]
    fn bands_reach_confidence_minimally() {
        let engine = FeldmanCousinsEngine::with_defaults(2.0).unwrap();
        for band in engine.acceptance_table().iter().flatten() {
            assert!(band.coverage >= 0.9, "coverage {}", band.coverage);
            assert!(
                band.coverage_without_last < 0.9,
                "prefix already covered: {}",
                band.coverage_without_last
            );
            assert!(band.n_lower <= band.n_upper);
            assert!(band.members as u64 <= band.n_upper - band.n_lower + 1);
        }
    }

    #[test]
    fn tiny_count_space_yields_empty_bands() {
        let fc = FeldmanCousinsSettings {
            max_count: Some(3),
            ..settings(0.9, MuGrid::new(0.0, 10.0, 0.5))
        };
        let engine = FeldmanCousinsEngine::new(1.0, fc).unwrap();
        assert!(engine.empty_band_count() > 0);
        // mu = 0 with b = 1 still fits inside counts 0..3.
        assert!(engine.acceptance_table()[0].is_some());

        let rows = engine.belt_rows();
        let last = rows.last().unwrap();
        assert_eq!((last.n_lower, last.n_upper), (-1, -1));
        assert!(last.coverage.is_none());
    }

    #[test]
    fn uncovered_count_reports_no_coverage() {
        let engine =
            FeldmanCousinsEngine::new(0.0, settings(0.9, MuGrid::new(0.0, 2.0, 0.1))).unwrap();
        let interval = engine.get_interval(40);
        assert!(!interval.is_covered());
        assert_eq!(interval.bounds(), (0.0, 0.0));
    }

    #[test]
    fn single_point_grid_gives_covered_zero_width() {
        let engine =
            FeldmanCousinsEngine::new(0.0, settings(0.9, MuGrid::new(0.0, 0.05, 0.05))).unwrap();
        assert_eq!(engine.mu_grid(), &[0.0]);
        let interval = engine.get_interval(0);
        assert!(interval.is_covered());
        assert_eq!(interval.bounds(), (0.0, 0.0));
    }

    #[test]
    fn sentinel_encoding() {
        let band = AcceptanceBand {
            n_lower: 2,
            n_upper: 7,
            coverage: 0.91,
            coverage_without_last: 0.85,
            members: 6,
        };
        assert_eq!(band_bounds_or_sentinel(Some(&band)), (2, 7));
        assert_eq!(band_bounds_or_sentinel(None), (-1, -1));
    }

    #[test]
    fn rejects_invalid_construction() {
        assert!(FeldmanCousinsEngine::with_defaults(-1.0).is_err());
        assert!(FeldmanCousinsEngine::with_defaults(f64::NAN).is_err());
        let bad_cl = settings(1.0, MuGrid::feldman_cousins_default());
        assert!(FeldmanCousinsEngine::new(1.0, bad_cl).is_err());
        let inverted = settings(0.9, MuGrid::new(5.0, 1.0, 0.1));
        assert!(FeldmanCousinsEngine::new(1.0, inverted).is_err());
        let err = FeldmanCousinsEngine::new(1.0, settings(0.0, MuGrid::feldman_cousins_default()))
            .unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FeldmanCousinsEngine>();
    }
}
