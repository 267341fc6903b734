//! Property-based tests for choc-math distribution primitives.
//!
//! Uses proptest to check normalization, symmetry, and conservation laws
//! across many random inputs.

use choc_math::{
    apply_resolution, gaussian_pdf, linspace, log_gamma, log_sum_exp, poisson_pmf,
    poisson_pmf_counts,
};
use proptest::prelude::*;

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-10;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

// ============================================================================
// Poisson
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The mass over a wide enough count range sums to one.
    #[test]
    fn poisson_mass_sums_to_one(mu in 0.0..60.0f64) {
        let n_max = (mu + 12.0 * mu.sqrt() + 30.0).ceil() as usize;
        let ns: Vec<f64> = (0..n_max).map(|n| n as f64).collect();
        let total: f64 = poisson_pmf_counts(&ns, mu).unwrap().iter().sum();
        prop_assert!(approx_eq(total, 1.0, 1e-9), "mu={} total={}", mu, total);
    }

    /// Recurrence: Pois(n+1; mu) = Pois(n; mu) * mu / (n+1).
    #[test]
    fn poisson_recurrence(n in 0u32..80, mu in 0.01..80.0f64) {
        let p_n = poisson_pmf(n as f64, mu).unwrap();
        let p_next = poisson_pmf(n as f64 + 1.0, mu).unwrap();
        let expected = p_n * mu / (n as f64 + 1.0);
        prop_assert!(approx_eq(p_next, expected, 1e-9),
            "n={} mu={}: {} vs {}", n, mu, p_next, expected);
    }

    /// Probabilities stay in [0, 1] and never become NaN.
    #[test]
    fn poisson_in_unit_interval(n in 0.0..500.0f64, mu in 0.0..500.0f64) {
        let p = poisson_pmf(n, mu).unwrap();
        prop_assert!(p.is_finite());
        prop_assert!((0.0..=1.0).contains(&p), "Pois({}; {}) = {}", n, mu, p);
    }
}

// ============================================================================
// Gaussian
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Symmetric about the mean.
    #[test]
    fn gaussian_symmetric(d in 0.0..10.0f64, mean in -5.0..5.0f64, sigma in 0.01..5.0f64) {
        let left = gaussian_pdf(mean - d, mean, sigma).unwrap();
        let right = gaussian_pdf(mean + d, mean, sigma).unwrap();
        prop_assert!(approx_eq(left, right, TOL));
    }

    /// Peak height is 1 / (sigma * sqrt(2 pi)).
    #[test]
    fn gaussian_peak_height(mean in -5.0..5.0f64, sigma in 0.01..5.0f64) {
        let peak = gaussian_pdf(mean, mean, sigma).unwrap();
        let expected = 1.0 / (sigma * (2.0 * std::f64::consts::PI).sqrt());
        prop_assert!(approx_eq(peak, expected, TOL));
    }

    /// Non-positive widths are always rejected.
    #[test]
    fn gaussian_rejects_non_positive_sigma(sigma in -5.0..=0.0f64) {
        prop_assert!(gaussian_pdf(0.0, 0.0, sigma).is_err());
    }
}

// ============================================================================
// Stable kernels
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Gamma recurrence: lgamma(x+1) = lgamma(x) + ln(x).
    #[test]
    fn log_gamma_recurrence(x in 0.1..100.0f64) {
        let lhs = log_gamma(x + 1.0);
        let rhs = log_gamma(x) + x.ln();
        prop_assert!(approx_eq(lhs, rhs, 1e-8), "x={}: {} vs {}", x, lhs, rhs);
    }

    /// log_sum_exp is at least the max and at most max + ln(len).
    #[test]
    fn log_sum_exp_bounds(values in prop::collection::vec(-700.0..700.0f64, 1..20)) {
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let lse = log_sum_exp(&values);
        prop_assert!(lse >= max - TOL);
        prop_assert!(lse <= max + (values.len() as f64).ln() + TOL);
    }
}

// ============================================================================
// Resolution smearing
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Smearing a peak well inside the window keeps its total weight.
    #[test]
    fn resolution_conserves_weight(center in 2.0..4.0f64, scale in 50.0..500.0f64) {
        let x = linspace(0.5, 6.0, 120);
        let y: Vec<f64> = x.iter().map(|v| (-(v - center).powi(2) / 0.05).exp()).collect();
        let out = apply_resolution(&x, &y, scale).unwrap();
        let sum_in: f64 = y.iter().sum();
        let sum_out: f64 = out.iter().sum();
        prop_assert!((sum_out - sum_in).abs() / sum_in < 0.03,
            "center={} scale={}: {} vs {}", center, scale, sum_in, sum_out);
        prop_assert!(out.iter().all(|v| v.is_finite() && *v >= 0.0));
    }
}
