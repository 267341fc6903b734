//! Chocula Core Library
//!
//! Interval estimation for rare-event counting experiments:
//! - Feldman-Cousins confidence belts with likelihood-ratio ordering
//! - Bayesian credible intervals and upper limits with background marginalization
//! - Closed-form zero-background lifetime limits
//! - Structured logging and CLI support
//!
//! The binary entry point is in `main.rs`.

pub mod error;
pub mod exit_codes;
pub mod inference;
pub mod interval;
pub mod logging;
pub mod output;

pub use error::{IntervalError, Result};
pub use inference::bayesian::{bayesian_limit, BayesianEngine, Posterior};
pub use inference::feldman_cousins::{AcceptanceBand, BeltRow, FeldmanCousinsEngine};
pub use inference::zero_background::{
    counts_to_lifetime, lifetime_to_counts, poisson_zero_background,
};
pub use interval::{BayesianLimit, Interval, IntervalStatus};

pub use choc_math::{gaussian_pdf, poisson_pmf};
