//! Chocula math utilities.
//!
//! Distribution primitives (Poisson, Gaussian, detector-resolution smearing)
//! and the log-domain kernels the interval engines are built on.

pub mod error;
pub mod math;

pub use error::{MathError, Result};
pub use math::erf::*;
pub use math::gaussian::*;
pub use math::poisson::*;
pub use math::resolution::*;
pub use math::spectrum::*;
pub use math::stable::*;
