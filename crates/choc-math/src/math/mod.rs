//! Core math modules.

pub mod erf;
pub mod gaussian;
pub mod poisson;
pub mod resolution;
pub mod spectrum;
pub mod stable;
