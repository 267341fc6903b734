//! Analytic decay spectra.

use crate::error::{ensure_non_negative, ensure_positive, Result};

/// Electron rest mass in MeV.
pub const ELECTRON_MASS_MEV: f64 = 0.511;

/// Primakoff-Rosen approximation to the 2vbb summed-electron spectrum.
///
/// `dN/dE = (E^4 + 10E^3 + 40E^2 + 60E + 30) * E * (Q - E)^5`
///
/// with `E` and `Q` in units of the electron mass. Inputs are in MeV. The
/// result is unnormalized and zero above the endpoint.
pub fn primakoff_rosen(energy: f64, q_value: f64) -> Result<f64> {
    ensure_non_negative("energy", energy)?;
    ensure_positive("q_value", q_value)?;
    Ok(primakoff_rosen_unchecked(energy, q_value))
}

fn primakoff_rosen_unchecked(energy: f64, q_value: f64) -> f64 {
    if energy > q_value {
        return 0.0;
    }
    let e = energy / ELECTRON_MASS_MEV;
    let q = q_value / ELECTRON_MASS_MEV;
    let poly = (((e + 10.0) * e + 40.0) * e + 60.0) * e + 30.0;
    poly * e * (q - e).powi(5)
}

/// [`primakoff_rosen`] at every energy in `energies`.
pub fn primakoff_rosen_spectrum(energies: &[f64], q_value: f64) -> Result<Vec<f64>> {
    ensure_positive("q_value", q_value)?;
    energies
        .iter()
        .map(|&e| {
            ensure_non_negative("energy", e)?;
            Ok(primakoff_rosen_unchecked(e, q_value))
        })
        .collect()
}
