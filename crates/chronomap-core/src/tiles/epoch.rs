use crate::consts::{MAX_YEARS_BP, YEARS_SLIDER_BASE, YEARS_SLIDER_MAX};
use crate::error::{ChronoError, Result};

/// Epoch whose biome raster represents `years_bp` years before present:
/// the earliest epoch not older than `-years_bp`.
pub fn resolve_epoch(epochs: &[i32], years_bp: u32) -> Result<i32> {
    let year = -(years_bp as i64);
    epochs
        .iter()
        .copied()
        .filter(|&e| e as i64 >= year)
        .min()
        .ok_or(ChronoError::NoEpoch { years_bp })
}

/// Clamp a user-entered years-BP value into the supported range.
pub fn clamp_years_bp(years: i64) -> u32 {
    years.clamp(0, MAX_YEARS_BP as i64) as u32
}

/// Map a slider exponent in `0..=100` to years BP on an exponential scale,
/// so recent millennia get most of the slider travel.
pub fn years_bp_from_slider(exponent: f64) -> u32 {
    let e = exponent.clamp(0.0, YEARS_SLIDER_MAX);
    let years =
        (MAX_YEARS_BP as f64 * YEARS_SLIDER_BASE.powf(e) / YEARS_SLIDER_BASE.powf(YEARS_SLIDER_MAX))
            .ceil();
    clamp_years_bp(years as i64)
}
