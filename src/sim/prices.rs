use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::error::ValidationError;
use crate::price::{DayPrices, HOURS_PER_DAY};

/// A plausible day-ahead curve: cheap at night, peaks in the morning and
/// early evening, with seeded jitter.
pub fn default_curve(seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..HOURS_PER_DAY)
        .map(|h| {
            let shape = match h {
                0..=5 => 0.45,
                6..=9 => 1.30,
                10..=15 => 0.90,
                16..=20 => 1.60,
                _ => 0.75,
            };
            let jitter = rng.random_range(-0.05..0.05);
            ((shape + jitter) * 100.0_f64).round() / 100.0
        })
        .collect()
}

/// Day table for the simulation: the configured values by hour, or the
/// default curve.
///
/// # Errors
///
/// Returns [`ValidationError::HourOutOfRange`] if more than 24 values are given.
pub fn simulation_day(configured: Option<&[f64]>, seed: u64) -> Result<DayPrices, ValidationError> {
    let values = match configured {
        Some(v) => v.to_vec(),
        None => default_curve(seed),
    };
    DayPrices::from_pairs(values.into_iter().enumerate().map(|(h, v)| (h as u32, v)))
}
