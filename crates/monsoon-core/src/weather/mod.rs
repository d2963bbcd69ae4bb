//! Synthetic precipitation forecast generator.
//!
//! Produces a spatially and temporally correlated (H, N, N) rainfall field
//! in mm/h. Each hourly timestep draws 2–4 candidate weather systems; a
//! seasonally and diurnally modulated gate decides which severity scenario
//! (if any) each system instantiates, and every instantiated storm
//! rasterizes an additive footprint over the grid.
//!
//! Timesteps are independent and own derived RNGs, so generation
//! parallelizes across the horizon and replays bit-identically for a given
//! seed regardless of thread count.

pub mod scenarios;
pub mod storm;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::grid::FieldSeries;
use scenarios::{diurnal_factor, monsoon_factor, SCENARIOS};
use storm::StormSystem;

/// Weather systems drawn per timestep.
const MIN_SYSTEMS: usize = 2;
const MAX_SYSTEMS: usize = 4;

/// Splitmix64 increment; spreads consecutive timestep indices across the
/// seed space so per-timestep streams never overlap.
const TIMESTEP_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Generate the full precipitation forecast: `hours` hourly frames of
/// `size`×`size` cells starting at `start`. No negative values.
pub fn generate_forecast(
    start: DateTime<Utc>,
    hours: usize,
    size: usize,
    seed: u64,
) -> FieldSeries {
    let mut forecast = FieldSeries::zeros(hours, size);
    if hours == 0 || size == 0 {
        return forecast;
    }

    forecast
        .data
        .par_chunks_mut(size * size)
        .enumerate()
        .for_each(|(t, frame)| {
            let time = start + Duration::hours(t as i64);
            let mut rng =
                StdRng::seed_from_u64(seed ^ (t as u64).wrapping_mul(TIMESTEP_SEED_MIX));
            generate_timestep(frame, size, time, &mut rng);
        });

    forecast
}

/// Fill one timestep frame from its own RNG stream.
fn generate_timestep(frame: &mut [f32], size: usize, time: DateTime<Utc>, rng: &mut StdRng) {
    let monsoon = monsoon_factor(time);
    let diurnal = diurnal_factor(time);

    let n_systems = rng.gen_range(MIN_SYSTEMS..=MAX_SYSTEMS);
    for _ in 0..n_systems {
        let gate = rng.gen::<f64>() * monsoon * diurnal;
        if let Some(scenario) = SCENARIOS.iter().find(|s| gate < s.probability) {
            let storm = StormSystem::sample(rng, size, scenario.intensity_mm_h);
            storm.rasterize(frame, size, rng);
        }
    }
}
