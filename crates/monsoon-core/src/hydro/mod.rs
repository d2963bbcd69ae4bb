//! Hydrological response engine.
//!
//! Advances the (H, N, N) water-depth state as a strict Markov chain over
//! hourly timesteps: `depth[t]` derives only from `depth[t-1]`, the
//! precipitation frame, and the static terrain and land-surface fields.
//! Each timestep runs a parallel per-cell water balance, a snapshot-based
//! downhill flow redistribution, and flood-extent classification.

mod balance;
mod routing;

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::error::SimulationError;
use crate::grid::{ExtentSeries, FieldSeries, FloodClass, GridField};
use crate::surface::SurfaceParams;

/// Water depth and discretized flood extent for every timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct HydroResponse {
    /// Water depth, mm, non-negative.
    pub depth: FieldSeries,
    pub extent: ExtentSeries,
}

/// Run the response engine over the whole forecast horizon.
///
/// Fails with [`SimulationError::GridMismatch`] when the terrain or
/// land-surface fields do not match the forecast resolution; the timestep
/// loop itself is total.
pub fn simulate_response(
    forecast: &FieldSeries,
    terrain: &GridField,
    surface: &SurfaceParams,
    start: DateTime<Utc>,
) -> Result<HydroResponse, SimulationError> {
    if forecast.steps == 0 {
        return Err(SimulationError::EmptyForecast);
    }
    let size = forecast.size;
    if terrain.size != size {
        return Err(SimulationError::GridMismatch { expected: size, actual: terrain.size });
    }
    if surface.size() != size {
        return Err(SimulationError::GridMismatch { expected: size, actual: surface.size() });
    }

    let cells = size * size;
    let mut depth = FieldSeries::zeros(forecast.steps, size);
    let mut extent = ExtentSeries::new(forecast.steps, size);

    let mut prev = vec![0.0f32; cells];
    let mut current = vec![0.0f32; cells];

    for t in 0..forecast.steps {
        let hour = (start + Duration::hours(t as i64)).hour();
        let evaporation = balance::evaporation_mm_h(hour);

        balance::balance_step(&prev, forecast.step(t), surface, evaporation, &mut current);
        if t > 0 {
            routing::redistribute(&mut current, terrain, surface);
        }

        depth.step_mut(t).copy_from_slice(&current);
        for (class, &d) in extent.step_mut(t).iter_mut().zip(current.iter()) {
            *class = FloodClass::from_depth(d);
        }

        std::mem::swap(&mut prev, &mut current);
    }

    Ok(HydroResponse { depth, extent })
}
