//! Per-cell water balance: the embarrassingly parallel phase of a timestep.
//! No cell reads another cell's state here; cross-cell transport happens in
//! the routing phase.

use rayon::prelude::*;

use crate::surface::{SurfaceParams, BASE_INFILTRATION_MM_H};

/// Standing water that fully saturates the soil column, mm.
const SATURATION_CAPACITY_MM: f32 = 50.0;
/// Saturated soil infiltrates at 20% of its dry capacity.
const SATURATION_INFILTRATION_CUT: f32 = 0.8;
/// Daytime evaporation, mm/h.
const DAY_EVAPORATION_MM_H: f32 = 2.0;
/// Nights evaporate at 30% of the day rate.
const NIGHT_EVAPORATION_FACTOR: f32 = 0.3;

/// Spatially uniform evaporation rate for the given hour of day (0–23).
pub(crate) fn evaporation_mm_h(hour: u32) -> f32 {
    if (6..=18).contains(&hour) {
        DAY_EVAPORATION_MM_H
    } else {
        DAY_EVAPORATION_MM_H * NIGHT_EVAPORATION_FACTOR
    }
}

/// Advance every cell one hour: rainfall input scaled by the runoff
/// coefficient, minus saturation-damped infiltration and evaporation,
/// floored at the retention threshold.
pub(crate) fn balance_step(
    prev: &[f32],
    precip: &[f32],
    surface: &SurfaceParams,
    evaporation: f32,
    out: &mut [f32],
) {
    let infiltration = &surface.infiltration.data;
    let runoff = &surface.runoff.data;
    out.par_iter_mut().enumerate().for_each(|(idx, cell)| {
        *cell = balance_cell(prev[idx], precip[idx], infiltration[idx], runoff[idx], evaporation);
    });
}

#[inline]
fn balance_cell(prev: f32, precip: f32, infiltration: f32, runoff: f32, evaporation: f32) -> f32 {
    let saturation = (prev / SATURATION_CAPACITY_MM).min(1.0);
    let effective_infiltration = infiltration * (1.0 - saturation * SATURATION_INFILTRATION_CUT);

    let net_input = precip * runoff;
    // Losses cannot exceed the water actually present.
    let loss = (effective_infiltration + evaporation).min(prev + net_input);
    let depth = (prev + net_input - loss).max(0.0);

    // Minimum pooling before visible standing water; permeable soils hold
    // more back.
    let retention = 0.5 + 0.5 * infiltration / BASE_INFILTRATION_MM_H;
    if depth < retention {
        0.0
    } else {
        depth
    }
}
