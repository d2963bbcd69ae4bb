//! Elevation inputs: synthetic DEM generation and resampling of externally
//! supplied rasters to the simulation resolution.

use noise::{NoiseFn, Perlin};

use crate::grid::{GridField, Region};

/// Mean elevation of the synthetic plateau, metres.
const BASE_ELEVATION_M: f64 = 900.0;
/// Amplitude of the long-wavelength relief, metres.
const RELIEF_AMPLITUDE_M: f64 = 50.0;
/// Amplitude of the Perlin roughness overlay, metres.
const ROUGHNESS_AMPLITUDE_M: f64 = 10.0;

/// Generate a deterministic synthetic DEM: a gentle plateau with one full
/// sinusoidal undulation per axis plus seeded small-scale roughness.
pub fn synthetic_elevation(size: usize, region: Region, seed: u64) -> GridField {
    let perlin = Perlin::new(((seed ^ 0x7E11_AA10) & 0xFFFF_FFFF) as u32);
    // Roughness wavelength: ~6 cycles across the grid.
    let freq = 6.0 / size.max(1) as f64;
    let span = (size.max(2) - 1) as f64;

    let mut field = GridField::zeros(size, region);
    for row in 0..size {
        for col in 0..size {
            let x = col as f64 / span;
            let y = row as f64 / span;
            let relief = RELIEF_AMPLITUDE_M
                * (std::f64::consts::TAU * x).sin()
                * (std::f64::consts::TAU * y).cos();
            let roughness =
                ROUGHNESS_AMPLITUDE_M * perlin.get([col as f64 * freq, row as f64 * freq]);
            field.set(row, col, (BASE_ELEVATION_M + relief + roughness) as f32);
        }
    }
    field
}

/// Adapt an externally supplied elevation raster to the simulation grid,
/// resampling only when the resolutions differ.
pub fn prepare_elevation(source: &GridField, size: usize) -> GridField {
    if source.size == size {
        source.clone()
    } else {
        source.resample(size)
    }
}
