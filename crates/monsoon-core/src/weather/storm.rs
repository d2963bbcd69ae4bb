//! Storm-system instantiation and rasterization onto a timestep frame.

use rand::rngs::StdRng;
use rand::Rng;
use std::f64::consts::{PI, TAU};

/// Storm centers keep this many cells clear of the grid edge.
const CENTER_MARGIN: usize = 5;
/// Chance of light background rain on cells outside the storm footprint.
const BACKGROUND_CHANCE: f64 = 0.1;
/// Background rain runs at 10% of the scenario's base intensity.
const BACKGROUND_SCALE: f64 = 0.1;

/// One instantiated stochastic rainfall event: a center, a radius, and an
/// intensity profile shaped by distance decay, terrain, and wind.
#[derive(Debug, Clone, Copy)]
pub struct StormSystem {
    pub center_row: usize,
    pub center_col: usize,
    /// Footprint radius in cells.
    pub radius: f64,
    /// Scenario base intensity, mm/h.
    pub intensity_mm_h: f64,
    /// Per-storm intensity multiplier.
    pub variation: f64,
    /// Prevailing wind bearing, radians.
    pub wind_direction: f64,
}

impl StormSystem {
    /// Draw one storm for a scenario of the given base intensity.
    pub fn sample(rng: &mut StdRng, size: usize, intensity_mm_h: f64) -> Self {
        let margin = if size > 2 * CENTER_MARGIN { CENTER_MARGIN } else { 0 };
        Self {
            center_row: rng.gen_range(margin..size - margin),
            center_col: rng.gen_range(margin..size - margin),
            radius: rng.gen_range(15.0..40.0),
            intensity_mm_h,
            variation: rng.gen_range(0.2..2.0),
            wind_direction: rng.gen_range(0.0..TAU),
        }
    }

    /// Accumulate this storm's rainfall into one row-major timestep frame.
    ///
    /// Inside the footprint the contribution is the product of base
    /// intensity, exponential distance decay, two sinusoidal terrain terms,
    /// a per-cell uniform noise multiplier, and a wind term keyed to the
    /// bearing from the center; cells outside the footprint occasionally
    /// pick up background drizzle. Contributions are additive across storms.
    pub fn rasterize(&self, frame: &mut [f32], size: usize, rng: &mut StdRng) {
        let n = size as f64;
        for i in 0..size {
            for j in 0..size {
                let di = i as f64 - self.center_row as f64;
                let dj = j as f64 - self.center_col as f64;
                let distance = (di * di + dj * dj).sqrt();

                if distance < self.radius {
                    let decay = (-distance / (self.radius * 0.5)).exp();
                    let terrain =
                        1.0 + 0.8 * (i as f64 * TAU / n).sin() * (j as f64 * TAU / n).cos();
                    let orographic =
                        1.0 + 0.6 * (i as f64 * PI / 30.0).sin() * (j as f64 * PI / 25.0).cos();
                    let spatial_noise = rng.gen_range(0.1..2.5);
                    let wind = 1.0 + 0.4 * (self.wind_direction + dj.atan2(di)).cos();

                    let local = self.intensity_mm_h
                        * decay
                        * self.variation
                        * terrain
                        * orographic
                        * spatial_noise
                        * wind;
                    frame[i * size + j] += local.max(0.0) as f32;
                } else if rng.gen::<f64>() < BACKGROUND_CHANCE {
                    let background =
                        self.intensity_mm_h * BACKGROUND_SCALE * rng.gen_range(0.1..0.8);
                    frame[i * size + j] += background as f32;
                }
            }
        }
    }
}
