//! Static land-surface parameter fields: infiltration capacity and runoff
//! coefficient, derived once per simulation from seeded spatial random
//! fields with urban patches overlaid.
//!
//! Urban patches are randomly placed disks that suppress infiltration and
//! raise runoff, standing in for paved land-use patterns.

use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::grid::{GridField, Region};

/// Dry-soil infiltration capacity baseline, mm/h.
pub const BASE_INFILTRATION_MM_H: f32 = 5.0;
/// Baseline fraction of incident rain that becomes surface water.
pub const BASE_RUNOFF: f32 = 0.7;

const URBAN_PATCHES: usize = 10;
/// Patch centers keep this many cells clear of the grid edge.
const URBAN_MARGIN: usize = 10;
/// Urban cells infiltrate at 20% of their rural capacity.
const URBAN_INFILTRATION_CUT: f32 = 0.2;
const URBAN_RUNOFF_BOOST: f32 = 1.8;
const URBAN_RUNOFF_CAP: f32 = 0.95;

/// The two static per-cell hydrological parameter fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceParams {
    /// mm/h a cell can absorb with dry soil.
    pub infiltration: GridField,
    /// Fraction 0..1 of incident rain that becomes surface water.
    pub runoff: GridField,
}

impl SurfaceParams {
    /// Derive both fields from seeded low-frequency noise, then overlay
    /// urban patches. Deterministic for a given seed and size.
    pub fn generate(size: usize, region: Region, seed: u64) -> Self {
        let infiltration_noise = Perlin::new(((seed ^ 0x5011_F17A) & 0xFFFF_FFFF) as u32);
        let runoff_noise = Perlin::new(((seed ^ 0x1A4D_0FF0) & 0xFFFF_FFFF) as u32);
        // ~4 cycles across the grid, enough for distinct soil districts.
        let freq = 4.0 / size.max(1) as f64;

        let mut infiltration = GridField::zeros(size, region);
        let mut runoff = GridField::zeros(size, region);

        for row in 0..size {
            for col in 0..size {
                let x = col as f64 * freq;
                let y = row as f64 * freq;

                // Noise in roughly [-1, 1], remapped to a uniform-like [0, 1].
                let t_inf = (infiltration_noise.get([x, y]) * 0.5 + 0.5).clamp(0.0, 1.0) as f32;
                let t_run = (runoff_noise.get([x, y]) * 0.5 + 0.5).clamp(0.0, 1.0) as f32;

                infiltration.set(row, col, BASE_INFILTRATION_MM_H * (0.5 + 1.5 * t_inf));
                runoff.set(row, col, (BASE_RUNOFF * (0.3 + 1.4 * t_run)).min(1.0));
            }
        }

        let mut params = Self { infiltration, runoff };
        if size > 2 * URBAN_MARGIN {
            params.overlay_urban_patches(seed);
        }
        params
    }

    /// Spatially uniform parameters. Used for flat-scenario tests and
    /// sensitivity runs.
    pub fn uniform(size: usize, region: Region, infiltration_mm_h: f32, runoff_coeff: f32) -> Self {
        Self {
            infiltration: GridField::filled(size, region, infiltration_mm_h),
            runoff: GridField::filled(size, region, runoff_coeff),
        }
    }

    pub fn size(&self) -> usize {
        self.infiltration.size
    }

    fn overlay_urban_patches(&mut self, seed: u64) {
        let size = self.size();
        let mut rng = StdRng::seed_from_u64(seed ^ 0x06B4_A21C_3D5E_9F87);

        for _ in 0..URBAN_PATCHES {
            let center_row = rng.gen_range(URBAN_MARGIN..size - URBAN_MARGIN);
            let center_col = rng.gen_range(URBAN_MARGIN..size - URBAN_MARGIN);
            let radius = rng.gen_range(8..15) as f64;

            let reach = radius.ceil() as usize;
            let row_lo = center_row.saturating_sub(reach);
            let row_hi = (center_row + reach + 1).min(size);
            let col_lo = center_col.saturating_sub(reach);
            let col_hi = (center_col + reach + 1).min(size);

            for row in row_lo..row_hi {
                for col in col_lo..col_hi {
                    let dr = row as f64 - center_row as f64;
                    let dc = col as f64 - center_col as f64;
                    if (dr * dr + dc * dc).sqrt() < radius {
                        let inf = self.infiltration.get(row, col) * URBAN_INFILTRATION_CUT;
                        self.infiltration.set(row, col, inf);
                        let run =
                            (self.runoff.get(row, col) * URBAN_RUNOFF_BOOST).min(URBAN_RUNOFF_CAP);
                        self.runoff.set(row, col, run);
                    }
                }
            }
        }
    }
}
