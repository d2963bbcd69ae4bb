//! Core spatial types: geographic region, square grid fields, time-indexed
//! field series, and the discretized flood-extent classification.
//!
//! Grid identity is positional (row, column) with a fixed linear mapping to
//! latitude/longitude. Row 0 is the southern edge, column 0 the western edge.

use serde::{Deserialize, Serialize};

/// Geographic bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Region {
    /// Reference deployment region: the Bangalore metropolitan box.
    pub fn bangalore() -> Self {
        Self { north: 13.2, south: 12.8, east: 77.8, west: 77.3 }
    }
}

// ── GridField ─────────────────────────────────────────────────────────────────

/// A square N×N field of f32 values with geographic bounds, row-major.
/// Coordinate math uses f64; cell values use f32.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridField {
    /// Row-major cell values.
    pub data: Vec<f32>,
    /// Cells per side.
    pub size: usize,
    pub region: Region,
}

impl GridField {
    /// Create a new field filled with the given value.
    pub fn filled(size: usize, region: Region, fill: f32) -> Self {
        Self { data: vec![fill; size * size], size, region }
    }

    /// Create a zero-valued field.
    pub fn zeros(size: usize, region: Region) -> Self {
        Self::filled(size, region, 0.0)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.size + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: f32) {
        self.data[row * self.size + col] = val;
    }

    /// Latitude/longitude of a cell center via linear bounding-box
    /// interpolation: row 0 sits on the southern edge, row N−1 on the
    /// northern edge (and likewise west→east for columns).
    pub fn cell_latlon(&self, row: usize, col: usize) -> (f64, f64) {
        let span = (self.size.max(2) - 1) as f64;
        let lat = self.region.south + (self.region.north - self.region.south) * row as f64 / span;
        let lon = self.region.west + (self.region.east - self.region.west) * col as f64 / span;
        (lat, lon)
    }

    /// Sample the field at (lat, lon) using bilinear interpolation.
    /// Returns None if the point lies outside the region.
    pub fn sample(&self, lat: f64, lon: f64) -> Option<f32> {
        let r = &self.region;
        if lat < r.south || lat > r.north || lon < r.west || lon > r.east {
            return None;
        }

        let span = (self.size.max(2) - 1) as f64;
        let fy = (lat - r.south) / (r.north - r.south) * span;
        let fx = (lon - r.west) / (r.east - r.west) * span;

        let x0 = fx.floor() as usize;
        let y0 = fy.floor() as usize;
        let x1 = (x0 + 1).min(self.size - 1);
        let y1 = (y0 + 1).min(self.size - 1);

        let tx = (fx - x0 as f64) as f32;
        let ty = (fy - y0 as f64) as f32;

        let v00 = self.get(y0, x0);
        let v10 = self.get(y0, x1);
        let v01 = self.get(y1, x0);
        let v11 = self.get(y1, x1);

        let v = v00 * (1.0 - tx) * (1.0 - ty)
            + v10 * tx * (1.0 - ty)
            + v01 * (1.0 - tx) * ty
            + v11 * tx * ty;

        Some(v)
    }

    /// Resample to a different resolution over the same region by bilinear
    /// interpolation of fractional source indices.
    pub fn resample(&self, size: usize) -> GridField {
        let mut out = GridField::zeros(size, self.region);
        let src_span = (self.size.max(2) - 1) as f64;
        let dst_span = (size.max(2) - 1) as f64;

        for row in 0..size {
            for col in 0..size {
                let fy = row as f64 / dst_span * src_span;
                let fx = col as f64 / dst_span * src_span;

                let x0 = fx.floor() as usize;
                let y0 = fy.floor() as usize;
                let x1 = (x0 + 1).min(self.size - 1);
                let y1 = (y0 + 1).min(self.size - 1);

                let tx = (fx - x0 as f64) as f32;
                let ty = (fy - y0 as f64) as f32;

                let v = self.get(y0, x0) * (1.0 - tx) * (1.0 - ty)
                    + self.get(y0, x1) * tx * (1.0 - ty)
                    + self.get(y1, x0) * (1.0 - tx) * ty
                    + self.get(y1, x1) * tx * ty;
                out.set(row, col, v);
            }
        }
        out
    }

    pub fn min_value(&self) -> f32 {
        self.data.iter().cloned().fold(f32::INFINITY, f32::min)
    }

    pub fn max_value(&self) -> f32 {
        self.data.iter().cloned().fold(f32::NEG_INFINITY, f32::max)
    }
}

// ── FieldSeries ───────────────────────────────────────────────────────────────

/// A time-indexed stack of square fields: shape (steps, size, size), one
/// row-major frame per timestep. Used for precipitation and water depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSeries {
    pub data: Vec<f32>,
    pub steps: usize,
    pub size: usize,
}

impl FieldSeries {
    pub fn zeros(steps: usize, size: usize) -> Self {
        Self { data: vec![0.0; steps * size * size], steps, size }
    }

    #[inline]
    pub fn at(&self, t: usize, row: usize, col: usize) -> f32 {
        self.data[(t * self.size + row) * self.size + col]
    }

    #[inline]
    pub fn set(&mut self, t: usize, row: usize, col: usize, val: f32) {
        self.data[(t * self.size + row) * self.size + col] = val;
    }

    /// One timestep's frame as a row-major slice.
    pub fn step(&self, t: usize) -> &[f32] {
        let cells = self.size * self.size;
        &self.data[t * cells..(t + 1) * cells]
    }

    pub fn step_mut(&mut self, t: usize) -> &mut [f32] {
        let cells = self.size * self.size;
        &mut self.data[t * cells..(t + 1) * cells]
    }

    pub fn max_value(&self) -> f32 {
        self.data.iter().cloned().fold(0.0, f32::max)
    }
}

// ── Flood extent ──────────────────────────────────────────────────────────────

/// Discretized flood severity class for a single cell at a single timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum FloodClass {
    None = 0,
    Light = 1,
    Moderate = 2,
    Severe = 3,
}

impl FloodClass {
    /// Classify a water depth in mm. Thresholds are exclusive: depth must
    /// strictly exceed 5/10/20 mm to count as Light/Moderate/Severe.
    pub fn from_depth(depth_mm: f32) -> Self {
        if depth_mm > 20.0 {
            Self::Severe
        } else if depth_mm > 10.0 {
            Self::Moderate
        } else if depth_mm > 5.0 {
            Self::Light
        } else {
            Self::None
        }
    }

    #[inline]
    pub fn is_flooded(self) -> bool {
        self != Self::None
    }
}

/// Per-timestep flood-extent classification, shape (steps, size, size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtentSeries {
    pub data: Vec<FloodClass>,
    pub steps: usize,
    pub size: usize,
}

impl ExtentSeries {
    pub fn new(steps: usize, size: usize) -> Self {
        Self { data: vec![FloodClass::None; steps * size * size], steps, size }
    }

    #[inline]
    pub fn at(&self, t: usize, row: usize, col: usize) -> FloodClass {
        self.data[(t * self.size + row) * self.size + col]
    }

    pub fn step(&self, t: usize) -> &[FloodClass] {
        let cells = self.size * self.size;
        &self.data[t * cells..(t + 1) * cells]
    }

    pub fn step_mut(&mut self, t: usize) -> &mut [FloodClass] {
        let cells = self.size * self.size;
        &mut self.data[t * cells..(t + 1) * cells]
    }
}
