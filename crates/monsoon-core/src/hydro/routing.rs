//! Downhill flow redistribution.
//!
//! Three-phase pattern: snapshot the pre-redistribution depths, compute
//! per-source deltas against that snapshot (parallel over interior rows),
//! then apply all deltas in one ordered batch. Every neighbor comparison
//! reads the snapshot, so the outcome does not depend on scan or thread
//! order. Border rows and columns neither shed nor receive water.

use rayon::prelude::*;

use crate::grid::GridField;
use crate::surface::{SurfaceParams, BASE_RUNOFF};

/// Cells at or below this depth hold their water, mm.
const FLOW_THRESHOLD_MM: f32 = 3.0;
/// Cap on the fraction of a cell's depth released toward one neighbor.
const FLOW_RATE: f32 = 0.4;
/// Fraction of the head difference a single transfer may close.
const HEAD_RELAXATION: f32 = 0.3;
/// Share of each transfer that arrives; the rest infiltrates or is lost to
/// friction in transit.
const TRANSIT_EFFICIENCY: f32 = 0.8;

const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Redistribute one timestep's provisional depths downhill in place.
pub(crate) fn redistribute(depth: &mut [f32], terrain: &GridField, surface: &SurfaceParams) {
    let size = terrain.size;
    if size < 3 {
        return;
    }

    let snapshot = depth.to_vec();
    let elevation = &terrain.data;
    let runoff = &surface.runoff.data;

    // Sparse (cell, delta) lists per interior source row, all computed
    // against the snapshot.
    let row_deltas: Vec<Vec<(usize, f32)>> = (1..size - 1)
        .into_par_iter()
        .map(|i| {
            let mut deltas: Vec<(usize, f32)> = Vec::new();
            for j in 1..size - 1 {
                let idx = i * size + j;
                let depth_here = snapshot[idx];
                if depth_here <= FLOW_THRESHOLD_MM {
                    continue;
                }

                let head = elevation[idx] + depth_here;
                let flow_factor = 0.15 + 0.1 * (runoff[idx] / BASE_RUNOFF);

                for (di, dj) in NEIGHBORS {
                    let ni = (i as isize + di) as usize;
                    let nj = (j as isize + dj) as usize;
                    // No flow across the grid boundary.
                    if ni == 0 || nj == 0 || ni >= size - 1 || nj >= size - 1 {
                        continue;
                    }
                    let nidx = ni * size + nj;
                    let neighbor_head = elevation[nidx] + snapshot[nidx];
                    if head > neighbor_head {
                        let flow = (depth_here * flow_factor * FLOW_RATE)
                            .min((head - neighbor_head) * HEAD_RELAXATION);
                        deltas.push((idx, -flow));
                        deltas.push((nidx, flow * TRANSIT_EFFICIENCY));
                    }
                }
            }
            deltas
        })
        .collect();

    // Ordered apply keeps f32 accumulation deterministic.
    for deltas in row_deltas {
        for (idx, delta) in deltas {
            depth[idx] += delta;
        }
    }

    for cell in depth.iter_mut() {
        if *cell < 0.0 {
            *cell = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Region;

    fn flat_terrain(size: usize) -> GridField {
        GridField::filled(size, Region::bangalore(), 900.0)
    }

    fn uniform_surface(size: usize) -> SurfaceParams {
        SurfaceParams::uniform(size, Region::bangalore(), 5.0, 0.7)
    }

    #[test]
    fn deep_cell_sheds_to_flat_neighbors() {
        let size = 5;
        let terrain = flat_terrain(size);
        let surface = uniform_surface(size);
        let mut depth = vec![0.0f32; size * size];
        depth[2 * size + 2] = 60.0;

        redistribute(&mut depth, &terrain, &surface);

        // flow_factor = 0.25; per-neighbor flow = min(60*0.25*0.4, 60*0.3) = 6.
        let center = depth[2 * size + 2];
        assert!((center - 12.0).abs() < 1e-3, "center kept {center} mm");
        let east = depth[2 * size + 3];
        assert!((east - 4.8).abs() < 1e-3, "neighbor received {east} mm");
    }

    #[test]
    fn shallow_cells_hold_their_water() {
        let size = 5;
        let terrain = flat_terrain(size);
        let surface = uniform_surface(size);
        let mut depth = vec![0.0f32; size * size];
        depth[2 * size + 2] = 3.0;

        let before = depth.clone();
        redistribute(&mut depth, &terrain, &surface);
        assert_eq!(depth, before);
    }

    /// Borders neither receive nor emit, even with a steep gradient toward
    /// the edge and a deep cell sitting right next to it.
    #[test]
    fn border_cells_never_participate() {
        let size = 6;
        let mut terrain = flat_terrain(size);
        for row in 0..size {
            for col in 0..size {
                // Strong slope pulling water toward row 0.
                terrain.set(row, col, 900.0 + row as f32 * 10.0);
            }
        }
        let surface = uniform_surface(size);
        let mut depth = vec![0.0f32; size * size];
        depth[size + 1] = 80.0; // interior cell adjacent to two borders

        redistribute(&mut depth, &terrain, &surface);

        for col in 0..size {
            assert_eq!(depth[col], 0.0, "border row gained water at col {col}");
            assert_eq!(depth[(size - 1) * size + col], 0.0);
        }
        for row in 0..size {
            assert_eq!(depth[row * size], 0.0, "border col gained water at row {row}");
            assert_eq!(depth[row * size + size - 1], 0.0);
        }
    }

    /// Transit loss makes redistribution strictly dissipative.
    #[test]
    fn total_water_never_increases() {
        let size = 7;
        let mut terrain = flat_terrain(size);
        for row in 0..size {
            for col in 0..size {
                terrain.set(row, col, 900.0 + (row + col) as f32);
            }
        }
        let surface = uniform_surface(size);
        let mut depth = vec![0.0f32; size * size];
        depth[3 * size + 3] = 50.0;
        depth[2 * size + 4] = 20.0;

        let before: f64 = depth.iter().map(|&v| v as f64).sum();
        redistribute(&mut depth, &terrain, &surface);
        let after: f64 = depth.iter().map(|&v| v as f64).sum();
        assert!(after <= before + 1e-6, "water grew from {before} to {after}");
    }

    /// Two ridges draining into the valley between them: both transfers are
    /// computed against the same snapshot, so the valley receives exactly
    /// 80% of each ridge's independently computed outflow.
    #[test]
    fn snapshot_semantics_make_flows_order_independent() {
        let size = 5;
        let mut terrain = flat_terrain(size);
        terrain.set(2, 1, 910.0);
        terrain.set(2, 3, 910.0);
        let surface = uniform_surface(size);

        let mut depth = vec![0.0f32; size * size];
        depth[2 * size + 1] = 10.0;
        depth[2 * size + 3] = 10.0;

        redistribute(&mut depth, &terrain, &surface);

        // Each ridge: per-neighbor flow = min(10*0.25*0.4, 20*0.3) = 1.0, so
        // the valley cell gets 0.8 from each side regardless of scan order.
        let valley = depth[2 * size + 2];
        assert!((valley - 1.6).abs() < 1e-3, "valley received {valley} mm");
    }
}
