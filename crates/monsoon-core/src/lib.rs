//! monsoon-core: seeded flood-progression simulation over a fixed
//! geographic grid.
//!
//! Four stages, data flowing strictly forward:
//!
//!   1. `weather`  — synthetic, spatially correlated precipitation forecast
//!   2. `hydro`    — hourly water-depth / flood-extent state transition
//!   3. `analysis` — daily statistics and risk classification
//!   4. `alerts`   — actionable alert and warning records
//!
//! Every stage is a pure function of its inputs plus a fixed seed: runs
//! replay bit-identically, stages test independently, and independent runs
//! may execute concurrently with no shared state.

pub mod alerts;
pub mod analysis;
pub mod error;
pub mod grid;
pub mod hydro;
pub mod pipeline;
pub mod surface;
pub mod terrain;
pub mod weather;

pub use error::SimulationError;
pub use pipeline::{
    run_simulation, run_simulation_with_terrain, SimulationOutcome, SimulationParams,
};
