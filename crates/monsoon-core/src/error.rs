use thiserror::Error;

/// Failures the pipeline stages can report. All stage functions are total
/// for well-formed input; these cover malformed shapes and preconditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// A static field does not match the forecast grid resolution.
    #[error("grid size mismatch: expected {expected}x{expected} cells, got {actual}x{actual}")]
    GridMismatch { expected: usize, actual: usize },

    /// A series is shorter than the requested analysis window.
    #[error("analysis window needs {required} hourly steps but the series holds {available}")]
    HorizonTooShort { required: usize, available: usize },

    /// The forecast contains no timesteps at all.
    #[error("precipitation forecast is empty")]
    EmptyForecast,
}
