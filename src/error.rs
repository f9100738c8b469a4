//! Error types for marga-nav.
//!
//! Only configuration problems surface as errors. Run-time outcomes such as
//! "no path this tick" or a stuck agent are ordinary results reported
//! through the simulation API, never through this type.

use thiserror::Error;

use crate::core::Cell;

/// marga-nav error type.
#[derive(Error, Debug)]
pub enum MargaError {
    #[error("grid size must be at least 2, got {0}")]
    InvalidGridSize(usize),

    #[error("cell {0} is outside the {1}x{1} grid")]
    OutOfBounds(Cell, usize),

    #[error("start and goal must be distinct cells")]
    StartEqualsGoal,

    #[error("{name} must lie in [0, 1), got {value}")]
    ParameterOutOfRange { name: &'static str, value: f32 },

    #[error("no solvable obstacle layout found after {0} attempts")]
    GenerationExhausted(usize),

    #[error("environment does not match the run configuration: {0}")]
    EnvironmentMismatch(&'static str),
}

pub type Result<T> = std::result::Result<T, MargaError>;
