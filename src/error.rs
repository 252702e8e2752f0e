//! Error taxonomy for the QAP pipeline.
//!
//! Three failure categories cross the crate boundary: rejected input,
//! a solver that produced nothing usable, and opaque solver/internal
//! faults. Constraint-violation repair is deliberately NOT an error —
//! it is handled locally in [`crate::repair`] and logged.

use thiserror::Error;

/// Errors surfaced by model building, solving, and extraction.
#[derive(Error, Debug)]
pub enum QapError {
    /// Input matrices or scalar parameters failed validation.
    ///
    /// Raised before any model construction: non-square distance
    /// matrix, flow matrices whose shape differs from the distance
    /// matrix, non-positive horizon or size, negative relocation
    /// weight.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The solver returned no usable sample.
    ///
    /// Not fatal to the process; the caller decides whether to retry
    /// with different parameters.
    #[error("no assignments produced: solver returned an empty sample")]
    EmptySolution,

    /// The solver engine itself failed.
    #[error("solver failure: {0}")]
    Solver(String),
}

/// Convenience alias used throughout the crate.
pub type QapResult<T> = Result<T, QapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_distinguishes_categories() {
        let invalid = QapError::InvalidInput("distance matrix is 3x4".into());
        let empty = QapError::EmptySolution;
        let solver = QapError::Solver("connection refused".into());

        assert!(invalid.to_string().contains("invalid input"));
        assert!(empty.to_string().contains("no assignments produced"));
        assert!(solver.to_string().contains("solver failure"));
    }
}
