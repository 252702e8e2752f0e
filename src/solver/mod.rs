//! Solver boundary.
//!
//! The core treats the solver as an opaque synchronous call: submit a
//! [`QapModel`] with a time budget, receive one [`Sample`] — possibly
//! constraint-violating — representing the best solution found. No
//! retrying, no validation; repair happens downstream in
//! [`crate::repair`].
//!
//! Implementations plug in through the [`QapSolver`] trait. This can
//! wrap external engines (cloud hybrid samplers, IP solvers) or provide
//! in-process heuristics; two of the latter ship with the crate:
//!
//! - [`GreedySolver`]: deterministic constructive baseline for tests.
//! - [`AnnealingSolver`]: simulated annealing over permutation
//!   sequences, honoring the time budget.

mod annealing;
mod greedy;

pub use annealing::AnnealingSolver;
pub use greedy::GreedySolver;

use crate::error::QapResult;
use crate::model::{QapModel, VarId};
use std::collections::HashMap;

/// One candidate solution: a map from variable identity to a
/// near-binary value.
///
/// Missing variables read as 0, mirroring how samplers omit unset
/// variables.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    values: HashMap<VarId, f64>,
}

impl Sample {
    /// Creates an empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable's value.
    pub fn set(&mut self, var: VarId, value: f64) {
        self.values.insert(var, value);
    }

    /// Reads a variable's value; missing keys default to 0.
    pub fn get(&self, var: VarId) -> f64 {
        self.values.get(&var).copied().unwrap_or(0.0)
    }

    /// Number of explicitly set variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no variable was set at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Builds a sample from a permutation sequence.
    ///
    /// `locations[t][j]` is the location of facility `j` at step `t`;
    /// the corresponding variables are set to 1, everything else is
    /// left unset.
    pub fn from_permutations(locations: &[Vec<usize>]) -> Self {
        let mut sample = Self::new();
        for (t, perm) in locations.iter().enumerate() {
            for (j, &m) in perm.iter().enumerate() {
                sample.set(VarId::new(j, m, t), 1.0);
            }
        }
        sample
    }
}

/// Solver configuration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Wall-clock budget in milliseconds.
    pub time_limit_ms: u64,
    /// Random seed for stochastic solvers.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 60_000,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Sets the wall-clock budget.
    pub fn with_time_limit_ms(mut self, time_limit_ms: u64) -> Self {
        self.time_limit_ms = time_limit_ms;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Trait for QAP solver implementations.
///
/// Implementors return whatever best sample the engine produced; an
/// engine fault maps to [`crate::error::QapError::Solver`]. The caller
/// owns emptiness checks and repair.
pub trait QapSolver {
    /// Solves the model within the configured budget.
    fn solve(&self, model: &QapModel, config: &SolverConfig) -> QapResult<Sample>;
}
