//! Finalized model value: constraints, quadratic terms, evaluation.

use super::variables::VarId;
use crate::solver::Sample;

/// Penalty weight attached to every assignment constraint.
///
/// Signals to soft-constraint solvers that the exactly-one families are
/// hard requirements.
pub const ASSIGNMENT_PENALTY: f64 = 1000.0;

/// Which exactly-one family a constraint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintKind {
    /// One location per facility at the given step.
    Facility { facility: usize, step: usize },
    /// One facility per location at the given step.
    Location { location: usize, step: usize },
}

/// Linear equality constraint: the listed variables must sum to 1.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExactlyOne {
    /// Family and index of this constraint.
    pub kind: ConstraintKind,
    /// Variables participating in the sum.
    pub vars: Vec<VarId>,
    /// Penalty weight under soft-constraint solvers.
    pub penalty: f64,
}

/// One weighted pairwise product in the objective.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadTerm {
    /// First variable.
    pub x: VarId,
    /// Second variable.
    pub y: VarId,
    /// Term coefficient.
    pub coeff: f64,
}

/// A finalized time-dependent QAP model.
///
/// Bundles the decision space, the two exactly-one constraint families,
/// and the quadratic objective. Built once by
/// [`build_model`](super::build_model) and never mutated afterwards.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QapModel {
    /// Number of facilities (and locations).
    pub facilities: usize,
    /// Number of timesteps.
    pub time_steps: usize,
    /// Exactly-one constraints, 2·N·T of them.
    pub constraints: Vec<ExactlyOne>,
    /// Objective terms.
    pub terms: Vec<QuadTerm>,
}

impl QapModel {
    /// Number of binary variables (N²·T).
    pub fn variable_count(&self) -> usize {
        self.facilities * self.facilities * self.time_steps
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Number of objective terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Iterates over every variable identity in the model.
    pub fn variables(&self) -> impl Iterator<Item = VarId> {
        let n = self.facilities;
        (0..self.time_steps).flat_map(move |t| {
            (0..n).flat_map(move |j| (0..n).map(move |m| VarId::new(j, m, t)))
        })
    }

    /// Objective value of a raw sample.
    ///
    /// Missing variables read as 0, so partial samples evaluate
    /// without error.
    pub fn evaluate(&self, sample: &Sample) -> f64 {
        self.terms
            .iter()
            .map(|t| t.coeff * sample.get(t.x) * sample.get(t.y))
            .sum()
    }

    /// Objective value of a permutation sequence.
    ///
    /// `locations[t][j]` is the location of facility `j` at step `t`.
    pub fn evaluate_permutations(&self, locations: &[Vec<usize>]) -> f64 {
        self.terms
            .iter()
            .filter(|t| {
                locations[t.x.step][t.x.facility] == t.x.location
                    && locations[t.y.step][t.y.facility] == t.y.location
            })
            .map(|t| t.coeff)
            .sum()
    }

    /// Number of exactly-one constraints whose rounded sum is not 1.
    pub fn violations(&self, sample: &Sample) -> usize {
        self.constraints
            .iter()
            .filter(|c| {
                let sum: f64 = c.vars.iter().map(|&v| sample.get(v)).sum();
                sum.round() as i64 != 1
            })
            .count()
    }
}
