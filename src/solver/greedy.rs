//! Greedy constructive solver.

use super::{QapSolver, Sample, SolverConfig};
use crate::error::QapResult;
use crate::model::{QapModel, VarId};
use std::collections::{HashMap, HashSet};

/// A deterministic greedy solver for testing.
///
/// Walks the timesteps in order; within each step, assigns every
/// facility to the free location with the lowest marginal objective
/// cost against the variables already fixed. Always returns a feasible
/// sample. This is a trivial heuristic, not a real optimizer.
///
/// # Limitations
///
/// - No backtracking, no lookahead
/// - Solution quality depends heavily on the facility ordering
pub struct GreedySolver;

impl GreedySolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GreedySolver {
    fn default() -> Self {
        Self::new()
    }
}

impl QapSolver for GreedySolver {
    fn solve(&self, model: &QapModel, _config: &SolverConfig) -> QapResult<Sample> {
        let n = model.facilities;

        // Term adjacency: every quadratic term, seen from both ends.
        let mut adjacency: HashMap<VarId, Vec<(VarId, f64)>> = HashMap::new();
        for term in &model.terms {
            adjacency.entry(term.x).or_default().push((term.y, term.coeff));
            adjacency.entry(term.y).or_default().push((term.x, term.coeff));
        }

        let mut chosen: HashSet<VarId> = HashSet::new();
        let mut locations: Vec<Vec<usize>> = Vec::with_capacity(model.time_steps);

        for t in 0..model.time_steps {
            let mut free = vec![true; n];
            let mut perm = vec![0usize; n];

            for j in 0..n {
                let mut best_location = 0usize;
                let mut best_cost = f64::INFINITY;
                for (m, _) in free.iter().enumerate().filter(|(_, &open)| open) {
                    let var = VarId::new(j, m, t);
                    let cost: f64 = adjacency
                        .get(&var)
                        .map(|edges| {
                            edges
                                .iter()
                                .filter(|(other, _)| chosen.contains(other))
                                .map(|(_, c)| *c)
                                .sum()
                        })
                        .unwrap_or(0.0);
                    if cost < best_cost {
                        best_cost = cost;
                        best_location = m;
                    }
                }

                free[best_location] = false;
                perm[j] = best_location;
                chosen.insert(VarId::new(j, best_location, t));
            }
            locations.push(perm);
        }

        Ok(Sample::from_permutations(&locations))
    }
}
