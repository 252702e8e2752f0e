//! Raw-sample extraction and matching-based repair.
//!
//! Reconstructs one 0/1 assignment matrix per timestep from a raw
//! solver sample. Samples that already encode valid permutations pass
//! through untouched; anything else is repaired into the closest strict
//! permutation by an optimal bipartite matching over the raw entries.
//!
//! The matching cost model is a heuristic: it maximizes agreement with
//! the raw matrix, it does not reproduce whatever tradeoff the solver
//! intended when it produced an infeasible sample. Repairs are logged
//! at `warn` level and never propagated as failures.

use crate::error::{QapError, QapResult};
use crate::model::VarId;
use crate::solver::Sample;
use ndarray::{Array2, Axis};
use tracing::warn;

/// Converts a raw sample into `time_steps` strict permutation matrices.
///
/// Values are rounded half away from zero; variables missing from the
/// sample read as 0. Every returned matrix has all row and column sums
/// equal to 1, by construction, regardless of the sample's validity.
pub fn extract_assignments(
    sample: &Sample,
    time_steps: usize,
    n: usize,
) -> QapResult<Vec<Array2<u8>>> {
    if time_steps == 0 {
        return Err(QapError::InvalidInput(
            "time horizon must be positive".into(),
        ));
    }
    if n == 0 {
        return Err(QapError::InvalidInput(
            "matrix size must be positive".into(),
        ));
    }

    let mut assignments = Vec::with_capacity(time_steps);
    for t in 0..time_steps {
        let mut raw = Array2::<i64>::zeros((n, n));
        for j in 0..n {
            for m in 0..n {
                raw[[j, m]] = sample.get(VarId::new(j, m, t)).round() as i64;
            }
        }

        let assignment = if is_valid(&raw) {
            raw.mapv(|v| v as u8)
        } else {
            warn!(
                step = t,
                "assignment violates row/column sums, repairing via optimal matching"
            );
            repair(&raw)
        };
        assignments.push(assignment);
    }
    Ok(assignments)
}

/// Whether a rounded matrix already is a strict permutation.
fn is_valid(raw: &Array2<i64>) -> bool {
    raw.iter().all(|&v| v == 0 || v == 1)
        && raw.sum_axis(Axis(1)).iter().all(|&s| s == 1)
        && raw.sum_axis(Axis(0)).iter().all(|&s| s == 1)
}

/// Repairs an invalid raw matrix into a strict permutation.
///
/// Larger raw entries mean stronger preference, so minimizing
/// `max_entry - raw[i, j]` over a perfect matching picks the
/// permutation with maximum agreement (the same matching as minimizing
/// the negated matrix, shifted to keep costs non-negative).
fn repair(raw: &Array2<i64>) -> Array2<u8> {
    let n = raw.nrows();
    let max_entry = raw.iter().copied().max().unwrap_or(0);
    let costs: Vec<i64> = raw.iter().map(|&v| max_entry - v).collect();

    let matching = hungarian::minimize(&costs, n, n);
    let mut fixed = Array2::<u8>::zeros((n, n));
    for (row, col) in matching.into_iter().enumerate() {
        if let Some(col) = col {
            fixed[[row, col]] = 1;
        }
    }
    fixed
}
