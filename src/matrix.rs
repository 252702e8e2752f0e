//! Square-matrix helpers shared across the pipeline.
//!
//! Distance and flow matrices are dense `Array2<f64>` values;
//! assignment matrices are `Array2<u8>` with 0/1 entries. Validation
//! lives here so every component rejects malformed shapes the same way.

use crate::error::{QapError, QapResult};
use ndarray::{Array2, Axis};
use rand::Rng;

/// Validates that a matrix is square and returns its side length.
pub fn validate_square(m: &Array2<f64>) -> QapResult<usize> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(QapError::InvalidInput(format!(
            "distance matrix must be square, got {rows}x{cols}"
        )));
    }
    if rows == 0 {
        return Err(QapError::InvalidInput(
            "distance matrix must be non-empty".into(),
        ));
    }
    Ok(rows)
}

/// Validates that every flow matrix matches the distance matrix shape.
pub fn validate_flows(distance: &Array2<f64>, flows: &[Array2<f64>]) -> QapResult<()> {
    if flows.is_empty() {
        return Err(QapError::InvalidInput(
            "at least one flow matrix is required".into(),
        ));
    }
    for (step, flow) in flows.iter().enumerate() {
        if flow.dim() != distance.dim() {
            let (rows, cols) = flow.dim();
            let (n, _) = distance.dim();
            return Err(QapError::InvalidInput(format!(
                "flow matrix at step {step} is {rows}x{cols}, expected {n}x{n}"
            )));
        }
    }
    Ok(())
}

/// Symmetrizes a matrix by averaging it with its transpose.
pub fn symmetrize(m: &Array2<f64>) -> Array2<f64> {
    (m + &m.t()) / 2.0
}

/// Whether a matrix equals its transpose within `eps`.
pub fn is_symmetric(m: &Array2<f64>, eps: f64) -> bool {
    let (rows, cols) = m.dim();
    if rows != cols {
        return false;
    }
    for i in 0..rows {
        for j in (i + 1)..cols {
            if (m[[i, j]] - m[[j, i]]).abs() > eps {
                return false;
            }
        }
    }
    true
}

/// Generates a random symmetric integer matrix with a zero diagonal.
///
/// Entries are drawn uniformly from `[lo, hi]`, the diagonal is forced
/// to zero, and the result is symmetrized by integer floor averaging
/// with its transpose, so values stay exactly reproducible for a given
/// RNG state.
pub fn random_symmetric_int<R: Rng>(n: usize, lo: i64, hi: i64, rng: &mut R) -> Array2<f64> {
    let mut raw = Array2::<i64>::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            if i != j {
                raw[[i, j]] = rng.random_range(lo..=hi);
            }
        }
    }
    let mut out = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            out[[i, j]] = ((raw[[i, j]] + raw[[j, i]]) / 2) as f64;
        }
    }
    out
}

/// Whether a 0/1 matrix is a strict permutation matrix.
///
/// Every entry must be 0 or 1 and every row and column must sum to
/// exactly 1.
pub fn is_permutation(a: &Array2<u8>) -> bool {
    let (rows, cols) = a.dim();
    if rows != cols {
        return false;
    }
    if a.iter().any(|&v| v > 1) {
        return false;
    }
    let wide = a.mapv(|v| v as u32);
    wide.sum_axis(Axis(1)).iter().all(|&s| s == 1)
        && wide.sum_axis(Axis(0)).iter().all(|&s| s == 1)
}

/// Reallocation cost matrix derived from a reference assignment.
///
/// For each row of `reference`, finds the first assigned column and
/// fills the row with `|reference distance - distance|` for every other
/// column. Rows with no assignment stay zero.
///
/// This is an extension point for distance-anchored relocation
/// penalties; it is not consumed by the model builder.
pub fn reallocation_costs(reference: &Array2<u8>, distance: &Array2<f64>) -> Array2<f64> {
    let mut costs = Array2::<f64>::zeros(distance.dim());
    let (rows, cols) = reference.dim();
    for i in 0..rows {
        if let Some(ref_idx) = (0..cols).find(|&j| reference[[i, j]] == 1) {
            let ref_value = distance[[i, ref_idx]];
            for j in 0..cols {
                if j != ref_idx {
                    costs[[i, j]] = (ref_value - distance[[i, j]]).abs();
                }
            }
        }
    }
    costs
}
