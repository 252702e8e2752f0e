//! Model construction.
//!
//! Builds the quadratic objective and the assignment constraints from
//! the distance matrix, the flow sequence, and the relocation weight.
//! Term construction is the O(T·N⁴) hot spot; with the `parallel`
//! feature, per-timestep chunks are built concurrently (term order is
//! irrelevant, addition commutes).

use super::quadratic::{ConstraintKind, ExactlyOne, QapModel, QuadTerm, ASSIGNMENT_PENALTY};
use super::variables::VarId;
use crate::error::{QapError, QapResult};
use crate::matrix;
use ndarray::Array2;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Number of per-timestep interaction terms: T·N²·(N−1)².
pub fn interaction_term_count(n: usize, time_steps: usize) -> usize {
    time_steps * n * n * n.saturating_sub(1) * n.saturating_sub(1)
}

/// Number of relocation terms: (T−1)·N²·(N−1) when enabled, else 0.
pub fn relocation_term_count(n: usize, time_steps: usize, lambda_move: f64) -> usize {
    if lambda_move > 0.0 && time_steps > 1 {
        (time_steps - 1) * n * n * n.saturating_sub(1)
    } else {
        0
    }
}

/// Builds a time-dependent QAP model.
///
/// Validates every input before construction: `distance` must be
/// square, every flow matrix must match its shape, and `lambda_move`
/// must be non-negative.
///
/// The objective is the per-timestep QAP cost (flow between two
/// facilities times distance between their locations, self-pairs
/// excluded) plus, when `lambda_move > 0` and more than one timestep
/// exists, a relocation cost proportional to the distance a facility
/// moves between consecutive steps.
pub fn build_model(
    distance: &Array2<f64>,
    flows: &[Array2<f64>],
    lambda_move: f64,
) -> QapResult<QapModel> {
    let n = matrix::validate_square(distance)?;
    matrix::validate_flows(distance, flows)?;
    if lambda_move < 0.0 {
        return Err(QapError::InvalidInput(format!(
            "relocation weight must be non-negative, got {lambda_move}"
        )));
    }
    let time_steps = flows.len();

    let mut constraints = Vec::with_capacity(2 * n * time_steps);
    for t in 0..time_steps {
        for j in 0..n {
            constraints.push(ExactlyOne {
                kind: ConstraintKind::Facility { facility: j, step: t },
                vars: (0..n).map(|m| VarId::new(j, m, t)).collect(),
                penalty: ASSIGNMENT_PENALTY,
            });
        }
        for m in 0..n {
            constraints.push(ExactlyOne {
                kind: ConstraintKind::Location { location: m, step: t },
                vars: (0..n).map(|j| VarId::new(j, m, t)).collect(),
                penalty: ASSIGNMENT_PENALTY,
            });
        }
    }

    let mut terms = interaction_terms(distance, flows);
    if lambda_move > 0.0 && time_steps > 1 {
        terms.reserve(relocation_term_count(n, time_steps, lambda_move));
        for t in 1..time_steps {
            for j in 0..n {
                for m in 0..n {
                    for l in 0..n {
                        if l == m {
                            continue;
                        }
                        terms.push(QuadTerm {
                            x: VarId::new(j, m, t - 1),
                            y: VarId::new(j, l, t),
                            coeff: lambda_move * distance[[m, l]],
                        });
                    }
                }
            }
        }
    }

    Ok(QapModel {
        facilities: n,
        time_steps,
        constraints,
        terms,
    })
}

/// Interaction terms for a single timestep.
///
/// Zero coefficients are kept; the term count identities would not
/// hold otherwise.
fn step_terms(distance: &Array2<f64>, flow: &Array2<f64>, step: usize) -> Vec<QuadTerm> {
    let n = distance.nrows();
    let mut terms = Vec::with_capacity(n * n * n.saturating_sub(1) * n.saturating_sub(1));
    for j in 0..n {
        for k in 0..n {
            if k == j {
                continue;
            }
            for m in 0..n {
                for l in 0..n {
                    if l == m {
                        continue;
                    }
                    terms.push(QuadTerm {
                        x: VarId::new(j, m, step),
                        y: VarId::new(k, l, step),
                        coeff: flow[[j, k]] * distance[[m, l]],
                    });
                }
            }
        }
    }
    terms
}

#[cfg(feature = "parallel")]
fn interaction_terms(distance: &Array2<f64>, flows: &[Array2<f64>]) -> Vec<QuadTerm> {
    flows
        .par_iter()
        .enumerate()
        .flat_map_iter(|(t, f)| step_terms(distance, f, t))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn interaction_terms(distance: &Array2<f64>, flows: &[Array2<f64>]) -> Vec<QuadTerm> {
    flows
        .iter()
        .enumerate()
        .flat_map(|(t, f)| step_terms(distance, f, t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::random_symmetric_int;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixture(n: usize, t: usize) -> (Array2<f64>, Vec<Array2<f64>>) {
        let mut rng = StdRng::seed_from_u64(42);
        let d = random_symmetric_int(n, 1, 50, &mut rng);
        let flows = (0..t)
            .map(|_| random_symmetric_int(n, 1, 20, &mut rng))
            .collect();
        (d, flows)
    }

    #[test]
    fn test_term_count_identity() {
        let (d, flows) = fixture(4, 3);
        let model = build_model(&d, &flows, 2.0).unwrap();
        assert_eq!(
            model.term_count(),
            interaction_term_count(4, 3) + relocation_term_count(4, 3, 2.0)
        );
        // T·N²·(N−1)² + (T−1)·N²·(N−1) for N=4, T=3.
        assert_eq!(model.term_count(), 3 * 16 * 9 + 2 * 16 * 3);
    }

    #[test]
    fn test_no_relocation_terms_without_weight() {
        let (d, flows) = fixture(4, 3);
        let model = build_model(&d, &flows, 0.0).unwrap();
        assert_eq!(model.term_count(), interaction_term_count(4, 3));
    }

    #[test]
    fn test_no_relocation_terms_for_single_step() {
        let (d, flows) = fixture(4, 1);
        let model = build_model(&d, &flows, 5.0).unwrap();
        assert_eq!(model.term_count(), interaction_term_count(4, 1));
    }

    #[test]
    fn test_constraint_families() {
        let (d, flows) = fixture(3, 2);
        let model = build_model(&d, &flows, 0.0).unwrap();
        assert_eq!(model.constraint_count(), 2 * 3 * 2);

        let facilities = model
            .constraints
            .iter()
            .filter(|c| matches!(c.kind, ConstraintKind::Facility { .. }))
            .count();
        assert_eq!(facilities, 6);
        assert!(model.constraints.iter().all(|c| c.vars.len() == 3));
        assert!(model
            .constraints
            .iter()
            .all(|c| c.penalty == ASSIGNMENT_PENALTY));
    }

    #[test]
    fn test_coefficients() {
        let d = array![[0.0, 3.0], [3.0, 0.0]];
        let f = vec![array![[0.0, 5.0], [5.0, 0.0]]];
        let model = build_model(&d, &f, 0.0).unwrap();

        // N=2, T=1: the four (j≠k, m≠l) orientations, all with F·D = 15.
        assert_eq!(model.term_count(), 4);
        assert!(model.terms.iter().all(|t| t.coeff == 15.0));
    }

    #[test]
    fn test_trivial_single_facility() {
        let d = array![[0.0]];
        let f = vec![array![[0.0]]];
        let model = build_model(&d, &f, 1.0).unwrap();
        assert_eq!(model.term_count(), 0);
        assert_eq!(model.variable_count(), 1);
        assert_eq!(model.constraint_count(), 2);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let (d, flows) = fixture(3, 2);

        let rect = Array2::<f64>::zeros((3, 4));
        assert!(build_model(&rect, &flows, 0.0).is_err());

        let mismatched = vec![Array2::<f64>::zeros((2, 2))];
        assert!(build_model(&d, &mismatched, 0.0).is_err());

        assert!(build_model(&d, &[], 0.0).is_err());
        assert!(build_model(&d, &flows, -1.0).is_err());
    }
}
