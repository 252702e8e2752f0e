//! Flow matrix generation and evolution.

use super::risk::{
    fire_probability, EVACUATION, FIREFIGHTERS, FIRST_RESPONDERS, HIGH_FIRE_THRESHOLD,
    LOW_FIRE_THRESHOLD, WATER,
};
use crate::error::{QapError, QapResult};
use crate::matrix;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generates a sequence of symmetric flow matrices.
///
/// The initial matrix is random (integers in `[1, 20]`, zero diagonal,
/// floor-averaged symmetrization). Every later matrix is derived from
/// the previous one by the fire-risk update and re-symmetrized.
///
/// # Examples
///
/// ```
/// use tdqap::flow::FlowGenerator;
///
/// let flows = FlowGenerator::new()
///     .with_seed(42)
///     .generate(3, 5)
///     .unwrap();
/// assert_eq!(flows.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct FlowGenerator {
    /// Base amount added to a cell when its update fires.
    update_amount: f64,
    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    seed: Option<u64>,
}

impl Default for FlowGenerator {
    fn default() -> Self {
        Self {
            update_amount: 3.0,
            seed: None,
        }
    }
}

impl FlowGenerator {
    /// Creates a generator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base update amount.
    pub fn with_update_amount(mut self, amount: f64) -> Self {
        self.update_amount = amount;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generates `time_steps` flow matrices of size `n`×`n`.
    ///
    /// Fails fast on a zero horizon or zero matrix size. Every returned
    /// matrix is symmetric, non-negative, and has a zero diagonal.
    pub fn generate(&self, time_steps: usize, n: usize) -> QapResult<Vec<Array2<f64>>> {
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

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut flows = Vec::with_capacity(time_steps);
        flows.push(matrix::random_symmetric_int(n, 1, 20, &mut rng));
        for t in 1..time_steps {
            let next = self.evolve(&flows[t - 1], t, &mut rng);
            flows.push(next);
        }
        Ok(flows)
    }

    /// Applies one fire-risk update to the previous flow matrix.
    ///
    /// Only nonzero cells may grow, under one of three regimes keyed on
    /// the fire probability against the high/low thresholds.
    fn evolve<R: Rng>(&self, prev: &Array2<f64>, timestep: usize, rng: &mut R) -> Array2<f64> {
        let p_fire = fire_probability(timestep, rng);
        let mut next = prev.clone();
        let (rows, cols) = prev.dim();

        for i in 0..rows {
            for j in 0..cols {
                if prev[[i, j]] == 0.0 {
                    continue;
                }
                if p_fire >= HIGH_FIRE_THRESHOLD {
                    // Critical resources only, at a 50% premium.
                    if i == FIREFIGHTERS && j == WATER && rng.random::<f64>() <= p_fire {
                        next[[i, j]] += self.update_amount * 1.5;
                    }
                } else if p_fire <= LOW_FIRE_THRESHOLD {
                    // Evacuation-related rows, more likely the lower the risk.
                    if (i == FIRST_RESPONDERS || i == EVACUATION)
                        && rng.random::<f64>() <= 1.0 - p_fire
                    {
                        next[[i, j]] += self.update_amount * 1.2;
                    }
                } else if rng.random::<f64>() <= p_fire {
                    next[[i, j]] += self.update_amount;
                }
            }
        }

        matrix::symmetrize(&next)
    }
}
