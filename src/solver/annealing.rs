//! Simulated-annealing solver over permutation sequences.

use super::{QapSolver, Sample, SolverConfig};
use crate::error::QapResult;
use crate::model::QapModel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Simulated annealing restricted to feasible assignments.
///
/// The search state is one permutation per timestep, so the exactly-one
/// constraints hold by construction and only the objective is
/// annealed. Neighborhood: swap the locations of two facilities within
/// a random timestep. Geometric cooling; stops at the minimum
/// temperature or when the wall-clock budget runs out.
///
/// # Examples
///
/// ```no_run
/// use tdqap::solver::{AnnealingSolver, QapSolver, SolverConfig};
/// # let model = tdqap::model::build_model(
/// #     &ndarray::Array2::zeros((2, 2)),
/// #     &[ndarray::Array2::zeros((2, 2))],
/// #     0.0,
/// # ).unwrap();
///
/// let solver = AnnealingSolver::new()
///     .with_initial_temperature(50.0)
///     .with_cooling_factor(0.98);
/// let config = SolverConfig::default().with_time_limit_ms(200).with_seed(42);
/// let sample = solver.solve(&model, &config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct AnnealingSolver {
    /// Initial temperature. Higher values allow more exploration.
    initial_temperature: f64,
    /// Stop once temperature drops below this.
    min_temperature: f64,
    /// Geometric cooling factor in (0, 1).
    cooling_factor: f64,
    /// Moves attempted at each temperature level.
    iterations_per_temperature: usize,
}

impl Default for AnnealingSolver {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            min_temperature: 1e-3,
            cooling_factor: 0.95,
            iterations_per_temperature: 100,
        }
    }
}

impl AnnealingSolver {
    /// Creates a solver with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial temperature.
    pub fn with_initial_temperature(mut self, temperature: f64) -> Self {
        self.initial_temperature = temperature;
        self
    }

    /// Sets the minimum temperature.
    pub fn with_min_temperature(mut self, temperature: f64) -> Self {
        self.min_temperature = temperature;
        self
    }

    /// Sets the geometric cooling factor.
    pub fn with_cooling_factor(mut self, factor: f64) -> Self {
        self.cooling_factor = factor;
        self
    }

    /// Sets the number of moves per temperature level.
    pub fn with_iterations_per_temperature(mut self, iterations: usize) -> Self {
        self.iterations_per_temperature = iterations;
        self
    }
}

impl QapSolver for AnnealingSolver {
    fn solve(&self, model: &QapModel, config: &SolverConfig) -> QapResult<Sample> {
        let n = model.facilities;
        let time_steps = model.time_steps;

        // Identity assignment at every step.
        let mut current: Vec<Vec<usize>> = (0..time_steps).map(|_| (0..n).collect()).collect();

        // A single facility (or empty horizon) leaves nothing to swap.
        if n < 2 || time_steps == 0 {
            return Ok(Sample::from_permutations(&current));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut current_cost = model.evaluate_permutations(&current);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let deadline = Instant::now() + Duration::from_millis(config.time_limit_ms);
        let mut temperature = self.initial_temperature;

        'cooling: while temperature > self.min_temperature {
            for _ in 0..self.iterations_per_temperature {
                if Instant::now() >= deadline {
                    break 'cooling;
                }

                let step = rng.random_range(0..time_steps);
                let a = rng.random_range(0..n);
                let mut b = rng.random_range(0..n);
                while b == a {
                    b = rng.random_range(0..n);
                }

                current[step].swap(a, b);
                let cost = model.evaluate_permutations(&current);
                let delta = cost - current_cost;

                if delta <= 0.0 || rng.random::<f64>() < (-delta / temperature).exp() {
                    current_cost = cost;
                    if cost < best_cost {
                        best_cost = cost;
                        best = current.clone();
                    }
                } else {
                    current[step].swap(a, b);
                }
            }
            temperature *= self.cooling_factor;
        }

        Ok(Sample::from_permutations(&best))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::random_symmetric_int;
    use crate::model::build_model;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn model(n: usize, t: usize, lambda: f64) -> QapModel {
        let mut rng = StdRng::seed_from_u64(7);
        let d = random_symmetric_int(n, 1, 50, &mut rng);
        let flows: Vec<_> = (0..t)
            .map(|_| random_symmetric_int(n, 1, 20, &mut rng))
            .collect();
        build_model(&d, &flows, lambda).unwrap()
    }

    fn fast() -> AnnealingSolver {
        AnnealingSolver::new()
            .with_initial_temperature(10.0)
            .with_min_temperature(0.1)
            .with_iterations_per_temperature(20)
    }

    #[test]
    fn test_produces_feasible_sample() {
        let model = model(5, 3, 2.0);
        let config = SolverConfig::default().with_time_limit_ms(500).with_seed(42);
        let sample = fast().solve(&model, &config).unwrap();

        assert_eq!(model.violations(&sample), 0);
        assert!(model.evaluate(&sample).is_finite());
    }

    #[test]
    fn test_never_worse_than_identity() {
        let model = model(6, 2, 1.0);
        let identity: Vec<Vec<usize>> = (0..2).map(|_| (0..6).collect()).collect();
        let identity_cost = model.evaluate_permutations(&identity);

        let config = SolverConfig::default().with_time_limit_ms(500).with_seed(9);
        let sample = fast().solve(&model, &config).unwrap();
        assert!(model.evaluate(&sample) <= identity_cost);
    }

    #[test]
    fn test_seed_reproducibility() {
        let model = model(4, 2, 1.0);
        let config = SolverConfig::default().with_time_limit_ms(500).with_seed(3);
        let solver = fast();
        let a = solver.solve(&model, &config).unwrap();
        let b = solver.solve(&model, &config).unwrap();
        assert_eq!(model.evaluate(&a), model.evaluate(&b));
    }

    #[test]
    fn test_single_facility() {
        let model = model(1, 3, 1.0);
        let sample = fast()
            .solve(&model, &SolverConfig::default())
            .unwrap();
        assert_eq!(model.violations(&sample), 0);
        assert_eq!(model.evaluate(&sample), 0.0);
    }
}
