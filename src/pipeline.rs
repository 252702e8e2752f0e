//! End-to-end pipeline: generate → build → solve → extract.
//!
//! Synchronous, single-threaded orchestration of the whole run. Each
//! stage completes before the next starts; the solver call is the only
//! step that may block for long, and it owns the wall-clock budget.

use crate::error::{QapError, QapResult};
use crate::flow::FlowGenerator;
use crate::matrix;
use crate::model::build_model;
use crate::repair::extract_assignments;
use crate::solver::{QapSolver, SolverConfig};
use ndarray::Array2;
use tracing::{debug, info};

/// Pipeline configuration.
///
/// # Examples
///
/// ```
/// use tdqap::pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default()
///     .with_time_steps(3)
///     .with_lambda_move(2.0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineConfig {
    /// Number of timesteps (the planning horizon).
    pub time_steps: usize,

    /// Relocation weight: cost per unit of distance moved between
    /// consecutive steps. 0 disables relocation terms.
    pub lambda_move: f64,

    /// Wall-clock budget handed to the solver, in milliseconds.
    pub time_limit_ms: u64,

    /// Random seed for flow generation and stochastic solvers.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            time_steps: 3,
            lambda_move: 0.0,
            time_limit_ms: 60_000,
            seed: None,
        }
    }
}

impl PipelineConfig {
    /// Sets the planning horizon.
    pub fn with_time_steps(mut self, time_steps: usize) -> Self {
        self.time_steps = time_steps;
        self
    }

    /// Sets the relocation weight.
    pub fn with_lambda_move(mut self, lambda_move: f64) -> Self {
        self.lambda_move = lambda_move;
        self
    }

    /// Sets the solver's wall-clock budget.
    pub fn with_time_limit_ms(mut self, time_limit_ms: u64) -> Self {
        self.time_limit_ms = time_limit_ms;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> QapResult<()> {
        if self.time_steps == 0 {
            return Err(QapError::InvalidInput(
                "time horizon must be positive".into(),
            ));
        }
        if self.lambda_move < 0.0 {
            return Err(QapError::InvalidInput(format!(
                "relocation weight must be non-negative, got {}",
                self.lambda_move
            )));
        }
        Ok(())
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Generated flow matrices, one per timestep.
    pub flows: Vec<Array2<f64>>,
    /// Repaired assignment matrices, one strict permutation per step.
    pub assignments: Vec<Array2<u8>>,
    /// Objective value of the final assignments under the built model.
    pub objective: f64,
}

/// Runs the full pipeline against a distance matrix.
///
/// Validates inputs, generates the flow sequence, builds the model,
/// solves it through the given [`QapSolver`], and extracts one strict
/// permutation matrix per timestep. An empty sample maps to
/// [`QapError::EmptySolution`]; solver faults propagate unchanged.
pub fn run<S: QapSolver>(
    distance: &Array2<f64>,
    config: &PipelineConfig,
    solver: &S,
) -> QapResult<PipelineOutcome> {
    config.validate()?;
    let n = matrix::validate_square(distance)?;

    info!(
        facilities = n,
        time_steps = config.time_steps,
        lambda_move = config.lambda_move,
        "generating flow matrices"
    );
    let mut generator = FlowGenerator::new();
    if let Some(seed) = config.seed {
        generator = generator.with_seed(seed);
    }
    let flows = generator.generate(config.time_steps, n)?;

    let model = build_model(distance, &flows, config.lambda_move)?;
    debug!(
        variables = model.variable_count(),
        constraints = model.constraint_count(),
        terms = model.term_count(),
        "built time-dependent QAP model"
    );

    let mut solver_config = SolverConfig::default().with_time_limit_ms(config.time_limit_ms);
    if let Some(seed) = config.seed {
        solver_config = solver_config.with_seed(seed);
    }
    let sample = solver.solve(&model, &solver_config)?;
    if sample.is_empty() {
        return Err(QapError::EmptySolution);
    }

    let assignments = extract_assignments(&sample, config.time_steps, n)?;
    let locations: Vec<Vec<usize>> = assignments.iter().map(location_vector).collect();
    let objective = model.evaluate_permutations(&locations);
    info!(objective, "extracted assignment sequence");

    Ok(PipelineOutcome {
        flows,
        assignments,
        objective,
    })
}

/// Facility-to-location vector of a permutation matrix.
fn location_vector(assignment: &Array2<u8>) -> Vec<usize> {
    (0..assignment.nrows())
        .map(|j| {
            (0..assignment.ncols())
                .find(|&m| assignment[[j, m]] == 1)
                .unwrap_or(0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{is_permutation, random_symmetric_int};
    use crate::model::QapModel;
    use crate::solver::{AnnealingSolver, GreedySolver, Sample};
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn distance(n: usize) -> Array2<f64> {
        random_symmetric_int(n, 1, 50, &mut StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_end_to_end_with_relocation() {
        let config = PipelineConfig::default()
            .with_time_steps(3)
            .with_lambda_move(2.0)
            .with_time_limit_ms(500)
            .with_seed(42);
        let outcome = run(&distance(4), &config, &GreedySolver::new()).unwrap();

        assert_eq!(outcome.assignments.len(), 3);
        assert_eq!(outcome.flows.len(), 3);
        for a in &outcome.assignments {
            assert!(is_permutation(a));
        }
        assert!(outcome.objective.is_finite());
        assert!(outcome.objective >= 0.0);
    }

    #[test]
    fn test_end_to_end_with_annealing() {
        let config = PipelineConfig::default()
            .with_time_steps(2)
            .with_lambda_move(1.0)
            .with_time_limit_ms(300)
            .with_seed(7);
        let solver = AnnealingSolver::new()
            .with_initial_temperature(10.0)
            .with_min_temperature(0.1)
            .with_iterations_per_temperature(20);
        let outcome = run(&distance(4), &config, &solver).unwrap();

        assert_eq!(outcome.assignments.len(), 2);
        for a in &outcome.assignments {
            assert!(is_permutation(a));
        }
    }

    #[test]
    fn test_single_step_horizon() {
        let config = PipelineConfig::default()
            .with_time_steps(1)
            .with_lambda_move(5.0)
            .with_seed(1);
        let outcome = run(&distance(4), &config, &GreedySolver::new()).unwrap();
        assert_eq!(outcome.assignments.len(), 1);
        assert!(is_permutation(&outcome.assignments[0]));
    }

    #[test]
    fn test_single_facility() {
        let config = PipelineConfig::default().with_time_steps(2).with_seed(1);
        let outcome = run(&array![[0.0]], &config, &GreedySolver::new()).unwrap();
        assert_eq!(outcome.assignments.len(), 2);
        for a in &outcome.assignments {
            assert_eq!(a[[0, 0]], 1);
        }
        assert_eq!(outcome.objective, 0.0);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let config = PipelineConfig::default();
        let rect = Array2::<f64>::zeros((3, 4));
        assert!(matches!(
            run(&rect, &config, &GreedySolver::new()),
            Err(QapError::InvalidInput(_))
        ));

        let bad = config.clone().with_time_steps(0);
        assert!(bad.validate().is_err());

        let negative = config.with_lambda_move(-1.0);
        assert!(negative.validate().is_err());
    }

    struct EmptySolver;
    impl QapSolver for EmptySolver {
        fn solve(&self, _model: &QapModel, _config: &SolverConfig) -> QapResult<Sample> {
            Ok(Sample::new())
        }
    }

    #[test]
    fn test_empty_sample_maps_to_empty_solution() {
        let config = PipelineConfig::default().with_seed(1);
        assert!(matches!(
            run(&distance(3), &config, &EmptySolver),
            Err(QapError::EmptySolution)
        ));
    }

    struct FailingSolver;
    impl QapSolver for FailingSolver {
        fn solve(&self, _model: &QapModel, _config: &SolverConfig) -> QapResult<Sample> {
            Err(QapError::Solver("connection refused".into()))
        }
    }

    #[test]
    fn test_solver_fault_propagates() {
        let config = PipelineConfig::default().with_seed(1);
        assert!(matches!(
            run(&distance(3), &config, &FailingSolver),
            Err(QapError::Solver(_))
        ));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = PipelineConfig::default()
            .with_time_steps(2)
            .with_lambda_move(1.0)
            .with_seed(5);
        let d = distance(4);
        let a = run(&d, &config, &GreedySolver::new()).unwrap();
        let b = run(&d, &config, &GreedySolver::new()).unwrap();
        assert_eq!(a.flows, b.flows);
        assert_eq!(a.assignments, b.assignments);
        assert_eq!(a.objective, b.objective);
    }
}
