//! Time-dependent Quadratic Assignment Problem (QAP) core.
//!
//! Assigns a fixed set of facilities to locations at each of T discrete
//! time steps, minimizing flow×distance interaction costs plus a
//! penalty for relocating a facility between consecutive steps. The
//! crate owns model building and solution recovery; the combinatorial
//! engine itself stays behind a trait.
//!
//! - **Flow evolution** ([`flow`]): sequence of symmetric flow matrices,
//!   each derived from its predecessor through a probabilistic
//!   fire-risk update.
//! - **Model building** ([`model`]): N²·T binary variables, two
//!   exactly-one constraint families per timestep, and the quadratic
//!   objective with optional relocation terms.
//! - **Solving** ([`solver`]): the pluggable [`solver::QapSolver`]
//!   boundary plus two in-process heuristics (greedy, simulated
//!   annealing).
//! - **Repair & extraction** ([`repair`]): turns any raw sample into
//!   strict permutation matrices, correcting row/column violations via
//!   optimal bipartite matching.
//! - **Pipeline** ([`pipeline`]): synchronous generate → build → solve
//!   → extract orchestration.
//!
//! # Architecture
//!
//! The solver is the single external dependency the core is built
//! around: anything that accepts a [`model::QapModel`] and returns one
//! [`solver::Sample`] can be plugged in without touching model building
//! or repair. Extraction guarantees structurally valid output even for
//! constraint-violating samples, trading penalty-optimality for
//! validity.

pub mod error;
pub mod flow;
pub mod matrix;
pub mod model;
pub mod pipeline;
pub mod repair;
pub mod solver;
