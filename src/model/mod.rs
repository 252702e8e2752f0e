//! Time-dependent QAP model.
//!
//! Defines the 3-dimensional binary decision space (facility ×
//! location × timestep), the two exactly-one constraint families, and
//! the quadratic objective as an immutable list of weighted pairwise
//! products.
//!
//! # Key Components
//!
//! - **Variables**: [`VarId`] — direct (facility, location, step) index
//! - **Constraints**: [`ExactlyOne`] / [`ConstraintKind`] — per-step
//!   facility rows and location columns, each with a fixed high penalty
//! - **Model**: [`QapModel`] — finalized variables, constraints, terms
//! - **Builder**: [`build_model`] — validation plus term construction
//!
//! # Design
//!
//! The builder accumulates immutable [`QuadTerm`] records and finalizes
//! them into a single [`QapModel`] value; nothing mutates a model after
//! construction. Solvers consume the model through
//! [`crate::solver::QapSolver`].

mod builder;
mod quadratic;
mod variables;

pub use builder::{build_model, interaction_term_count, relocation_term_count};
pub use quadratic::{ConstraintKind, ExactlyOne, QapModel, QuadTerm, ASSIGNMENT_PENALTY};
pub use variables::VarId;
