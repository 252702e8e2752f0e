//! Flow evolution over the planning horizon.
//!
//! Produces the sequence of symmetric flow matrices consumed by the
//! model builder. The first matrix is random; every later matrix is
//! derived from its predecessor through a probabilistic fire-risk
//! update.
//!
//! # Key Components
//!
//! - **Risk model** ([`fire_probability`]): per-timestep fire
//!   probability from joint drought probabilities, with jitter.
//! - **Generator** ([`FlowGenerator`]): seedable evolution loop with
//!   the three-regime cell update.

mod generator;
mod risk;

pub use generator::FlowGenerator;
pub use risk::{
    fire_probability, EVACUATION, FIREFIGHTERS, FIRST_RESPONDERS, HIGH_FIRE_THRESHOLD,
    LOW_FIRE_THRESHOLD, WATER,
};
