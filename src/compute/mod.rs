//! Compute module - Simulation, metrics and search.

mod experiment;
mod harness;
mod kuramoto;
mod oscillator;
mod program;
mod rng;

pub mod metrics;
pub mod search;

pub use experiment::*;
pub use harness::*;
pub use kuramoto::*;
pub use oscillator::*;
pub use program::*;
pub use rng::*;
