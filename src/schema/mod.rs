//! Schema module - Configuration types for simulations, searches and experiments.

mod bank;
mod clock;
mod experiment;
mod network;
mod search;

pub use bank::*;
pub use clock::*;
pub use experiment::*;
pub use network::*;
pub use search::*;
