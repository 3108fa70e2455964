//! Search strategies over caller-supplied candidate types.
//!
//! Every strategy takes a [`SearchConfig`] (built once, immutable for the
//! run), owns a single [`Lcg`](crate::compute::Lcg) seeded from its
//! settings, and returns a [`SearchResult`] whose trace has exactly
//! `iterations + 1` entries.

mod config;
mod fitness;
mod hillclimb;
mod legacy;
mod random;
mod space;
mod strategy;

pub use config::*;
pub use fitness::*;
pub use hillclimb::hillclimb;
pub use legacy::*;
pub use random::*;
pub use space::*;
pub use strategy::*;
