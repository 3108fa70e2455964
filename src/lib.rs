//! Phaselock - Deterministic oscillator synchronization and search harness.
//!
//! This crate provides reproducible simulations of coupled phase
//! oscillators and driven resonator banks, together with small search
//! strategies for tuning their parameters. Every stochastic draw comes from
//! an explicitly passed [`Lcg`], so a given seed and configuration always
//! produce identical results.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Serializable configuration types (clock, network, bank,
//!   search settings, experiments)
//! - `compute`: Models, metrics, the stepping harness, search strategies
//!   and the packaged experiments
//!
//! # Example
//!
//! ```rust,no_run
//! use phaselock::{
//!     compute::{KuramotoNetwork, OscillatorNode, run_sim},
//!     schema::{ClockConfig, CouplingParams},
//! };
//!
//! let mut network = KuramotoNetwork::new(vec![
//!     OscillatorNode::new(0.0, 1.0, (0.0, 0.0)),
//!     OscillatorNode::new(1.0, 1.1, (1.0, 0.0)),
//! ]);
//! network.add_edge(0, 1, 1.0).unwrap();
//!
//! let params = CouplingParams::default();
//! let clock = ClockConfig::for_duration(10.0, 0.01, 7);
//! let r = run_sim(
//!     &clock,
//!     &mut network,
//!     |net, _, rng| net.step(clock.dt, &params, rng),
//!     |net| net.order_parameter(),
//! )
//! .unwrap();
//!
//! println!("Order parameter after 10 s: {r:.3}");
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::search::{Fitness, SearchConfig, SearchResult, hillclimb, random_search, run_es};
pub use compute::{KuramotoNetwork, Lcg, OscillatorBank, WaveProgram, run_sim};
pub use schema::{ClockConfig, CouplingParams, EsSettings, SearchSettings};
