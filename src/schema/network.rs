//! Configuration types for phase-coupled oscillator networks.

use serde::{Deserialize, Serialize};

/// Initial state of a single phase oscillator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Initial phase in radians.
    #[serde(default)]
    pub theta: f64,
    /// Natural angular frequency in rad/s.
    pub omega: f64,
    /// Position in the plane, used for distance attenuation.
    #[serde(default)]
    pub position: (f64, f64),
}

/// A weighted coupling between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeConfig {
    pub i: usize,
    pub j: usize,
    /// Coupling weight.
    pub k: f64,
}

/// Complete network description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub nodes: Vec<NodeConfig>,
    /// Base coupling edges.
    #[serde(default)]
    pub edges: Vec<EdgeConfig>,
    /// Auxiliary long-range link pairs, only active when enabled per step.
    #[serde(default)]
    pub links: Vec<(usize, usize)>,
}

/// Per-step coupling parameters.
///
/// Gates scale individual base edges for the duration of one step without
/// touching the stored weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouplingParams {
    /// Global coupling multiplier.
    pub k_global: f64,
    /// Length scale of the distance attenuation. Non-positive disables it.
    #[serde(default = "default_dist_scale")]
    pub dist_scale: f64,
    /// Standard deviation of the additive phase-velocity noise.
    #[serde(default)]
    pub noise_std: f64,
    /// Whether link edges contribute this step.
    #[serde(default)]
    pub link_enabled: bool,
    /// Coupling strength used for every link edge.
    #[serde(default)]
    pub link_strength: f64,
    /// Per-edge gain multipliers as (edge index, gain).
    #[serde(default)]
    pub gates: Vec<(usize, f64)>,
}

impl Default for CouplingParams {
    fn default() -> Self {
        Self {
            k_global: 1.0,
            dist_scale: default_dist_scale(),
            noise_std: 0.0,
            link_enabled: false,
            link_strength: 0.0,
            gates: Vec::new(),
        }
    }
}

fn default_dist_scale() -> f64 {
    1.0
}

impl CouplingParams {
    /// Add a gain multiplier for one base edge.
    pub fn with_gate(mut self, edge: usize, gain: f64) -> Self {
        self.gates.push((edge, gain));
        self
    }

    /// Enable the link channel at the given strength.
    pub fn with_links(mut self, strength: f64) -> Self {
        self.link_enabled = true;
        self.link_strength = strength;
        self
    }

    /// Combined gain for an edge. Multiple gates on the same edge multiply.
    pub fn gain_for(&self, edge: usize) -> f64 {
        self.gates
            .iter()
            .filter(|(idx, _)| *idx == edge)
            .map(|(_, gain)| gain)
            .product()
    }
}

/// Orientation flag carried by each side of a handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chirality {
    Left,
    Right,
}

/// Gain applied to a handshake edge depending on whether both ends agree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HandshakeGate {
    #[serde(default = "default_match_gain")]
    pub match_gain: f64,
    #[serde(default = "default_mismatch_gain")]
    pub mismatch_gain: f64,
}

impl Default for HandshakeGate {
    fn default() -> Self {
        Self {
            match_gain: default_match_gain(),
            mismatch_gain: default_mismatch_gain(),
        }
    }
}

fn default_match_gain() -> f64 {
    1.0
}
fn default_mismatch_gain() -> f64 {
    0.01
}

impl HandshakeGate {
    /// Gain for a pair of chiralities.
    #[inline]
    pub fn gain(&self, a: Chirality, b: Chirality) -> f64 {
        if a == b {
            self.match_gain
        } else {
            self.mismatch_gain
        }
    }
}
