//! Experiment configurations for the handshake and selectivity scenarios.
//!
//! Defaults reproduce the reference scenarios: a two-node handshake at
//! distance 2.0 with 0.05 Hz detuning over 12 s at 240 Hz, and an 8-channel
//! bank (3-10 Hz) driven for 12 s.

use serde::{Deserialize, Serialize};

use super::HandshakeGate;

/// Two-node handshake ablation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeConfig {
    /// Distance between the two nodes.
    pub distance: f64,
    /// Natural frequency of the first node (Hz).
    pub base_freq_hz: f64,
    /// Frequency offset of the second node (Hz).
    pub detuning_hz: f64,
    /// Base weight of the single coupling edge.
    pub edge_k: f64,
    /// Global coupling multiplier.
    pub k_global: f64,
    /// Attenuation length scale.
    pub dist_scale: f64,
    /// Phase-velocity noise.
    pub noise_std: f64,
    /// Gains applied on match and mismatch.
    #[serde(default)]
    pub gate: HandshakeGate,
    /// Simulated duration (s).
    pub duration: f64,
    /// Time step (s).
    pub dt: f64,
    /// Trailing window used for drift measurement (s).
    pub trailing_window: f64,
    /// Seeds in the ablation matrix.
    pub seeds: Vec<u32>,
    /// Separation required between conditions, in standard deviations.
    #[serde(default = "default_sigma")]
    pub sigma_threshold: f64,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            distance: 2.0,
            base_freq_hz: 1.0,
            detuning_hz: 0.05,
            edge_k: 1.0,
            k_global: 4.0,
            dist_scale: 2.0,
            noise_std: 0.02,
            gate: HandshakeGate::default(),
            duration: 12.0,
            dt: 1.0 / 240.0,
            trailing_window: 4.0,
            seeds: (1..=8).collect(),
            sigma_threshold: default_sigma(),
        }
    }
}

fn default_sigma() -> f64 {
    3.0
}

/// Driven oscillator bank selectivity sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectivityConfig {
    /// Channel natural frequencies (Hz).
    pub freqs_hz: Vec<f64>,
    /// Damping ratio shared by all channels.
    pub zeta: f64,
    /// Drive gain shared by all channels.
    pub gain: f64,
    /// Drive amplitude.
    pub amplitude: f64,
    /// Channel whose response is compared to the rest (Hz).
    pub target_hz: f64,
    /// Force noise on every channel.
    pub noise_std: f64,
    /// Simulated duration (s).
    pub duration: f64,
    /// Time step (s).
    pub dt: f64,
    /// Trailing window over which channel energy is averaged (s).
    pub energy_window: f64,
}

impl Default for SelectivityConfig {
    fn default() -> Self {
        Self {
            freqs_hz: (3..=10).map(f64::from).collect(),
            zeta: 0.02,
            gain: 1.0,
            amplitude: 1.0,
            target_hz: 7.0,
            noise_std: 0.01,
            duration: 12.0,
            dt: 1.0 / 1000.0,
            energy_window: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_defaults() {
        let config = HandshakeConfig::default();
        assert_eq!(config.seeds.len(), 8);
        assert_eq!(config.gate.mismatch_gain, 0.01);
        assert!(((config.duration / config.dt).round() - 2880.0).abs() < 1e-9);
    }

    #[test]
    fn test_roundtrip() {
        let config = SelectivityConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SelectivityConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.freqs_hz.len(), 8);
        assert_eq!(parsed.target_hz, 7.0);
    }
}
