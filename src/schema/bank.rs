//! Configuration for banks of driven damped oscillators.

use serde::{Deserialize, Serialize};

/// Oscillator bank description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankConfig {
    /// One channel per natural frequency (Hz).
    pub freqs_hz: Vec<f64>,
    /// Shared damping ratio.
    #[serde(default = "default_zeta")]
    pub zeta: f64,
    /// Shared drive gain.
    #[serde(default = "default_gain")]
    pub gain: f64,
    /// Per-channel exceptions to the shared zeta/gain.
    #[serde(default)]
    pub overrides: Vec<ChannelOverride>,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            freqs_hz: (3..=10).map(f64::from).collect(),
            zeta: default_zeta(),
            gain: default_gain(),
            overrides: Vec::new(),
        }
    }
}

fn default_zeta() -> f64 {
    0.02
}
fn default_gain() -> f64 {
    1.0
}

/// Overrides for a single channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelOverride {
    pub index: usize,
    #[serde(default)]
    pub zeta: Option<f64>,
    #[serde(default)]
    pub gain: Option<f64>,
}

impl BankConfig {
    /// Validate bank parameters.
    pub fn validate(&self) -> Result<(), BankError> {
        for (index, &freq_hz) in self.freqs_hz.iter().enumerate() {
            if !(freq_hz.is_finite() && freq_hz > 0.0) {
                return Err(BankError::InvalidFrequency { index, freq_hz });
            }
        }
        let zetas = std::iter::once(self.zeta)
            .chain(self.overrides.iter().filter_map(|o| o.zeta));
        for zeta in zetas {
            if !(zeta.is_finite() && zeta >= 0.0) {
                return Err(BankError::InvalidDamping(zeta));
            }
        }
        for o in &self.overrides {
            if o.index >= self.freqs_hz.len() {
                return Err(BankError::OverrideOutOfRange {
                    index: o.index,
                    len: self.freqs_hz.len(),
                });
            }
        }
        Ok(())
    }
}

/// Bank validation errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BankError {
    #[error("Channel {index} has invalid frequency {freq_hz} Hz")]
    InvalidFrequency { index: usize, freq_hz: f64 },
    #[error("Damping ratio must be non-negative, got {0}")]
    InvalidDamping(f64),
    #[error("Override targets channel {index} but bank has {len} channels")]
    OverrideOutOfRange { index: usize, len: usize },
}
