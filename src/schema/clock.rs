//! Clock configuration for the stepping harness.

use serde::{Deserialize, Serialize};

/// Fixed-step clock shared by every harness run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Time step in seconds.
    pub dt: f64,
    /// Number of ticks to run.
    pub steps: usize,
    /// Seed for the run's single RNG stream.
    #[serde(default)]
    pub seed: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 240.0,
            steps: 2880,
            seed: 1,
        }
    }
}

impl ClockConfig {
    /// Build a clock covering `duration` seconds at step `dt`.
    ///
    /// The step count is rounded to the nearest whole tick.
    pub fn for_duration(duration: f64, dt: f64, seed: u32) -> Self {
        let steps = if dt > 0.0 {
            (duration / dt).round().max(0.0) as usize
        } else {
            0
        };
        Self { dt, steps, seed }
    }

    /// Total simulated time covered by the clock.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.steps as f64 * self.dt
    }

    /// Validate clock parameters.
    pub fn validate(&self) -> Result<(), ClockError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ClockError::InvalidTimeStep(self.dt));
        }
        Ok(())
    }
}

/// Clock validation errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ClockError {
    #[error("Time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),
}
