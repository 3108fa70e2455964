//! Bank of driven damped harmonic oscillators.
//!
//! Each channel integrates
//!
//! ```text
//! x'' + 2ζω₀x' + ω₀²x = gain·u(t) + σ·ξ
//! ```
//!
//! with semi-implicit (symplectic) Euler: velocity first, then displacement
//! from the updated velocity.

use std::f64::consts::TAU;

use crate::schema::{BankConfig, BankError};

use super::rng::Lcg;

/// A single damped oscillator channel.
#[derive(Debug, Clone, PartialEq)]
pub struct DrivenOscillator {
    /// Natural frequency (Hz).
    pub freq_hz: f64,
    /// Damping ratio.
    pub zeta: f64,
    /// Drive gain.
    pub gain: f64,
    /// Displacement.
    pub x: f64,
    /// Velocity.
    pub v: f64,
}

impl DrivenOscillator {
    pub fn new(freq_hz: f64, zeta: f64, gain: f64) -> Self {
        Self {
            freq_hz,
            zeta,
            gain,
            x: 0.0,
            v: 0.0,
        }
    }

    /// Natural angular frequency ω₀ (rad/s).
    #[inline]
    pub fn omega(&self) -> f64 {
        TAU * self.freq_hz
    }

    /// Advance one step under drive `u` plus an already-scaled noise force.
    #[inline]
    pub fn step(&mut self, dt: f64, u: f64, noise_force: f64) {
        let w0 = self.omega();
        let accel = self.gain * u + noise_force - 2.0 * self.zeta * w0 * self.v - w0 * w0 * self.x;
        self.v += dt * accel;
        self.x += dt * self.v;
    }

    /// Stored energy `x² + v²/ω₀²` (amplitude-squared units).
    #[inline]
    pub fn energy(&self) -> f64 {
        let w0 = self.omega();
        self.x * self.x + (self.v * self.v) / (w0 * w0)
    }

    /// Return to rest.
    pub fn reset(&mut self) {
        self.x = 0.0;
        self.v = 0.0;
    }
}

/// Ordered bank of oscillators driven in lock-step.
#[derive(Debug, Clone, Default)]
pub struct OscillatorBank {
    oscillators: Vec<DrivenOscillator>,
}

impl OscillatorBank {
    /// Build a bank from configuration.
    pub fn new(config: &BankConfig) -> Result<Self, BankError> {
        config.validate()?;
        let mut oscillators: Vec<DrivenOscillator> = config
            .freqs_hz
            .iter()
            .map(|&f| DrivenOscillator::new(f, config.zeta, config.gain))
            .collect();
        for o in &config.overrides {
            let osc = &mut oscillators[o.index];
            if let Some(zeta) = o.zeta {
                osc.zeta = zeta;
            }
            if let Some(gain) = o.gain {
                osc.gain = gain;
            }
        }
        Ok(Self { oscillators })
    }

    /// Advance every channel by one `dt` under the shared drive scalar.
    ///
    /// One Gaussian draw per channel, in channel order, when `noise_std > 0`.
    pub fn step(&mut self, dt: f64, drive: f64, noise_std: f64, rng: &mut Lcg) {
        for osc in &mut self.oscillators {
            let noise = if noise_std > 0.0 {
                noise_std * rng.gaussian()
            } else {
                0.0
            };
            osc.step(dt, drive, noise);
        }
    }

    /// Energy of every channel, in bank order.
    pub fn energies(&self) -> Vec<f64> {
        self.oscillators.iter().map(DrivenOscillator::energy).collect()
    }

    /// Index of the channel whose natural frequency is closest to `hz`.
    pub fn nearest_channel(&self, hz: f64) -> Option<usize> {
        self.oscillators
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (a.freq_hz - hz)
                    .abs()
                    .total_cmp(&(b.freq_hz - hz).abs())
            })
            .map(|(i, _)| i)
    }

    pub fn oscillators(&self) -> &[DrivenOscillator] {
        &self.oscillators
    }

    pub fn oscillators_mut(&mut self) -> &mut [DrivenOscillator] {
        &mut self.oscillators
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.oscillators.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.oscillators.is_empty()
    }

    /// Return every channel to rest.
    pub fn reset(&mut self) {
        self.oscillators.iter_mut().for_each(DrivenOscillator::reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ChannelOverride;

    #[test]
    fn test_bank_from_config() {
        let config = BankConfig {
            overrides: vec![ChannelOverride {
                index: 2,
                zeta: Some(0.1),
                gain: Some(3.0),
            }],
            ..Default::default()
        };
        let bank = OscillatorBank::new(&config).unwrap();
        assert_eq!(bank.len(), 8);
        assert_eq!(bank.oscillators()[2].zeta, 0.1);
        assert_eq!(bank.oscillators()[2].gain, 3.0);
        assert_eq!(bank.oscillators()[3].zeta, 0.02);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = BankConfig {
            freqs_hz: vec![-1.0],
            ..Default::default()
        };
        assert!(OscillatorBank::new(&config).is_err());
    }

    #[test]
    fn test_free_decay_loses_energy() {
        let mut osc = DrivenOscillator::new(5.0, 0.05, 1.0);
        osc.x = 1.0;
        let e0 = osc.energy();
        for _ in 0..2000 {
            osc.step(1e-3, 0.0, 0.0);
        }
        assert!(osc.energy() < 0.2 * e0);
        assert!(osc.energy() > 0.0);
    }

    #[test]
    fn test_undamped_energy_bounded() {
        let mut osc = DrivenOscillator::new(2.0, 0.0, 1.0);
        osc.x = 1.0;
        for _ in 0..10_000 {
            osc.step(1e-3, 0.0, 0.0);
        }
        let e = osc.energy();
        assert!(e > 0.9 && e < 1.1, "energy {e}");
    }

    #[test]
    fn test_resonant_channel_dominates() {
        let mut bank = OscillatorBank::new(&BankConfig {
            freqs_hz: vec![3.0, 6.0, 12.0],
            ..Default::default()
        })
        .unwrap();
        let mut rng = Lcg::new(4);
        let dt = 1e-3;
        for i in 0..8000 {
            let t = i as f64 * dt;
            bank.step(dt, (TAU * 6.0 * t).sin(), 0.0, &mut rng);
        }
        let e = bank.energies();
        assert!(e[1] > 10.0 * e[0]);
        assert!(e[1] > 10.0 * e[2]);
    }

    #[test]
    fn test_nearest_channel() {
        let bank = OscillatorBank::new(&BankConfig::default()).unwrap();
        assert_eq!(bank.nearest_channel(7.0), Some(4));
        assert_eq!(bank.nearest_channel(100.0), Some(7));
        assert_eq!(OscillatorBank::default().nearest_channel(1.0), None);
    }

    #[test]
    fn test_reset() {
        let mut bank = OscillatorBank::new(&BankConfig::default()).unwrap();
        let mut rng = Lcg::new(1);
        bank.step(0.01, 1.0, 0.1, &mut rng);
        assert!(bank.energies().iter().any(|&e| e > 0.0));
        bank.reset();
        assert!(bank.energies().iter().all(|&e| e == 0.0));
    }
}
