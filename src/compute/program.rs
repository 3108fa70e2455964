//! Symbolic wave programs driving the oscillator bank.
//!
//! A program is an ordered list of tokens. Frequency, amplitude and phase
//! tokens update the running parameters; each window token emits a sinusoid
//! with the parameters in effect at that point, active on `[t0, t1)`.
//!
//! Text form, whitespace separated:
//!
//! ```text
//! ω=7 A=1 φ=0 τ=[0,12)
//! ```
//!
//! ASCII aliases are accepted: `w`/`freq`, `a`/`amp`, `phi`, `tau`.

use std::f64::consts::TAU;
use std::fmt;
use std::num::ParseFloatError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One program token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WaveToken {
    /// Frequency (Hz).
    Frequency { hz: f64 },
    /// Amplitude.
    Amplitude { a: f64 },
    /// Phase offset (radians).
    Phase { phi: f64 },
    /// Active window `[t0, t1)`.
    Window { t0: f64, t1: f64 },
}

/// Instantaneous drive produced by a program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveSample {
    /// Summed drive scalar.
    pub u: f64,
    /// Number of windows containing `t`.
    pub active: usize,
}

/// Immutable, validated token sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveProgram {
    tokens: Vec<WaveToken>,
}

impl WaveProgram {
    /// Build a program, rejecting inverted or non-finite windows.
    pub fn new(tokens: Vec<WaveToken>) -> Result<Self, ProgramError> {
        for token in &tokens {
            if let WaveToken::Window { t0, t1 } = *token
                && (!t0.is_finite() || t1.is_nan() || t1 < t0)
            {
                return Err(ProgramError::InvalidWindow { t0, t1 });
            }
        }
        Ok(Self { tokens })
    }

    /// Single sinusoid active on `[t0, t1)`.
    pub fn tone(
        freq_hz: f64,
        amplitude: f64,
        phase: f64,
        t0: f64,
        t1: f64,
    ) -> Result<Self, ProgramError> {
        Self::new(vec![
            WaveToken::Frequency { hz: freq_hz },
            WaveToken::Amplitude { a: amplitude },
            WaveToken::Phase { phi: phase },
            WaveToken::Window { t0, t1 },
        ])
    }

    pub fn tokens(&self) -> &[WaveToken] {
        &self.tokens
    }

    /// Evaluate the drive at time `t`.
    ///
    /// Running parameters start at 0 Hz, amplitude 1, phase 0. Overlapping
    /// windows are summed; outside every window the drive is 0.
    pub fn apply_at_time(&self, t: f64) -> DriveSample {
        let mut freq = 0.0;
        let mut amp = 1.0;
        let mut phase = 0.0;
        let mut u = 0.0;
        let mut active = 0;

        for token in &self.tokens {
            match *token {
                WaveToken::Frequency { hz } => freq = hz,
                WaveToken::Amplitude { a } => amp = a,
                WaveToken::Phase { phi } => phase = phi,
                WaveToken::Window { t0, t1 } => {
                    if t >= t0 && t < t1 {
                        u += amp * (TAU * freq * t + phase).sin();
                        active += 1;
                    }
                }
            }
        }

        DriveSample { u, active }
    }
}

impl<'de> Deserialize<'de> for WaveProgram {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            tokens: Vec<WaveToken>,
        }
        let raw = Raw::deserialize(deserializer)?;
        WaveProgram::new(raw.tokens).map_err(serde::de::Error::custom)
    }
}

impl FromStr for WaveProgram {
    type Err = ProgramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = s
            .split_whitespace()
            .map(parse_token)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(tokens)
    }
}

impl fmt::Display for WaveProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match token {
                WaveToken::Frequency { hz } => write!(f, "ω={hz}")?,
                WaveToken::Amplitude { a } => write!(f, "A={a}")?,
                WaveToken::Phase { phi } => write!(f, "φ={phi}")?,
                WaveToken::Window { t0, t1 } => write!(f, "τ=[{t0},{t1})")?,
            }
        }
        Ok(())
    }
}

fn parse_number(token: &str, text: &str) -> Result<f64, ProgramError> {
    text.trim()
        .parse::<f64>()
        .map_err(|source| ProgramError::InvalidNumber {
            token: token.to_string(),
            source,
        })
}

fn parse_token(token: &str) -> Result<WaveToken, ProgramError> {
    let (key, value) = token
        .split_once('=')
        .ok_or_else(|| ProgramError::UnknownToken(token.to_string()))?;

    match key {
        "ω" | "w" | "freq" => Ok(WaveToken::Frequency {
            hz: parse_number(token, value)?,
        }),
        "A" | "a" | "amp" => Ok(WaveToken::Amplitude {
            a: parse_number(token, value)?,
        }),
        "φ" | "phi" => Ok(WaveToken::Phase {
            phi: parse_number(token, value)?,
        }),
        "τ" | "tau" => {
            let inner = value
                .strip_prefix('[')
                .and_then(|v| v.strip_suffix(')'))
                .ok_or_else(|| ProgramError::UnknownToken(token.to_string()))?;
            let (t0, t1) = inner
                .split_once(',')
                .ok_or_else(|| ProgramError::UnknownToken(token.to_string()))?;
            Ok(WaveToken::Window {
                t0: parse_number(token, t0)?,
                t1: parse_number(token, t1)?,
            })
        }
        _ => Err(ProgramError::UnknownToken(token.to_string())),
    }
}

/// Program construction and parse errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ProgramError {
    #[error("Unrecognized token '{0}'")]
    UnknownToken(String),
    #[error("Invalid number in token '{token}': {source}")]
    InvalidNumber {
        token: String,
        source: ParseFloatError,
    },
    #[error("Invalid window [{t0}, {t1})")]
    InvalidWindow { t0: f64, t1: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_window_is_zero() {
        let program = WaveProgram::tone(7.0, 1.0, 0.0, 1.0, 2.0).unwrap();
        assert_eq!(program.apply_at_time(0.5), DriveSample { u: 0.0, active: 0 });
        assert_eq!(program.apply_at_time(2.0).active, 0);
        assert_eq!(program.apply_at_time(1.0).active, 1);
    }

    #[test]
    fn test_tone_value() {
        let program = WaveProgram::tone(2.0, 3.0, 0.5, 0.0, 10.0).unwrap();
        let t = 0.37;
        let expected = 3.0 * (TAU * 2.0 * t + 0.5).sin();
        assert!((program.apply_at_time(t).u - expected).abs() < 1e-12);
    }

    #[test]
    fn test_overlapping_windows_sum() {
        let program = WaveProgram::new(vec![
            WaveToken::Frequency { hz: 1.0 },
            WaveToken::Window { t0: 0.0, t1: 5.0 },
            WaveToken::Amplitude { a: 2.0 },
            WaveToken::Frequency { hz: 3.0 },
            WaveToken::Window { t0: 1.0, t1: 4.0 },
        ])
        .unwrap();
        let t = 1.3;
        let expected = (TAU * t).sin() + 2.0 * (TAU * 3.0 * t).sin();
        let sample = program.apply_at_time(t);
        assert_eq!(sample.active, 2);
        assert!((sample.u - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_inverted_window() {
        let err = WaveProgram::new(vec![WaveToken::Window { t0: 2.0, t1: 1.0 }]).unwrap_err();
        assert_eq!(err, ProgramError::InvalidWindow { t0: 2.0, t1: 1.0 });
    }

    #[test]
    fn test_parse_symbolic_and_ascii() {
        let symbolic: WaveProgram = "ω=7 A=0.5 φ=0.25 τ=[0,12)".parse().unwrap();
        let ascii: WaveProgram = "freq=7 amp=0.5 phi=0.25 tau=[0,12)".parse().unwrap();
        assert_eq!(symbolic, ascii);
        assert_eq!(
            symbolic.tokens()[3],
            WaveToken::Window { t0: 0.0, t1: 12.0 }
        );
        let reparsed: WaveProgram = symbolic.to_string().parse().unwrap();
        assert_eq!(reparsed, symbolic);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "ω=seven".parse::<WaveProgram>(),
            Err(ProgramError::InvalidNumber { .. })
        ));
        assert!(matches!(
            "β=1".parse::<WaveProgram>(),
            Err(ProgramError::UnknownToken(_))
        ));
        assert!(matches!(
            "τ=[0,1]".parse::<WaveProgram>(),
            Err(ProgramError::UnknownToken(_))
        ));
        assert!(matches!(
            "τ=[3,1)".parse::<WaveProgram>(),
            Err(ProgramError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"tokens":[{"type":"window","t0":1.0,"t1":0.0}]}"#;
        assert!(serde_json::from_str::<WaveProgram>(json).is_err());

        let json = r#"{"tokens":[{"type":"frequency","hz":7.0},{"type":"window","t0":0.0,"t1":1.0}]}"#;
        let program: WaveProgram = serde_json::from_str(json).unwrap();
        assert_eq!(program.tokens().len(), 2);
    }
}
