//! Numeric settings for the search strategies.
//!
//! The callable parts of a search (sample, evaluate, mutate) live in
//! `compute::search::SearchConfig`; everything here is plain data.

use serde::{Deserialize, Serialize};

/// Settings shared by hillclimb and random search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Seed for the run's RNG stream.
    #[serde(default)]
    pub seed: u32,
    /// Number of iterations after the initial evaluation.
    pub iterations: usize,
    /// Initial hillclimb step size.
    #[serde(default = "default_step0")]
    pub step0: f64,
    /// Multiplicative decay applied to the step size every iteration.
    #[serde(default = "default_step_decay")]
    pub step_decay: f64,
    /// Optional early-stop condition.
    #[serde(default)]
    pub stop_when: Option<StopWhen>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            seed: 1,
            iterations: 200,
            step0: default_step0(),
            step_decay: default_step_decay(),
            stop_when: None,
        }
    }
}

fn default_step0() -> f64 {
    1.0
}
fn default_step_decay() -> f64 {
    1.0
}

/// Early-stop predicate evaluated against the best result so far.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StopWhen {
    /// Stop once the best result carries a pass flag.
    #[serde(default)]
    pub pass: bool,
    /// Stop once the best primary score reaches this value.
    #[serde(default)]
    pub min_score: Option<f64>,
}

impl StopWhen {
    /// Whether a result with this score and pass flag satisfies the predicate.
    ///
    /// An empty predicate (no pass requirement, no minimum) never fires.
    pub fn is_met(&self, primary: f64, passes: bool) -> bool {
        if !self.pass && self.min_score.is_none() {
            return false;
        }
        let pass_ok = !self.pass || passes;
        let score_ok = self.min_score.is_none_or(|min| primary >= min);
        pass_ok && score_ok
    }
}

/// (mu, lambda) / (mu + lambda) evolution strategy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsSettings {
    /// Number of parents kept each generation.
    pub mu: usize,
    /// Number of offspring generated each generation.
    pub lambda: usize,
    /// Number of generations.
    pub generations: usize,
    /// Select from parents + offspring instead of offspring only.
    #[serde(default)]
    pub plus_strategy: bool,
}

impl Default for EsSettings {
    fn default() -> Self {
        Self {
            mu: 5,
            lambda: 20,
            generations: 50,
            plus_strategy: true,
        }
    }
}

impl SearchSettings {
    /// Validate search settings.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.step0.is_finite() || self.step0 < 0.0 {
            return Err(SettingsError::InvalidStep(self.step0));
        }
        if !self.step_decay.is_finite() || self.step_decay <= 0.0 {
            return Err(SettingsError::InvalidStepDecay(self.step_decay));
        }
        Ok(())
    }
}

impl EsSettings {
    /// Validate population sizes.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let too_small = self.mu == 0 || self.lambda == 0;
        let comma_starved = !self.plus_strategy && self.lambda < self.mu;
        if too_small || comma_starved {
            return Err(SettingsError::InvalidPopulation {
                mu: self.mu,
                lambda: self.lambda,
                plus: self.plus_strategy,
            });
        }
        Ok(())
    }
}

/// Search settings validation errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SettingsError {
    #[error("Step size must be non-negative and finite, got {0}")]
    InvalidStep(f64),
    #[error("Step decay must be positive and finite, got {0}")]
    InvalidStepDecay(f64),
    #[error("Invalid population: mu={mu}, lambda={lambda}, plus={plus}")]
    InvalidPopulation { mu: usize, lambda: usize, plus: bool },
}
