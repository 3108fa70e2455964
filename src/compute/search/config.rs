//! Typed search configuration and results.
//!
//! A [`SearchConfig`] is built once through [`SearchConfigBuilder`] and is
//! immutable for the whole run. The mutate function has a single argument
//! order, `(candidate, rng, step)`.

use serde::{Deserialize, Serialize};

use crate::compute::{Lcg, RngError};
use crate::schema::{SearchSettings, SettingsError, StopWhen};

use super::fitness::Fitness;

/// Draws a fresh candidate.
pub type SampleFn<C> = Box<dyn Fn(&mut Lcg) -> C + Send + Sync>;
/// Scores a candidate.
pub type EvaluateFn<C> = Box<dyn Fn(&C) -> Fitness + Send + Sync>;
/// Proposes a neighbour of a candidate at the given step size.
pub type MutateFn<C> = Box<dyn Fn(&C, &mut Lcg, f64) -> C + Send + Sync>;

/// Capabilities and settings for one search run.
pub struct SearchConfig<C> {
    pub(crate) settings: SearchSettings,
    pub(crate) sample: SampleFn<C>,
    pub(crate) evaluate: EvaluateFn<C>,
    pub(crate) mutate: Option<MutateFn<C>>,
}

impl<C> SearchConfig<C> {
    pub fn builder() -> SearchConfigBuilder<C> {
        SearchConfigBuilder::default()
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Whether a mutate capability was supplied.
    pub fn can_mutate(&self) -> bool {
        self.mutate.is_some()
    }

    pub(crate) fn sample(&self, rng: &mut Lcg) -> C {
        (self.sample)(rng)
    }

    pub(crate) fn evaluate(&self, candidate: &C) -> Fitness {
        (self.evaluate)(candidate)
    }

    /// The mutate capability, or `MissingCapability` for strategies that
    /// need one.
    pub(crate) fn require_mutate(&self) -> Result<&MutateFn<C>, SearchError> {
        self.mutate
            .as_ref()
            .ok_or(SearchError::MissingCapability("mutate"))
    }

    /// Whether the early-stop predicate holds for `best`.
    pub(crate) fn should_stop(&self, best: &Fitness) -> bool {
        self.settings
            .stop_when
            .as_ref()
            .is_some_and(|s| s.is_met(best.primary(), best.passes()))
    }
}

impl<C> std::fmt::Debug for SearchConfig<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("settings", &self.settings)
            .field("mutate", &self.mutate.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`SearchConfig`].
pub struct SearchConfigBuilder<C> {
    settings: SearchSettings,
    sample: Option<SampleFn<C>>,
    evaluate: Option<EvaluateFn<C>>,
    mutate: Option<MutateFn<C>>,
}

impl<C> Default for SearchConfigBuilder<C> {
    fn default() -> Self {
        Self {
            settings: SearchSettings::default(),
            sample: None,
            evaluate: None,
            mutate: None,
        }
    }
}

impl<C> SearchConfigBuilder<C> {
    /// Replace all numeric settings at once.
    pub fn settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.settings.seed = seed;
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.settings.iterations = iterations;
        self
    }

    /// Initial step size and its per-iteration decay factor.
    pub fn step(mut self, step0: f64, step_decay: f64) -> Self {
        self.settings.step0 = step0;
        self.settings.step_decay = step_decay;
        self
    }

    pub fn stop_when(mut self, stop_when: StopWhen) -> Self {
        self.settings.stop_when = Some(stop_when);
        self
    }

    pub fn sample<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Lcg) -> C + Send + Sync + 'static,
    {
        self.sample = Some(Box::new(f));
        self
    }

    /// Evaluator returning anything convertible to [`Fitness`] (`f64`,
    /// `(f64, bool)`, or `Fitness` itself).
    pub fn evaluate<F, E>(mut self, f: F) -> Self
    where
        F: Fn(&C) -> E + Send + Sync + 'static,
        E: Into<Fitness>,
        C: 'static,
    {
        self.evaluate = Some(Box::new(move |c: &C| f(c).into()));
        self
    }

    pub fn mutate<F>(mut self, f: F) -> Self
    where
        F: Fn(&C, &mut Lcg, f64) -> C + Send + Sync + 'static,
    {
        self.mutate = Some(Box::new(f));
        self
    }

    pub(crate) fn mutate_boxed(mut self, f: MutateFn<C>) -> Self {
        self.mutate = Some(f);
        self
    }

    pub(crate) fn sample_boxed(mut self, f: SampleFn<C>) -> Self {
        self.sample = Some(f);
        self
    }

    pub(crate) fn evaluate_boxed(mut self, f: EvaluateFn<C>) -> Self {
        self.evaluate = Some(f);
        self
    }

    /// Finish the configuration, failing on missing capabilities or bad
    /// settings.
    pub fn build(self) -> Result<SearchConfig<C>, SearchError> {
        self.settings.validate()?;
        let sample = self.sample.ok_or(SearchError::MissingCapability("sample"))?;
        let evaluate = self
            .evaluate
            .ok_or(SearchError::MissingCapability("evaluate"))?;
        Ok(SearchConfig {
            settings: self.settings,
            sample,
            evaluate,
            mutate: self.mutate,
        })
    }
}

/// Why a search finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Ran every iteration or generation.
    MaxIterations,
    /// The early-stop predicate fired.
    TargetReached,
}

/// Outcome of one search run.
#[derive(Debug, Clone)]
pub struct SearchResult<C> {
    /// Best candidate found.
    pub best: C,
    /// Fitness of `best`.
    pub best_fitness: Fitness,
    /// Best primary score after each iteration; `trace[0]` is the initial
    /// evaluation. Length is always `iterations + 1`.
    pub trace: Vec<f64>,
    /// Number of evaluator calls made.
    pub evaluations: usize,
    pub stop_reason: StopReason,
}

impl<C> SearchResult<C> {
    /// Final best primary score.
    pub fn best_score(&self) -> f64 {
        self.best_fitness.primary()
    }
}

/// Pad a trace cut short by early stopping up to `len` entries.
pub(crate) fn pad_trace(trace: &mut Vec<f64>, len: usize) {
    if let Some(&last) = trace.last()
        && trace.len() < len
    {
        trace.resize(len, last);
    }
}

/// Search configuration and run errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SearchError {
    #[error("Search config has no '{0}' capability")]
    MissingCapability(&'static str),
    #[error("Mutator is not callable: {0}")]
    MalformedMutator(String),
    #[error("Invalid population: mu={mu}, lambda={lambda}, plus={plus}")]
    InvalidPopulation { mu: usize, lambda: usize, plus: bool },
    #[error("Invalid search settings: {0}")]
    InvalidSettings(String),
    #[error(transparent)]
    Rng(#[from] RngError),
}

impl From<SettingsError> for SearchError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::InvalidPopulation { mu, lambda, plus } => {
                SearchError::InvalidPopulation { mu, lambda, plus }
            }
            other => SearchError::InvalidSettings(other.to_string()),
        }
    }
}
