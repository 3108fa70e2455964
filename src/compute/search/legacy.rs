//! Normalization of loosely-shaped search configurations.
//!
//! Older callers name capabilities with aliases (`sample|init|make`,
//! `evaluate|score|fitness`, `mutate|step|perturb`) and write mutators in
//! either argument order. [`LegacyConfig`] records those shapes as an
//! explicit tagged union and resolves them once into a [`SearchConfig`];
//! nothing is sniffed per call.

use std::collections::HashMap;

use crate::compute::Lcg;
use crate::schema::SearchSettings;

use super::config::{EvaluateFn, MutateFn, SampleFn, SearchConfig, SearchError};
use super::fitness::Fitness;

/// Accepted names for each capability, in priority order.
pub const SAMPLE_ALIASES: [&str; 3] = ["sample", "init", "make"];
pub const EVALUATE_ALIASES: [&str; 3] = ["evaluate", "score", "fitness"];
pub const MUTATE_ALIASES: [&str; 3] = ["mutate", "step", "perturb"];

/// Mutator written as `(rng, candidate, step)`.
pub type RngFirstMutateFn<C> = Box<dyn Fn(&mut Lcg, &C, f64) -> C + Send + Sync>;

/// One named entry of a legacy configuration.
pub enum LegacyValue<C> {
    Sample(SampleFn<C>),
    Evaluate(EvaluateFn<C>),
    /// Mutator taking `(candidate, rng, step)`.
    CandidateFirst(MutateFn<C>),
    /// Mutator taking `(rng, candidate, step)`.
    RngFirst(RngFirstMutateFn<C>),
    /// A plain number where a function may have been expected.
    Number(f64),
}

impl<C: 'static> LegacyValue<C> {
    pub fn sample<F>(f: F) -> Self
    where
        F: Fn(&mut Lcg) -> C + Send + Sync + 'static,
    {
        LegacyValue::Sample(Box::new(f))
    }

    pub fn evaluate<F, E>(f: F) -> Self
    where
        F: Fn(&C) -> E + Send + Sync + 'static,
        E: Into<Fitness>,
    {
        LegacyValue::Evaluate(Box::new(move |c: &C| f(c).into()))
    }

    pub fn candidate_first<F>(f: F) -> Self
    where
        F: Fn(&C, &mut Lcg, f64) -> C + Send + Sync + 'static,
    {
        LegacyValue::CandidateFirst(Box::new(f))
    }

    pub fn rng_first<F>(f: F) -> Self
    where
        F: Fn(&mut Lcg, &C, f64) -> C + Send + Sync + 'static,
    {
        LegacyValue::RngFirst(Box::new(f))
    }

    fn kind(&self) -> &'static str {
        match self {
            LegacyValue::Sample(_) => "sample function",
            LegacyValue::Evaluate(_) => "evaluate function",
            LegacyValue::CandidateFirst(_) | LegacyValue::RngFirst(_) => "mutate function",
            LegacyValue::Number(_) => "number",
        }
    }
}

/// A search configuration keyed by alias names.
pub struct LegacyConfig<C> {
    settings: SearchSettings,
    entries: HashMap<String, LegacyValue<C>>,
}

impl<C: 'static> LegacyConfig<C> {
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            entries: HashMap::new(),
        }
    }

    /// Add or replace a named entry.
    pub fn with(mut self, name: impl Into<String>, value: LegacyValue<C>) -> Self {
        self.entries.insert(name.into(), value);
        self
    }

    /// Resolve aliases and argument orders into a typed configuration.
    ///
    /// Fails with `MissingCapability` when no alias of a required capability
    /// is present, and with `MalformedMutator` when the mutate alias names
    /// something other than a mutator.
    pub fn resolve(mut self, require_mutate: bool) -> Result<SearchConfig<C>, SearchError> {
        let mut builder = SearchConfig::builder().settings(self.settings.clone());

        match take_alias(&mut self.entries, &SAMPLE_ALIASES) {
            Some((_, LegacyValue::Sample(f))) => builder = builder.sample_boxed(f),
            _ => return Err(SearchError::MissingCapability("sample")),
        }

        match take_alias(&mut self.entries, &EVALUATE_ALIASES) {
            Some((_, LegacyValue::Evaluate(f))) => builder = builder.evaluate_boxed(f),
            _ => return Err(SearchError::MissingCapability("evaluate")),
        }

        match take_alias(&mut self.entries, &MUTATE_ALIASES) {
            Some((_, LegacyValue::CandidateFirst(f))) => builder = builder.mutate_boxed(f),
            Some((_, LegacyValue::RngFirst(f))) => {
                builder = builder.mutate_boxed(Box::new(move |c: &C, rng: &mut Lcg, step: f64| {
                    f(rng, c, step)
                }));
            }
            Some((name, other)) => {
                return Err(SearchError::MalformedMutator(format!(
                    "'{name}' is a {}",
                    other.kind()
                )));
            }
            None if require_mutate => return Err(SearchError::MissingCapability("mutate")),
            None => {}
        }

        if !self.entries.is_empty() {
            let mut ignored: Vec<&str> = self.entries.keys().map(String::as_str).collect();
            ignored.sort_unstable();
            log::debug!("LegacyConfig: ignoring unrecognized entries {ignored:?}");
        }

        builder.build()
    }
}

fn take_alias<C>(
    entries: &mut HashMap<String, LegacyValue<C>>,
    aliases: &[&'static str],
) -> Option<(&'static str, LegacyValue<C>)> {
    aliases
        .iter()
        .find_map(|&name| entries.remove(name).map(|value| (name, value)))
}
