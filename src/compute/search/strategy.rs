//! (μ, λ) and (μ + λ) evolution strategies.

use crate::compute::Lcg;
use crate::schema::EsSettings;

use super::config::{SearchConfig, SearchError, SearchResult, StopReason, pad_trace};
use super::fitness::Fitness;

/// Per-generation summary handed to the progress callback.
#[derive(Debug, Clone)]
pub struct GenerationReport<'a> {
    /// Zero-based generation index.
    pub generation: usize,
    /// Primary scores of the selection pool in construction order
    /// (parents first under the plus strategy, then offspring).
    pub pool_scores: &'a [f64],
    /// Primary scores of the retained parents, best first.
    pub parent_scores: &'a [f64],
}

/// Run an evolution strategy with the seed and step size from `config`.
///
/// The run length is `es.generations`; `SearchSettings::iterations` is not
/// used here.
pub fn run_es<C: Clone>(
    config: &SearchConfig<C>,
    es: &EsSettings,
) -> Result<SearchResult<C>, SearchError> {
    run_es_with_callback(config, es, |_| {})
}

/// Like [`run_es`], reporting each generation's selection to `on_generation`.
///
/// Parents are sampled with `sample`; each offspring is
/// `mutate(parent, rng, step0)` from a parent picked uniformly at random.
/// The pool is sorted by fitness, descending and stable, and truncated to
/// `mu`. `trace[g]` is the best parent score entering generation `g`; the
/// final entry is the best of the last parents.
pub fn run_es_with_callback<C, F>(
    config: &SearchConfig<C>,
    es: &EsSettings,
    mut on_generation: F,
) -> Result<SearchResult<C>, SearchError>
where
    C: Clone,
    F: FnMut(&GenerationReport<'_>),
{
    let mutate = config.require_mutate()?;
    es.validate()?;

    let settings = config.settings();
    let step = settings.step0;
    let mut rng = Lcg::new(settings.seed);

    let mut parents: Vec<(C, Fitness)> = (0..es.mu)
        .map(|_| {
            let c = config.sample(&mut rng);
            let f = config.evaluate(&c);
            (c, f)
        })
        .collect();
    parents.sort_by(|a, b| Fitness::descending(&a.1, &b.1));
    let mut evaluations = es.mu;

    let mut trace = Vec::with_capacity(es.generations + 1);
    let mut stop_reason = StopReason::MaxIterations;

    for generation in 0..es.generations {
        trace.push(parents[0].1.primary());
        if config.should_stop(&parents[0].1) {
            stop_reason = StopReason::TargetReached;
            break;
        }

        let mut offspring = Vec::with_capacity(es.lambda);
        for _ in 0..es.lambda {
            let idx = rng.index(parents.len())?;
            let child = mutate(&parents[idx].0, &mut rng, step);
            let fitness = config.evaluate(&child);
            offspring.push((child, fitness));
        }
        evaluations += es.lambda;

        let mut pool = if es.plus_strategy {
            let mut pool = std::mem::take(&mut parents);
            pool.extend(offspring);
            pool
        } else {
            offspring
        };

        let pool_scores: Vec<f64> = pool.iter().map(|(_, f)| f.primary()).collect();
        if pool_scores.iter().all(|s| s.is_nan()) {
            log::warn!("run_es: generation {generation} produced no comparable scores");
        }

        pool.sort_by(|a, b| Fitness::descending(&a.1, &b.1));
        pool.truncate(es.mu);
        parents = pool;

        let parent_scores: Vec<f64> = parents.iter().map(|(_, f)| f.primary()).collect();
        on_generation(&GenerationReport {
            generation,
            pool_scores: &pool_scores,
            parent_scores: &parent_scores,
        });
        log::debug!(
            "run_es: generation {generation} best {}",
            parent_scores[0]
        );
    }

    if stop_reason == StopReason::MaxIterations {
        trace.push(parents[0].1.primary());
    } else {
        log::info!(
            "run_es: target reached after {} generations (score {})",
            trace.len() - 1,
            parents[0].1.primary()
        );
    }
    pad_trace(&mut trace, es.generations + 1);

    let (best, best_fitness) = parents.swap_remove(0);
    Ok(SearchResult {
        best,
        best_fitness,
        trace,
        evaluations,
        stop_reason,
    })
}
