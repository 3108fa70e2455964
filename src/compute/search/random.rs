//! Random-search baseline.

use crate::compute::Lcg;

use super::config::{SearchConfig, SearchError, SearchResult, StopReason, pad_trace};
use super::hillclimb::Incumbent;

/// Draw an independent `sample(rng)` every iteration and keep the best.
///
/// Uses the same dominance rule as `hillclimb` but never
/// calls `mutate`.
pub fn random_search<C>(config: &SearchConfig<C>) -> Result<SearchResult<C>, SearchError> {
    let settings = config.settings();
    let iterations = settings.iterations;

    let mut rng = Lcg::new(settings.seed);
    let initial = config.sample(&mut rng);
    let fitness = config.evaluate(&initial);
    let mut best = Incumbent::new(initial, fitness);
    let mut evaluations = 1;

    let mut trace = Vec::with_capacity(iterations + 1);
    trace.push(best.fitness.primary());
    let mut stop_reason = StopReason::MaxIterations;

    if config.should_stop(&best.fitness) {
        stop_reason = StopReason::TargetReached;
    } else {
        for iteration in 0..iterations {
            let candidate = config.sample(&mut rng);
            let fitness = config.evaluate(&candidate);
            evaluations += 1;
            best.offer(candidate, fitness);
            trace.push(best.fitness.primary());

            if config.should_stop(&best.fitness) {
                log::info!(
                    "random_search: target reached at iteration {} (score {})",
                    iteration + 1,
                    best.fitness.primary()
                );
                stop_reason = StopReason::TargetReached;
                break;
            }
        }
    }

    pad_trace(&mut trace, iterations + 1);
    log::debug!(
        "random_search: best {} after {} evaluations",
        best.fitness.primary(),
        evaluations
    );

    Ok(SearchResult {
        best: best.candidate,
        best_fitness: best.fitness,
        trace,
        evaluations,
        stop_reason,
    })
}
