//! Greedy hillclimb with a decaying step size.

use crate::compute::Lcg;

use super::config::{SearchConfig, SearchError, SearchResult, StopReason, pad_trace};
use super::fitness::Fitness;

/// A candidate paired with its fitness.
#[derive(Debug, Clone)]
pub(crate) struct Incumbent<C> {
    pub candidate: C,
    pub fitness: Fitness,
}

impl<C> Incumbent<C> {
    pub fn new(candidate: C, fitness: Fitness) -> Self {
        Self { candidate, fitness }
    }

    /// Replace the incumbent if the challenger dominates it.
    pub fn offer(&mut self, candidate: C, fitness: Fitness) -> bool {
        if fitness.dominates(&self.fitness) {
            self.candidate = candidate;
            self.fitness = fitness;
            true
        } else {
            false
        }
    }
}

/// Greedy local search.
///
/// Each iteration proposes `mutate(current, rng, step)` and moves to it when
/// it is no worse than the current candidate. The step size starts at
/// `step0` and is multiplied by `step_decay` after every iteration.
///
/// "No worse" is [`Fitness::dominates`], which is stricter than a plain `>=`
/// on the primary score: an equal-score proposal that would drop the current
/// candidate's pass flag is rejected.
///
/// A NaN initial evaluation is recorded as-is in `trace[0]`. Any later
/// numeric score replaces it, so only the first entry can be NaN.
pub fn hillclimb<C: Clone>(config: &SearchConfig<C>) -> Result<SearchResult<C>, SearchError> {
    let mutate = config.require_mutate()?;
    let settings = config.settings();
    let iterations = settings.iterations;

    let mut rng = Lcg::new(settings.seed);
    let initial = config.sample(&mut rng);
    let fitness = config.evaluate(&initial);
    let mut current = Incumbent::new(initial, fitness);
    let mut best = current.clone();
    let mut evaluations = 1;

    let mut trace = Vec::with_capacity(iterations + 1);
    trace.push(best.fitness.primary());

    let mut step = settings.step0;
    let mut stop_reason = StopReason::MaxIterations;

    if config.should_stop(&best.fitness) {
        stop_reason = StopReason::TargetReached;
    } else {
        for iteration in 0..iterations {
            let proposal = mutate(&current.candidate, &mut rng, step);
            let fitness = config.evaluate(&proposal);
            evaluations += 1;

            if current.offer(proposal, fitness) && current.fitness.dominates(&best.fitness) {
                best = current.clone();
            }
            trace.push(best.fitness.primary());
            step *= settings.step_decay;

            if config.should_stop(&best.fitness) {
                log::info!(
                    "hillclimb: target reached at iteration {} (score {})",
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
        "hillclimb: best {} after {} evaluations",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::search::RealSpace;
    use crate::schema::{SearchSettings, StopWhen};
    use proptest::prelude::*;

    fn quadratic(iterations: usize, seed: u32) -> SearchConfig<f64> {
        SearchConfig::builder()
            .seed(seed)
            .iterations(iterations)
            .step(1.0, 0.995)
            .sample(|rng| rng.uniform(-10.0, 10.0))
            .evaluate(|x: &f64| -(x - 3.0).powi(2))
            .mutate(|x: &f64, rng: &mut Lcg, step| x + step * rng.gaussian())
            .build()
            .unwrap()
    }

    #[test]
    fn test_converges_on_quadratic() {
        let result = hillclimb(&quadratic(500, 7)).unwrap();
        assert!((result.best - 3.0).abs() < 0.1, "best {}", result.best);
        assert_eq!(result.trace.len(), 501);
        assert_eq!(result.evaluations, 501);
        assert_eq!(result.stop_reason, StopReason::MaxIterations);
    }

    #[test]
    fn test_deterministic() {
        let a = hillclimb(&quadratic(100, 3)).unwrap();
        let b = hillclimb(&quadratic(100, 3)).unwrap();
        assert_eq!(a.trace, b.trace);
        assert_eq!(a.best, b.best);
    }

    #[test]
    fn test_zero_iterations() {
        let result = hillclimb(&quadratic(0, 1)).unwrap();
        assert_eq!(result.trace.len(), 1);
        assert_eq!(result.evaluations, 1);
    }

    #[test]
    fn test_missing_mutate_fails_fast() {
        let config = SearchConfig::<f64>::builder()
            .sample(|rng| rng.float01())
            .evaluate(|x: &f64| *x)
            .build()
            .unwrap();
        assert_eq!(
            hillclimb(&config).unwrap_err(),
            SearchError::MissingCapability("mutate")
        );
    }

    #[test]
    fn test_early_stop_pads_trace() {
        let _ = env_logger::builder().is_test(true).try_init();
        let config = SearchConfig::builder()
            .seed(5)
            .iterations(1000)
            .sample(|_| 0.0f64)
            .evaluate(|x: &f64| (*x, *x >= 2.0))
            .mutate(|x: &f64, _: &mut Lcg, _| x + 0.5)
            .stop_when(StopWhen {
                pass: true,
                min_score: None,
            })
            .build()
            .unwrap();
        let result = hillclimb(&config).unwrap();
        assert_eq!(result.stop_reason, StopReason::TargetReached);
        assert_eq!(result.best, 2.0);
        assert_eq!(result.evaluations, 5);
        assert_eq!(result.trace.len(), 1001);
        assert_eq!(&result.trace[..5], &[0.0, 0.5, 1.0, 1.5, 2.0]);
        assert!(result.trace[5..].iter().all(|&v| v == 2.0));
    }

    #[test]
    fn test_pass_flag_accepted_at_equal_score() {
        // Score is flat; only the pass flag distinguishes candidates.
        let config = SearchConfig::builder()
            .iterations(20)
            .sample(|_| 0u32)
            .evaluate(|x: &u32| (1.0, *x >= 3))
            .mutate(|x: &u32, _: &mut Lcg, _| x + 1)
            .build()
            .unwrap();
        let result = hillclimb(&config).unwrap();
        assert!(result.best_fitness.passes());
    }

    #[test]
    fn test_equal_score_keeps_pass_flag() {
        let config = SearchConfig::builder()
            .iterations(10)
            .sample(|_| 0u32)
            .evaluate(|x: &u32| (1.0, *x == 0))
            .mutate(|x: &u32, _: &mut Lcg, _| x + 1)
            .build()
            .unwrap();
        let result = hillclimb(&config).unwrap();
        assert_eq!(result.best, 0);
        assert!(result.best_fitness.passes());
        assert_eq!(result.evaluations, 11);
        assert!(result.trace.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_nan_initial_score_leads_trace() {
        let config = SearchConfig::builder()
            .iterations(5)
            .sample(|_| 0.0f64)
            .evaluate(|x: &f64| if *x == 0.0 { f64::NAN } else { -x.abs() })
            .mutate(|x: &f64, _: &mut Lcg, _| x + 1.0)
            .build()
            .unwrap();
        let result = hillclimb(&config).unwrap();
        assert_eq!(result.trace.len(), 6);
        assert!(result.trace[0].is_nan());
        assert_eq!(&result.trace[1..], &[-1.0; 5]);
        assert_eq!(result.best, 1.0);
        assert_eq!(result.best_score(), -1.0);
    }

    #[test]
    fn test_nan_never_preferred() {
        let config = SearchConfig::builder()
            .iterations(50)
            .sample(|_| 0.0f64)
            .evaluate(|x: &f64| if *x > 0.0 { f64::NAN } else { *x })
            .mutate(|x: &f64, rng: &mut Lcg, _| x + rng.uniform(-1.0, 1.0))
            .build()
            .unwrap();
        let result = hillclimb(&config).unwrap();
        assert!(result.best <= 0.0);
        assert!(result.trace.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_real_space_search() {
        let space = RealSpace::new(vec![(-5.0, 5.0); 3]).unwrap();
        let settings = SearchSettings {
            seed: 11,
            iterations: 2000,
            step0: 0.2,
            step_decay: 0.999,
            stop_when: None,
        };
        let config = space
            .search_config(settings, |x: &[f64]| {
                -x.iter().map(|v| (v - 1.0).powi(2)).sum::<f64>()
            })
            .unwrap();
        let result = hillclimb(&config).unwrap();
        assert!(result.best_score() > -0.5, "score {}", result.best_score());
    }

    proptest! {
        #[test]
        fn prop_trace_non_decreasing(seed in 1u32..u32::MAX, iterations in 0usize..200, decay in 0.5f64..1.0) {
            let config = SearchConfig::builder()
                .seed(seed)
                .iterations(iterations)
                .step(2.0, decay)
                .sample(|rng| rng.uniform(-50.0, 50.0))
                .evaluate(|x: &f64| (x * 0.3).sin() * 10.0 - x.abs() * 0.1)
                .mutate(|x: &f64, rng: &mut Lcg, step| x + step * rng.gaussian())
                .build()
                .unwrap();
            let result = hillclimb(&config).unwrap();
            prop_assert_eq!(result.trace.len(), iterations + 1);
            for pair in result.trace.windows(2) {
                prop_assert!(pair[1] >= pair[0]);
            }
        }
    }
}
