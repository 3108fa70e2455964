//! Fixed-step simulation driver.
//!
//! The harness is a deterministic clock: it owns the run's single [`Lcg`],
//! calls the step closure once per tick with `t = i * dt`, then hands the
//! final state to the result closure. It knows nothing about the model
//! being stepped.

use crate::schema::{ClockConfig, ClockError};

use super::rng::Lcg;

/// Position of the clock within a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Zero-based tick index.
    pub index: usize,
    /// Simulation time at the start of the tick.
    pub t: f64,
}

/// Run `clock.steps` ticks over `state`, then return `result(state)`.
pub fn run_sim<S, R, F, G>(
    clock: &ClockConfig,
    state: &mut S,
    step: F,
    result: G,
) -> Result<R, ClockError>
where
    F: FnMut(&mut S, Tick, &mut Lcg),
    G: FnOnce(&S) -> R,
{
    run_sim_with_callback(clock, state, step, |_, _| {}, result)
}

/// Like [`run_sim`], invoking `on_tick` after every step.
pub fn run_sim_with_callback<S, R, F, C, G>(
    clock: &ClockConfig,
    state: &mut S,
    mut step: F,
    mut on_tick: C,
    result: G,
) -> Result<R, ClockError>
where
    F: FnMut(&mut S, Tick, &mut Lcg),
    C: FnMut(&S, Tick),
    G: FnOnce(&S) -> R,
{
    clock.validate()?;

    let mut rng = Lcg::new(clock.seed);
    log::debug!(
        "run_sim: {} steps at dt={} (seed {})",
        clock.steps,
        clock.dt,
        clock.seed
    );

    for index in 0..clock.steps {
        let tick = Tick {
            index,
            t: index as f64 * clock.dt,
        };
        step(state, tick, &mut rng);
        on_tick(state, tick);
    }

    Ok(result(state))
}
