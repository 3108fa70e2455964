//! Reproducible experiments built on the harness.
//!
//! - Handshake ablation: two detuned nodes coupled through one gated edge,
//!   run under matched and mismatched chirality across a seed matrix.
//!   Lock is certified by the drift of the unwrapped phase difference over a
//!   trailing window, not by the order parameter.
//! - Selectivity sweep: an oscillator bank driven by a single-tone wave
//!   program, scored by the target channel's energy against the rest.
//!
//! Seeds run in parallel on native targets; each run steps sequentially on
//! its own RNG stream.

use std::f64::consts::TAU;

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{
    BankConfig, BankError, Chirality, ClockConfig, ClockError, CouplingParams, HandshakeConfig,
    SelectivityConfig,
};

use super::harness::run_sim;
use super::kuramoto::{KuramotoNetwork, NetworkError, OscillatorNode};
use super::metrics::{
    self, mean, phase_locking_value, selectivity, sigma_separation, trailing_slope,
};
use super::oscillator::OscillatorBank;
use super::program::{ProgramError, WaveProgram};
use super::search::SearchError;

/// Chirality pairing of the two handshake nodes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HandshakeCondition {
    Match,
    Mismatch,
}

impl HandshakeCondition {
    pub fn chiralities(self) -> (Chirality, Chirality) {
        match self {
            HandshakeCondition::Match => (Chirality::Left, Chirality::Left),
            HandshakeCondition::Mismatch => (Chirality::Left, Chirality::Right),
        }
    }
}

/// Measurements from one handshake run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandshakeRun {
    pub condition: HandshakeCondition,
    pub seed: u32,
    /// |slope| of the unwrapped phase difference over the trailing window
    /// (rad/s).
    pub drift: f64,
    /// `1 - min(drift / |Δω|, 1)`: 1 when locked, 0 when free-running.
    pub coupling_proxy: f64,
    /// Phase locking value over the trailing window.
    pub plv: f64,
    /// Order parameter at the end of the run.
    pub final_order: f64,
}

/// Aggregate of a full match/mismatch seed matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeReport {
    pub runs: Vec<HandshakeRun>,
    pub match_drift_mean: f64,
    pub mismatch_drift_mean: f64,
    pub match_proxy_mean: f64,
    pub match_proxy_std: f64,
    pub mismatch_proxy_mean: f64,
    pub mismatch_proxy_std: f64,
    /// Proxy gap between conditions in units of the larger spread.
    pub separation_sigma: f64,
    pub sigma_threshold: f64,
}

impl HandshakeReport {
    fn from_runs(runs: Vec<HandshakeRun>, sigma_threshold: f64) -> Self {
        let pick = |cond: HandshakeCondition, f: fn(&HandshakeRun) -> f64| -> Vec<f64> {
            runs.iter().filter(|r| r.condition == cond).map(f).collect()
        };
        let match_drift = pick(HandshakeCondition::Match, |r| r.drift);
        let mismatch_drift = pick(HandshakeCondition::Mismatch, |r| r.drift);
        let match_proxy = pick(HandshakeCondition::Match, |r| r.coupling_proxy);
        let mismatch_proxy = pick(HandshakeCondition::Mismatch, |r| r.coupling_proxy);

        Self {
            match_drift_mean: mean(&match_drift),
            mismatch_drift_mean: mean(&mismatch_drift),
            match_proxy_mean: mean(&match_proxy),
            match_proxy_std: metrics::std(&match_proxy),
            mismatch_proxy_mean: mean(&mismatch_proxy),
            mismatch_proxy_std: metrics::std(&mismatch_proxy),
            separation_sigma: sigma_separation(&match_proxy, &mismatch_proxy),
            sigma_threshold,
            runs,
        }
    }

    /// Runs for one condition, in seed order.
    pub fn runs_for(&self, condition: HandshakeCondition) -> impl Iterator<Item = &HandshakeRun> {
        self.runs.iter().filter(move |r| r.condition == condition)
    }

    /// Whether the conditions separate by more than the sigma threshold.
    pub fn separated(&self) -> bool {
        self.separation_sigma > self.sigma_threshold
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Run one handshake scenario from a clean network.
pub fn run_handshake(
    config: &HandshakeConfig,
    condition: HandshakeCondition,
    seed: u32,
) -> Result<HandshakeRun, ExperimentError> {
    let omega0 = TAU * config.base_freq_hz;
    let omega1 = TAU * (config.base_freq_hz + config.detuning_hz);
    let mut network = KuramotoNetwork::new(vec![
        OscillatorNode::new(0.0, omega0, (0.0, 0.0)),
        OscillatorNode::new(0.0, omega1, (config.distance, 0.0)),
    ]);
    let edge = network.add_edge(0, 1, config.edge_k)?;

    let (a, b) = condition.chiralities();
    let params = CouplingParams {
        k_global: config.k_global,
        dist_scale: config.dist_scale,
        noise_std: config.noise_std,
        ..Default::default()
    }
    .with_gate(edge, config.gate.gain(a, b));

    let clock = ClockConfig::for_duration(config.duration, config.dt, seed);
    let dt = clock.dt;

    struct State {
        network: KuramotoNetwork,
        times: Vec<f64>,
        diffs: Vec<f64>,
    }
    let mut state = State {
        network,
        times: Vec::with_capacity(clock.steps),
        diffs: Vec::with_capacity(clock.steps),
    };

    let final_order = run_sim(
        &clock,
        &mut state,
        |s, tick, rng| {
            s.network.step(dt, &params, rng);
            s.times.push(tick.t + dt);
            s.diffs.push(s.network.phase_difference(0, 1));
        },
        |s| s.network.order_parameter(),
    )?;
    let State { times, diffs, .. } = state;

    let drift = trailing_slope(&times, &diffs, config.trailing_window).abs();
    let detuning = (omega1 - omega0).abs();
    let coupling_proxy = if detuning > 0.0 {
        1.0 - (drift / detuning).min(1.0)
    } else {
        1.0
    };

    let window_start = times
        .last()
        .map(|&t_end| times.partition_point(|&t| t < t_end - config.trailing_window))
        .unwrap_or(0);
    let plv = phase_locking_value(&diffs[window_start..]);

    log::debug!(
        "handshake {condition:?} seed {seed}: drift {drift:.4} proxy {coupling_proxy:.3} plv {plv:.3}"
    );

    Ok(HandshakeRun {
        condition,
        seed,
        drift,
        coupling_proxy,
        plv,
        final_order,
    })
}

/// Run both conditions for every configured seed.
pub fn handshake_ablation(config: &HandshakeConfig) -> Result<HandshakeReport, ExperimentError> {
    if config.seeds.is_empty() {
        return Err(ExperimentError::NoSeeds);
    }
    let conditions = [HandshakeCondition::Match, HandshakeCondition::Mismatch];
    let jobs: Vec<(HandshakeCondition, u32)> = conditions
        .into_iter()
        .flat_map(|c| config.seeds.iter().map(move |&s| (c, s)))
        .collect();

    let runs = run_jobs(&jobs, |&(condition, seed)| run_handshake(config, condition, seed))?;
    let report = HandshakeReport::from_runs(runs, config.sigma_threshold);

    log::info!(
        "handshake ablation: match drift {:.4}, mismatch drift {:.4}, separation {:.1} sigma",
        report.match_drift_mean,
        report.mismatch_drift_mean,
        report.separation_sigma
    );
    Ok(report)
}

/// Outcome of driving the bank at one frequency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectivityReport {
    pub drive_hz: f64,
    pub target_hz: f64,
    /// Channel closest to `target_hz`.
    pub target_index: usize,
    /// Mean channel energy over the trailing window, in bank order.
    pub energies: Vec<f64>,
    pub selectivity: f64,
}

impl SelectivityReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Drive the bank with a single tone at `drive_hz` for the configured
/// duration and score the target channel.
pub fn run_selectivity(
    config: &SelectivityConfig,
    drive_hz: f64,
    seed: u32,
) -> Result<SelectivityReport, ExperimentError> {
    let bank = OscillatorBank::new(&BankConfig {
        freqs_hz: config.freqs_hz.clone(),
        zeta: config.zeta,
        gain: config.gain,
        overrides: Vec::new(),
    })?;
    let target_index = bank
        .nearest_channel(config.target_hz)
        .ok_or(ExperimentError::NoTargetChannel(config.target_hz))?;
    let program = WaveProgram::tone(drive_hz, config.amplitude, 0.0, 0.0, config.duration)?;

    let clock = ClockConfig::for_duration(config.duration, config.dt, seed);
    let dt = clock.dt;
    let window_start = clock.duration() - config.energy_window;

    struct State {
        bank: OscillatorBank,
        sums: Vec<f64>,
        samples: usize,
    }
    let mut state = State {
        sums: vec![0.0; bank.len()],
        bank,
        samples: 0,
    };

    let energies = run_sim(
        &clock,
        &mut state,
        |s, tick, rng| {
            let drive = program.apply_at_time(tick.t).u;
            s.bank.step(dt, drive, config.noise_std, rng);
            if tick.t >= window_start {
                for (sum, e) in s.sums.iter_mut().zip(s.bank.energies()) {
                    *sum += e;
                }
                s.samples += 1;
            }
        },
        |s| {
            if s.samples == 0 {
                s.bank.energies()
            } else {
                s.sums.iter().map(|v| v / s.samples as f64).collect()
            }
        },
    )?;

    let others: Vec<f64> = energies
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != target_index)
        .map(|(_, &e)| e)
        .collect();
    let score = selectivity(energies[target_index], &others);

    log::debug!(
        "selectivity: drive {drive_hz} Hz, target {} Hz -> {score:.3}",
        config.target_hz
    );

    Ok(SelectivityReport {
        drive_hz,
        target_hz: config.target_hz,
        target_index,
        energies,
        selectivity: score,
    })
}

/// Run [`run_selectivity`] for each drive frequency.
pub fn selectivity_sweep(
    config: &SelectivityConfig,
    drive_freqs: &[f64],
    seed: u32,
) -> Result<Vec<SelectivityReport>, ExperimentError> {
    let reports = run_jobs(drive_freqs, |&hz| run_selectivity(config, hz, seed))?;
    log::info!("selectivity sweep: {} drive frequencies", reports.len());
    Ok(reports)
}

#[cfg(not(target_arch = "wasm32"))]
fn run_jobs<J, T, F>(jobs: &[J], f: F) -> Result<Vec<T>, ExperimentError>
where
    J: Sync,
    T: Send,
    F: Fn(&J) -> Result<T, ExperimentError> + Sync + Send,
{
    jobs.par_iter().map(f).collect()
}

#[cfg(target_arch = "wasm32")]
fn run_jobs<J, T, F>(jobs: &[J], f: F) -> Result<Vec<T>, ExperimentError>
where
    F: Fn(&J) -> Result<T, ExperimentError>,
{
    jobs.iter().map(f).collect()
}

/// Experiment setup errors.
#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    #[error(transparent)]
    Clock(#[from] ClockError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("Experiment needs at least one seed")]
    NoSeeds,
    #[error("No channel near target frequency {0} Hz")]
    NoTargetChannel(f64),
}
