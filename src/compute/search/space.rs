//! Bounded real-vector candidate space.
//!
//! A ready-made candidate representation for tuning simulation parameters:
//! uniform sampling inside per-dimension bounds and Gaussian perturbation
//! scaled by each dimension's range, clamped back into bounds.

use serde::{Deserialize, Serialize};

use crate::compute::Lcg;
use crate::schema::SearchSettings;

use super::config::{SearchConfig, SearchError};
use super::fitness::Fitness;

/// Per-dimension `(lo, hi)` bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealSpace {
    bounds: Vec<(f64, f64)>,
}

impl RealSpace {
    /// Create a space, rejecting inverted or non-finite bounds.
    pub fn new(bounds: Vec<(f64, f64)>) -> Result<Self, SearchError> {
        for (dim, &(lo, hi)) in bounds.iter().enumerate() {
            if !lo.is_finite() || !hi.is_finite() || hi < lo {
                return Err(SearchError::InvalidSettings(format!(
                    "dimension {dim} has bounds ({lo}, {hi})"
                )));
            }
        }
        Ok(Self { bounds })
    }

    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    #[inline]
    pub fn dims(&self) -> usize {
        self.bounds.len()
    }

    /// Uniform point inside the bounds. One draw per dimension.
    pub fn sample(&self, rng: &mut Lcg) -> Vec<f64> {
        self.bounds
            .iter()
            .map(|&(lo, hi)| rng.uniform(lo, hi))
            .collect()
    }

    /// Gaussian perturbation: `x + step * (hi - lo) * N(0, 1)` per dimension,
    /// clamped into bounds.
    pub fn perturb(&self, x: &[f64], rng: &mut Lcg, step: f64) -> Vec<f64> {
        x.iter()
            .zip(&self.bounds)
            .map(|(&v, &(lo, hi))| {
                let noise = rng.gaussian();
                (v + noise * step * (hi - lo)).clamp(lo, hi)
            })
            .collect()
    }

    /// Clamp a point into bounds in place.
    pub fn clamp(&self, x: &mut [f64]) {
        for (v, &(lo, hi)) in x.iter_mut().zip(&self.bounds) {
            *v = v.clamp(lo, hi);
        }
    }

    /// Mean absolute difference, each dimension normalized by its range.
    ///
    /// Degenerate dimensions (`lo == hi`) contribute 0.
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        if self.bounds.is_empty() {
            return 0.0;
        }
        let total: f64 = a
            .iter()
            .zip(b)
            .zip(&self.bounds)
            .map(|((x, y), &(lo, hi))| {
                let range = hi - lo;
                if range > 0.0 { (x - y).abs() / range } else { 0.0 }
            })
            .sum();
        total / self.bounds.len() as f64
    }

    /// Search configuration over this space with the given evaluator.
    pub fn search_config<F, E>(
        &self,
        settings: SearchSettings,
        evaluate: F,
    ) -> Result<SearchConfig<Vec<f64>>, SearchError>
    where
        F: Fn(&[f64]) -> E + Send + Sync + 'static,
        E: Into<Fitness>,
    {
        let sampler = self.clone();
        let mutator = self.clone();
        SearchConfig::builder()
            .settings(settings)
            .sample(move |rng| sampler.sample(rng))
            .evaluate(move |x: &Vec<f64>| evaluate(x))
            .mutate(move |x: &Vec<f64>, rng: &mut Lcg, step| mutator.perturb(x, rng, step))
            .build()
    }
}
