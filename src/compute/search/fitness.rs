//! Fitness values and the dominance rule shared by every strategy.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Result of evaluating one candidate.
///
/// Evaluators either return a bare score or a score carrying a pass flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fitness {
    /// Plain scalar score.
    Scalar(f64),
    /// Score plus a boolean acceptance flag.
    Structured { primary: f64, pass: bool },
}

impl Fitness {
    /// The scalar used for ranking and traces.
    #[inline]
    pub fn primary(&self) -> f64 {
        match *self {
            Fitness::Scalar(v) => v,
            Fitness::Structured { primary, .. } => primary,
        }
    }

    /// Whether this result carries a set pass flag. Scalars never pass.
    #[inline]
    pub fn passes(&self) -> bool {
        matches!(self, Fitness::Structured { pass: true, .. })
    }

    /// Ranking key: NaN ranks below every number, including -inf.
    #[inline]
    pub(crate) fn rank_key(&self) -> f64 {
        let p = self.primary();
        if p.is_nan() { f64::NEG_INFINITY } else { p }
    }

    /// Whether `self` may replace `incumbent`.
    ///
    /// A strictly higher score always wins. An equal score wins unless it
    /// would give up a pass flag the incumbent holds. NaN never beats a
    /// number.
    pub fn dominates(&self, incumbent: &Fitness) -> bool {
        if self.primary().is_nan() && !incumbent.primary().is_nan() {
            return false;
        }
        let (a, b) = (self.rank_key(), incumbent.rank_key());
        a > b || (a == b && (self.passes() || !incumbent.passes()))
    }

    /// Descending order for selection: higher score first, then passing
    /// results ahead of non-passing ones at the same score.
    pub(crate) fn descending(a: &Fitness, b: &Fitness) -> Ordering {
        b.rank_key()
            .total_cmp(&a.rank_key())
            .then_with(|| b.passes().cmp(&a.passes()))
    }
}

impl From<f64> for Fitness {
    fn from(value: f64) -> Self {
        Fitness::Scalar(value)
    }
}

impl From<(f64, bool)> for Fitness {
    fn from((primary, pass): (f64, bool)) -> Self {
        Fitness::Structured { primary, pass }
    }
}
