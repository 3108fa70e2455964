//! Pure metric functions over phases, channel responses and series.
//!
//! Numerical edge cases (too few points, zero variance) return sentinel
//! values rather than errors.

use std::f64::consts::{PI, TAU};

/// Guard against division by an exactly-zero background.
const SELECTIVITY_EPS: f64 = 1e-12;

/// Arithmetic mean. Empty input yields 0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation. Fewer than two values yield 0.
pub fn std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Ordinary least-squares slope of `ys` against `xs`.
///
/// Returns 0 with fewer than two pairs or when the x-variance is 0. Extra
/// elements in the longer slice are ignored.
pub fn linear_slope(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mx = mean(xs);
    let my = mean(ys);
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mx;
        sxx += dx * dx;
        sxy += dx * (y - my);
    }
    if sxx == 0.0 {
        return 0.0;
    }
    sxy / sxx
}

/// Slope over the trailing samples with `x >= x_last - window`.
pub fn trailing_slope(xs: &[f64], ys: &[f64], window: f64) -> f64 {
    let n = xs.len().min(ys.len());
    let Some(&last) = xs[..n].last() else {
        return 0.0;
    };
    let start = xs[..n].partition_point(|&x| x < last - window);
    linear_slope(&xs[start..n], &ys[start..n])
}

/// Target response relative to the background: `target / (mean + std)` of
/// the other channels, floored at 0.
///
/// Grows as the target rises or the background falls.
pub fn selectivity(target: f64, others: &[f64]) -> f64 {
    let background = mean(others) + std(others);
    (target / background.max(SELECTIVITY_EPS)).max(0.0)
}

/// Wrap a phase to (-π, π].
pub fn wrap_phase(theta: f64) -> f64 {
    let wrapped = (theta + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI { PI } else { wrapped }
}

/// Undo 2π jumps in a sequence of wrapped phases.
pub fn unwrap_phases(phases: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(phases.len());
    let mut offset = 0.0;
    let mut prev: Option<f64> = None;
    for &p in phases {
        if let Some(q) = prev {
            let jump = p - q;
            if jump > PI {
                offset -= TAU;
            } else if jump < -PI {
                offset += TAU;
            }
        }
        out.push(p + offset);
        prev = Some(p);
    }
    out
}

/// Phase locking value `|mean(e^{iΔθ})|` over a series of phase differences.
pub fn phase_locking_value(diffs: &[f64]) -> f64 {
    if diffs.is_empty() {
        return 0.0;
    }
    let (s, c) = diffs
        .iter()
        .fold((0.0, 0.0), |(s, c), d| (s + d.sin(), c + d.cos()));
    let n = diffs.len() as f64;
    ((s / n).powi(2) + (c / n).powi(2)).sqrt().min(1.0)
}

/// Gap between condition means in units of the larger spread.
///
/// Returns infinity (signed) when both spreads are 0 and the means differ.
pub fn sigma_separation(a: &[f64], b: &[f64]) -> f64 {
    let gap = mean(a) - mean(b);
    let spread = std(a).max(std(b));
    if spread == 0.0 {
        if gap == 0.0 {
            return 0.0;
        }
        return gap.signum() * f64::INFINITY;
    }
    gap / spread
}

/// Whether `mean(a) - mean(b) > k * max(std(a), std(b))`.
pub fn separates(a: &[f64], b: &[f64], k: f64) -> bool {
    mean(a) - mean(b) > k * std(a).max(std(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mean_std() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std(&[]), 0.0);
        assert_eq!(std(&[4.2]), 0.0);
        assert!((mean(&[1.0, 2.0, 3.0, 4.0]) - 2.5).abs() < 1e-12);
        assert!((std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_slope() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 5.0, 7.0];
        assert!((linear_slope(&xs, &ys) - 2.0).abs() < 1e-12);
        assert_eq!(linear_slope(&[1.0], &[2.0]), 0.0);
        assert_eq!(linear_slope(&[1.0, 1.0, 1.0], &[0.0, 5.0, 9.0]), 0.0);
    }

    #[test]
    fn test_trailing_slope() {
        let xs: Vec<f64> = (0..100).map(|i| i as f64 * 0.1).collect();
        let ys: Vec<f64> = xs
            .iter()
            .map(|&x| if x < 5.0 { 10.0 * x } else { 50.0 - x })
            .collect();
        assert!((trailing_slope(&xs, &ys, 3.0) + 1.0).abs() < 1e-9);
        assert_eq!(trailing_slope(&[], &[], 1.0), 0.0);
    }

    #[test]
    fn test_selectivity_monotonic() {
        let others = [0.1, 0.2, 0.15, 0.05];
        let mut prev = selectivity(0.0, &others);
        assert_eq!(prev, 0.0);
        for i in 1..20 {
            let s = selectivity(i as f64 * 0.1, &others);
            assert!(s > prev);
            prev = s;
        }
        let quieter = [0.01, 0.02, 0.015, 0.005];
        assert!(selectivity(1.0, &quieter) > selectivity(1.0, &others));
        assert!(selectivity(-1.0, &others) >= 0.0);
    }

    #[test]
    fn test_wrap_phase() {
        assert!((wrap_phase(3.0 * PI).abs() - PI).abs() < 1e-9);
        assert!((wrap_phase(-PI) - PI).abs() < 1e-12);
        assert!((wrap_phase(0.5 + 4.0 * TAU) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_unwrap_roundtrip() {
        let truth: Vec<f64> = (0..200).map(|i| i as f64 * 0.3).collect();
        let wrapped: Vec<f64> = truth.iter().map(|&t| wrap_phase(t)).collect();
        let unwrapped = unwrap_phases(&wrapped);
        for (u, t) in unwrapped.iter().zip(&truth) {
            assert!((u - t).abs() < 1e-9);
        }
    }

    #[test]
    fn test_phase_locking_value() {
        assert!((phase_locking_value(&[0.4; 10]) - 1.0).abs() < 1e-12);
        let spread: Vec<f64> = (0..100).map(|i| i as f64 * TAU / 100.0).collect();
        assert!(phase_locking_value(&spread) < 1e-9);
        assert_eq!(phase_locking_value(&[]), 0.0);
    }

    #[test]
    fn test_separation() {
        let a = [1.0, 1.1, 0.9];
        let b = [0.0, 0.1, -0.1];
        assert!(separates(&a, &b, 3.0));
        assert!(!separates(&b, &a, 3.0));
        assert!(sigma_separation(&a, &b) > 10.0);
        assert_eq!(sigma_separation(&[1.0], &[0.0]), f64::INFINITY);
        assert_eq!(sigma_separation(&[1.0], &[1.0]), 0.0);
    }

    proptest! {
        #[test]
        fn prop_std_non_negative(values in proptest::collection::vec(-1e6f64..1e6, 0..50)) {
            prop_assert!(std(&values) >= 0.0);
        }

        #[test]
        fn prop_slope_recovers_line(a in -10.0f64..10.0, b in -10.0f64..10.0, n in 2usize..50) {
            let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
            let ys: Vec<f64> = xs.iter().map(|x| a * x + b).collect();
            prop_assert!((linear_slope(&xs, &ys) - a).abs() < 1e-6);
        }

        #[test]
        fn prop_wrap_in_range(theta in -1e4f64..1e4) {
            let w = wrap_phase(theta);
            prop_assert!(w > -PI && w <= PI);
        }
    }
}
