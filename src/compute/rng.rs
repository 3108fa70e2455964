//! Deterministic 32-bit linear congruential generator.
//!
//! Every stochastic draw in the crate goes through an explicitly owned
//! [`Lcg`]. The recurrence is fixed:
//!
//! ```text
//! state' = (1664525 * state + 1013904223) mod 2^32
//! ```
//!
//! and must stay bit-exact, since recorded experiment results are keyed on
//! (seed, config) pairs.

use rand::Rng;
use rand_distr::StandardNormal;

/// LCG multiplier (Numerical Recipes).
pub const LCG_MULTIPLIER: u32 = 1_664_525;
/// LCG increment (Numerical Recipes).
pub const LCG_INCREMENT: u32 = 1_013_904_223;
/// State used when a zero seed is supplied.
pub const DEFAULT_SEED: u32 = 0x9E37_79B9;

const TWO_POW_32: f64 = 4_294_967_296.0;

/// Deterministic random stream.
///
/// Not `Clone`: two consumers that need independent randomness must be
/// handed independently seeded generators.
#[derive(Debug)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Create from seed. A zero seed is remapped to [`DEFAULT_SEED`].
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { DEFAULT_SEED } else { seed };
        Self { state }
    }

    /// Advance the recurrence and return the new state.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = LCG_MULTIPLIER
            .wrapping_mul(self.state)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Uniform float in [0, 1).
    #[inline]
    pub fn float01(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }

    /// Uniform float in [lo, hi).
    #[inline]
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.float01()
    }

    /// Uniform integer in [lo, hi] inclusive.
    pub fn int(&mut self, lo: i64, hi: i64) -> Result<i64, RngError> {
        if hi < lo {
            return Err(RngError::InvalidRange { lo, hi });
        }
        let span = (i128::from(hi) - i128::from(lo) + 1) as f64;
        let offset = (self.float01() * span).floor() as i128;
        // Rounding in the float product can only overshoot for spans near 2^53.
        Ok((i128::from(lo) + offset).min(i128::from(hi)) as i64)
    }

    /// Uniform integer in [0, n).
    pub fn below(&mut self, n: i64) -> Result<i64, RngError> {
        if n <= 0 {
            return Err(RngError::NonPositiveCount(n));
        }
        self.int(0, n - 1)
    }

    /// Uniform index in [0, len).
    pub fn index(&mut self, len: usize) -> Result<usize, RngError> {
        if len == 0 {
            return Err(RngError::EmptyCollection);
        }
        Ok(self.int(0, len as i64 - 1)? as usize)
    }

    /// Pick a uniformly random element.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, RngError> {
        let idx = self.index(items.len())?;
        Ok(&items[idx])
    }

    /// Fisher-Yates shuffle in place, from the last index down to 1.
    pub fn shuffle<T>(&mut self, items: &mut [T]) -> Result<(), RngError> {
        if items.is_empty() {
            return Err(RngError::EmptyCollection);
        }
        for i in (1..items.len()).rev() {
            let j = self.int(0, i as i64)? as usize;
            items.swap(i, j);
        }
        Ok(())
    }

    /// Standard normal draw sampled from this stream.
    ///
    /// Consumes `next_u64` advances (two `next_u32` each); the count per
    /// draw varies with the sampler's rejection steps but is fixed for a
    /// given stream position.
    #[inline]
    pub fn gaussian(&mut self) -> f64 {
        self.sample(StandardNormal)
    }
}

impl rand::RngCore for Lcg {
    fn next_u32(&mut self) -> u32 {
        Lcg::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(Lcg::next_u32(self));
        let hi = u64::from(Lcg::next_u32(self));
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = Lcg::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Misuse of the generator API.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RngError {
    #[error("Invalid range: hi ({hi}) < lo ({lo})")]
    InvalidRange { lo: i64, hi: i64 },
    #[error("Cannot draw from an empty collection")]
    EmptyCollection,
    #[error("Count must be positive, got {0}")]
    NonPositiveCount(i64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_recurrence_seed_one() {
        let mut rng = Lcg::new(1);
        assert_eq!(rng.next_u32(), 1_015_568_748);
        // 1664525 * 1015568748 + 1013904223 mod 2^32
        let expected = (1_664_525u64 * 1_015_568_748u64 + 1_013_904_223u64) % (1u64 << 32);
        assert_eq!(u64::from(rng.next_u32()), expected);
    }

    #[test]
    fn test_zero_seed_remapped() {
        let mut a = Lcg::new(0);
        let mut b = Lcg::new(DEFAULT_SEED);
        assert_eq!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn test_determinism_10k() {
        for seed in [1u32, 42, 0xDEAD_BEEF, u32::MAX] {
            let mut a = Lcg::new(seed);
            let mut b = Lcg::new(seed);
            for _ in 0..10_000 {
                assert_eq!(a.next_u32(), b.next_u32());
            }
        }
    }

    #[test]
    fn test_float01_range() {
        let mut rng = Lcg::new(7);
        for _ in 0..10_000 {
            let x = rng.float01();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_int_invalid_range() {
        let mut rng = Lcg::new(3);
        assert_eq!(rng.int(5, 4), Err(RngError::InvalidRange { lo: 5, hi: 4 }));
    }

    #[test]
    fn test_int_single_value() {
        let mut rng = Lcg::new(3);
        for _ in 0..100 {
            assert_eq!(rng.int(-2, -2).unwrap(), -2);
        }
    }

    #[test]
    fn test_int_extreme_span() {
        let mut rng = Lcg::new(11);
        for _ in 0..1000 {
            assert!(rng.int(i64::MIN, i64::MAX).is_ok());
        }
        for _ in 0..1000 {
            let v = rng.int(i64::MAX - 1, i64::MAX).unwrap();
            assert!(v >= i64::MAX - 1);
        }
    }

    #[test]
    fn test_below() {
        let mut rng = Lcg::new(5);
        assert_eq!(rng.below(0), Err(RngError::NonPositiveCount(0)));
        assert_eq!(rng.below(-3), Err(RngError::NonPositiveCount(-3)));
        for _ in 0..1000 {
            let v = rng.below(6).unwrap();
            assert!((0..6).contains(&v));
        }
    }

    #[test]
    fn test_pick_and_empty() {
        let mut rng = Lcg::new(9);
        let empty: [u8; 0] = [];
        assert_eq!(rng.pick(&empty), Err(RngError::EmptyCollection));
        let mut nothing: [u8; 0] = [];
        assert_eq!(rng.shuffle(&mut nothing), Err(RngError::EmptyCollection));

        let items = ['a', 'b', 'c'];
        let mut seen = [false; 3];
        for _ in 0..200 {
            let c = *rng.pick(&items).unwrap();
            seen[(c as u8 - b'a') as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_pick_uses_one_advance() {
        let mut a = Lcg::new(21);
        let mut b = Lcg::new(21);
        let items = [10, 20, 30, 40];
        let picked = *a.pick(&items).unwrap();
        let idx = (b.float01() * 4.0).floor() as usize;
        assert_eq!(picked, items[idx]);
        assert_eq!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn test_gaussian_moments() {
        let mut rng = Lcg::new(1234);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.gaussian()).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.05, "var {var}");
        assert!(samples.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_gaussian_reproducible() {
        let mut a = Lcg::new(17);
        let mut b = Lcg::new(17);
        let xs: Vec<f64> = (0..64).map(|_| a.gaussian()).collect();
        let ys: Vec<f64> = (0..64).map(|_| b.gaussian()).collect();
        assert_eq!(xs, ys);
        assert_eq!(a.next_u32(), b.next_u32());

        let mut c = Lcg::new(18);
        let zs: Vec<f64> = (0..64).map(|_| c.gaussian()).collect();
        assert_ne!(xs, zs);
    }

    #[test]
    fn test_gaussian_advances_stream() {
        let mut a = Lcg::new(5);
        let mut untouched = Lcg::new(5);
        a.gaussian();
        assert_ne!(a.next_u32(), untouched.next_u32());
    }

    #[test]
    fn test_rng_core_interop() {
        use rand::seq::SliceRandom;

        let items = [1, 2, 3, 4, 5];
        let mut a = Lcg::new(77);
        let mut b = Lcg::new(77);
        assert_eq!(items.choose(&mut a), items.choose(&mut b));

        let mut bytes = [0u8; 6];
        rand::RngCore::fill_bytes(&mut a, &mut bytes);
        let first = Lcg::next_u32(&mut b).to_le_bytes();
        let second = Lcg::next_u32(&mut b).to_le_bytes();
        assert_eq!(&bytes[..4], &first);
        assert_eq!(&bytes[4..], &second[..2]);
    }

    proptest! {
        #[test]
        fn prop_int_within_bounds(seed in any::<u32>(), lo in -1000i64..1000, width in 0i64..1000) {
            let hi = lo + width;
            let mut rng = Lcg::new(seed);
            for _ in 0..200 {
                let v = rng.int(lo, hi).unwrap();
                prop_assert!(v >= lo && v <= hi);
            }
        }

        #[test]
        fn prop_shuffle_is_permutation(seed in any::<u32>(), mut items in proptest::collection::vec(0u16..50, 1..64)) {
            let mut rng = Lcg::new(seed);
            let mut sorted = items.clone();
            sorted.sort_unstable();
            rng.shuffle(&mut items).unwrap();
            items.sort_unstable();
            prop_assert_eq!(items, sorted);
        }

        #[test]
        fn prop_same_seed_same_stream(seed in any::<u32>()) {
            let mut a = Lcg::new(seed);
            let mut b = Lcg::new(seed);
            for _ in 0..64 {
                prop_assert_eq!(a.next_u32(), b.next_u32());
            }
        }
    }
}
