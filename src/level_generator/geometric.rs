//! Geometric level generator.

use rand::prelude::*;
use thiserror::Error;

use crate::level_generator::{LevelGenerator, MAX_TOTAL_LEVELS};

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Geometric`] level generator.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum GeometricError {
    /// The maximum number of levels must be non-zero.
    #[error("max must be non-zero.")]
    ZeroMax,
    /// The maximum number of levels must not exceed [`MAX_TOTAL_LEVELS`].
    #[error("max must be at most 64.")]
    MaxTooLarge,
    /// The probability `$p$` must be in the range `$(0, 1)$`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
}

/// A level generator using a geometric distribution.
///
/// This distribution assumes that if a node is present at some level `$n$`,
/// then the probability that it is present at level `$n+1$` is some constant
/// `$p \in (0, 1)$`. This produces a geometric distribution, albeit truncated
/// at the maximum number of levels allowed.
#[derive(Debug)]
pub struct Geometric {
    /// The total number of levels that are assumed to exist.
    total: usize,
    /// The probability that a node is present in the next level.
    p: f64,
    /// `$p^{\text{total}}$`, cached for the inverse CDF.
    p_total: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl Geometric {
    /// Create a new geometric level generator with `total` number of levels,
    /// and `p` as the probability that a given node is present in the next
    /// level.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1, and `total` must be in
    /// `1..=MAX_TOTAL_LEVELS`.
    #[inline]
    pub fn new(total: usize, p: f64) -> Result<Self, GeometricError> {
        Self::with_rng(total, p, SmallRng::from_rng(&mut rand::rng()))
    }

    /// Same as [`Geometric::new`], but the random number generator is seeded
    /// so the sequence of levels is reproducible.
    ///
    /// # Errors
    ///
    /// See [`Geometric::new`].
    #[inline]
    pub fn with_seed(total: usize, p: f64, seed: u64) -> Result<Self, GeometricError> {
        Self::with_rng(total, p, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(total: usize, p: f64, rng: SmallRng) -> Result<Self, GeometricError> {
        if total == 0 {
            return Err(GeometricError::ZeroMax);
        }
        if total > MAX_TOTAL_LEVELS {
            return Err(GeometricError::MaxTooLarge);
        }
        let Ok(exponent) = i32::try_from(total) else {
            return Err(GeometricError::MaxTooLarge);
        };
        if !(0.0 < p && p < 1.0) {
            return Err(GeometricError::InvalidProbability);
        }
        Ok(Geometric {
            total,
            p,
            p_total: p.powi(exponent),
            rng,
        })
    }
}

impl LevelGenerator for Geometric {
    #[inline]
    fn total(&self) -> usize {
        self.total
    }

    /// Generate a level for a new node using a geometric distribution.
    ///
    /// The level is obtained by sampling from a uniform distribution and
    /// inverting the cumulative distribution function of the truncated
    /// geometric distribution. The probability of reaching at least level
    /// `$n$` is
    ///
    /// ```math
    /// P(L \geq n) = \frac{p^n - p^t}{1 - p^t}
    /// ```
    ///
    /// where `$t$` is the total number of levels. Inverting it for `$n$`
    /// gives:
    ///
    /// ```math
    /// n = \left\lfloor \log_p\left(1 - (1 - p^t) \cdot u\right) \right\rfloor
    /// ```
    ///
    /// where `$u \in [0, 1)$` is a uniformly distributed random variate.
    #[inline]
    #[expect(clippy::float_arithmetic, reason = "Computing inverse CDF")]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "The argument of the logarithm lies in (p^t, 1], so the result is in [0, t)"
    )]
    #[expect(clippy::as_conversions, reason = "No other way to do this")]
    fn level(&mut self) -> usize {
        let u = self.rng.random::<f64>();
        let level = (1.0 - (1.0 - self.p_total) * u).log(self.p).floor() as usize;
        // Rounding can land exactly on `total` when u is close to 1.
        level.min(self.total - 1)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, bail};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{Geometric, GeometricError, LevelGenerator, MAX_TOTAL_LEVELS};

    #[test]
    fn invalid_max() {
        assert_eq!(Geometric::new(0, 0.5).err(), Some(GeometricError::ZeroMax));
    }

    #[test]
    fn too_many_levels() {
        assert_eq!(
            Geometric::new(MAX_TOTAL_LEVELS + 1, 0.5).err(),
            Some(GeometricError::MaxTooLarge)
        );
        assert_eq!(
            Geometric::new(1 << 40, 0.5).err(),
            Some(GeometricError::MaxTooLarge)
        );
        assert!(Geometric::new(MAX_TOTAL_LEVELS, 0.5).is_ok());
    }

    #[test]
    fn invalid_p() {
        assert_eq!(
            Geometric::new(1, 0.0).err(),
            Some(GeometricError::InvalidProbability)
        );
        assert_eq!(
            Geometric::new(1, 1.0).err(),
            Some(GeometricError::InvalidProbability)
        );
        assert_eq!(
            Geometric::new(4, f64::NAN).err(),
            Some(GeometricError::InvalidProbability)
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(GeometricError::ZeroMax.to_string(), "max must be non-zero.");
        assert_eq!(GeometricError::MaxTooLarge.to_string(), "max must be at most 64.");
        assert_eq!(
            GeometricError::InvalidProbability.to_string(),
            "p must be in (0, 1)."
        );
    }

    #[rstest]
    fn new(
        #[values(1, 2, 4, 16)] n: usize,
        #[values(0.1, 0.25, 0.5, 0.9)] p: f64,
    ) -> Result<()> {
        let mut generator = Geometric::new(n, p)?;
        assert_eq!(generator.total(), n);
        for _ in 0..100_000 {
            let level = generator.level();
            assert!((0..n).contains(&level));
        }

        // Make sure that we can produce at least one level-0 node, and one at the
        // maximum level when it is not vanishingly unlikely.
        if !(0..100_000).any(|_| generator.level() == 0) {
            bail!("Failed to generate a level-0 node.");
        }
        if n <= 4 && p >= 0.25 && !(0..1_000_000).any(|_| generator.level() == n - 1) {
            bail!("Failed to generate a level-{} node.", n - 1);
        }

        Ok(())
    }

    #[test]
    fn decays_geometrically() -> Result<()> {
        let mut generator = Geometric::with_seed(8, 0.25, 0x1234_abcd)?;
        let mut counts = [0_usize; 8];
        for _ in 0..200_000 {
            counts[generator.level()] += 1;
        }
        // Roughly three quarters of the nodes stay at the bottom level, and every
        // level is less populated than the one beneath it.
        assert!((140_000..160_000).contains(&counts[0]), "{counts:?}");
        for pair in counts[..4].windows(2) {
            assert!(pair[0] > pair[1], "{counts:?}");
        }
        Ok(())
    }

    #[test]
    fn seeded_is_reproducible() -> Result<()> {
        let mut a = Geometric::with_seed(16, 0.5, 42)?;
        let mut b = Geometric::with_seed(16, 0.5, 42)?;
        let a: Vec<usize> = (0..1000).map(|_| a.level()).collect();
        let b: Vec<usize> = (0..1000).map(|_| b.level()).collect();
        assert_eq!(a, b);
        Ok(())
    }
}
