//! Uniform level generator.

use rand::prelude::*;
use thiserror::Error;

use crate::level_generator::{LevelGenerator, MAX_TOTAL_LEVELS};

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Uniform`] level generator.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum UniformError {
    /// The maximum number of levels must be non-zero.
    #[error("max must be non-zero.")]
    ZeroMax,
    /// The maximum number of levels must not exceed [`MAX_TOTAL_LEVELS`].
    #[error("max must be at most 64.")]
    MaxTooLarge,
}

/// A level generator drawing every height in `[1, total]` with equal
/// probability.
///
/// With `total` levels, a fraction `1 / total` of the nodes reach the top
/// level, against `p^(total - 1)` for a [`Geometric`][super::Geometric]
/// generator. Searches therefore degrade towards a linear scan of the top
/// level as the list grows, so this generator only makes sense for small
/// lists or for reproducing layouts.
#[derive(Debug)]
pub struct Uniform {
    /// The total number of levels that are assumed to exist.
    total: usize,
    /// The random number generator.
    rng: SmallRng,
}

impl Uniform {
    /// Create a new uniform level generator over `total` levels.
    ///
    /// # Errors
    ///
    /// `total` must be in `1..=MAX_TOTAL_LEVELS`.
    #[inline]
    pub fn new(total: usize) -> Result<Self, UniformError> {
        Self::with_rng(total, SmallRng::from_rng(&mut rand::rng()))
    }

    /// Same as [`Uniform::new`], with a seeded random number generator.
    ///
    /// # Errors
    ///
    /// See [`Uniform::new`].
    #[inline]
    pub fn with_seed(total: usize, seed: u64) -> Result<Self, UniformError> {
        Self::with_rng(total, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(total: usize, rng: SmallRng) -> Result<Self, UniformError> {
        if total == 0 {
            return Err(UniformError::ZeroMax);
        }
        if total > MAX_TOTAL_LEVELS {
            return Err(UniformError::MaxTooLarge);
        }
        Ok(Uniform { total, rng })
    }
}

impl LevelGenerator for Uniform {
    #[inline]
    fn total(&self) -> usize {
        self.total
    }

    #[inline]
    fn level(&mut self) -> usize {
        self.rng.random_range(0..self.total)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{LevelGenerator, MAX_TOTAL_LEVELS, Uniform, UniformError};

    #[test]
    fn invalid_max() {
        assert_eq!(Uniform::new(0).err(), Some(UniformError::ZeroMax));
        assert_eq!(
            Uniform::with_seed(1 << 40, 1).err(),
            Some(UniformError::MaxTooLarge)
        );
        assert_eq!(
            Uniform::new(MAX_TOTAL_LEVELS + 1).err(),
            Some(UniformError::MaxTooLarge)
        );
        assert!(Uniform::new(MAX_TOTAL_LEVELS).is_ok());
    }

    #[rstest]
    #[case(1)]
    #[case(4)]
    #[case(32)]
    fn covers_every_level(#[case] n: usize) -> Result<()> {
        let mut generator = Uniform::with_seed(n, 7)?;
        assert_eq!(generator.total(), n);
        let mut seen = vec![0_usize; n];
        for _ in 0..10_000 * n {
            seen[generator.level()] += 1;
        }
        // Each level gets close to its fair share.
        for count in seen {
            assert!(count > 8_000, "uneven distribution: {count}");
        }
        Ok(())
    }
}
