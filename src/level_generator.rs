//! Skiplists use a probabilistic distribution of nodes over the internal
//! levels, whereby the lowest level (level 0) contains all the nodes, and each
//! level $n > 0$ will contain a random subset of the nodes on level `n - 1`.
//!
//! Two distributions are provided:
//!
//! - [`Geometric`]: the chance that a node occupies level $n$ is $p$ times the
//!   chance of occupying level $n-1$. This is what the list uses by default.
//! - [`Uniform`]: every height in `[1, total]` is equally likely. A large share
//!   of the nodes reach the top level, which lengthens searches, but it is
//!   kept for reproducing layouts built by the uniform scheme.
//!
//! Custom generators can be plugged in through [`LevelGenerator`], which is
//! also how tests pin node heights to build a known layout.

mod geometric;
mod uniform;

pub use geometric::{Geometric, GeometricError};
pub use uniform::{Uniform, UniformError};

/// Number of levels used by [`RankedSkipList::new`][crate::RankedSkipList::new].
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// Largest `total` the bundled generators accept. A list of 64 levels already
/// covers more elements than a `usize` can count.
pub const MAX_TOTAL_LEVELS: usize = 64;

/// Probability that a node is promoted to the next level under the default
/// generator.
pub const DEFAULT_P: f64 = 0.25;

// ////////////////////////////////////////////////////////////////////////////
// Level Generator
// ////////////////////////////////////////////////////////////////////////////

/// Upon the insertion of a new node in the list, the node is replicated to high
/// levels with a certain probability as determined by a [`LevelGenerator`].
pub trait LevelGenerator {
    /// The total number of levels that are assumed to exist.
    ///
    /// This is the list's `MAX_LEVEL`: no node is ever taller than this.
    #[must_use]
    fn total(&self) -> usize;

    /// Generate a random level for a new node in the range `[0, total)`.
    ///
    /// A node drawn at level `n` has a height of `n + 1`. This function should
    /// _never_ return a level greater or equal to
    /// [`total`][LevelGenerator::total].
    #[must_use]
    fn level(&mut self) -> usize;
}

impl<G> LevelGenerator for Box<G>
where
    G: LevelGenerator + ?Sized,
{
    #[inline]
    fn total(&self) -> usize {
        (**self).total()
    }

    #[inline]
    fn level(&mut self) -> usize {
        (**self).level()
    }
}
