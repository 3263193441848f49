//! A skiplist is a way of storing elements in such a way that elements can be efficiently
//! accessed, inserted and removed, all in `O(log(n))` on average.
//!
//! Conceptually, a skiplist resembles something like:
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------> [9] ---------->
//! <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
//! ```
//!
//! where we each node `[x]` has references to nodes further down the list, allowing the algorithm
//! to effectively skip ahead.
//!
//! The [`RankedSkipList`] additionally records, for every link, how many elements the link skips
//! over (its *span*). The spans along any search path add up to the position of the element the
//! path ends at, the same bookkeeping sorted sets in key-value stores rely on for rank queries.
//!
//! Nodes are kept in a slab owned by the list and refer to one another by key, so the forward and
//! backward links never own anything and no `unsafe` code is involved.
//!
//! The list has an associated ordering function which **must** be well-behaved. Specifically,
//! given some ordering function `f(a, b)`, it must satisfy the following properties:
//!
//! - Be well defined: `f(a, b)` should always return the same value
//! - Be anti-symmetric: `f(a, b) == Greater` iff `f(b, a) == Less` and `f(a, b) == Equal == f(b, a)`.
//! - By transitive: If `f(a, b) == Greater` and `f(b, c) == Greater` then `f(a, c) == Greater`.
//!
//! **Failure to satisfy these properties results in elements being lost or misplaced.**

mod level_generator;
mod ranked_skiplist;
mod skipnode;
mod view;

pub use level_generator::{
    DEFAULT_MAX_LEVEL, DEFAULT_P, Geometric, GeometricError, LevelGenerator, MAX_TOTAL_LEVELS,
    Uniform, UniformError,
};
pub use ranked_skiplist::{
    DEFAULT_BLOCK_WIDTH, DEFAULT_SPAN_WIDTH, DuplicateError, NodeId, RankedSkipList,
};
pub use skipnode::{IntoIter, Iter};
