//! An always-ordered skiplist which keeps the span of every link.

use std::{
    cmp::Ordering,
    error, fmt,
    hash::{self, Hash},
    iter,
};

use slab::Slab;
use tracing::{debug, trace};

use crate::{
    level_generator::{DEFAULT_MAX_LEVEL, DEFAULT_P, Geometric, LevelGenerator},
    skipnode::{IntoIter, Iter, Link, SkipNode},
    view::centered,
};

/// Width of a value block in [`RankedSkipList::visualize`].
pub const DEFAULT_BLOCK_WIDTH: usize = 10;

/// Width added to every arrow in [`RankedSkipList::visualize`] to make room
/// for the span label.
pub const DEFAULT_SPAN_WIDTH: usize = 5;

// ////////////////////////////////////////////////////////////////////////////
// Handles and errors
// ////////////////////////////////////////////////////////////////////////////

/// Handle to a node returned by [`RankedSkipList::insert`].
///
/// The handle stays valid until the node is removed. After that it may be
/// recycled for a node inserted later, so holding on to handles of removed
/// values is a logic error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Returned by [`RankedSkipList::insert`] when a value comparing equal to the
/// new one is already stored. The rejected value is handed back untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateError<T>(pub T);

impl<T> DuplicateError<T> {
    /// Returns the value that could not be inserted.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for DuplicateError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an equal value is already present in the list")
    }
}

impl<T: fmt::Debug> error::Error for DuplicateError<T> {}

/// Result of the descending search walk.
struct Path {
    /// Last node visited at each active level before the search stopped.
    update: Vec<usize>,
    /// Distance from the head to `update[i]`, counted in level-0 hops.
    rank: Vec<usize>,
    /// The node holding a value equal to the one searched for.
    found: Option<usize>,
}

// ////////////////////////////////////////////////////////////////////////////
// RankedSkipList
// ////////////////////////////////////////////////////////////////////////////

/// The ranked skiplist stores unique elements such that they are always
/// sorted, with `O(log(n))` expected insertion, removal and search.
///
/// Every forward link carries its span: the number of elements it skips over.
/// Summing the spans along a search path gives the rank of the element the
/// path ends at, which is what makes the structure usable as an
/// order-statistics index.
///
/// The list is built from two functions:
///
/// - a comparison function, which **must** be a total order. It should always
///   return the same result for the same pair, be anti-symmetric and be
///   transitive. Elements comparing [`Equal`][Ordering::Equal] are duplicates,
///   and only the first one is kept.
/// - a formatting function, used only by [`get_all`][Self::get_all] and the
///   visualization.
///
/// The list is not synchronized. Wrap it in a lock to share it between
/// threads.
///
/// # Examples
///
/// ```
/// use ranked_skiplist::RankedSkipList;
///
/// let mut list = RankedSkipList::new(|a: &i32, b: &i32| a.cmp(b), |v: &i32| v.to_string());
/// list.insert(3).unwrap();
/// list.insert(1).unwrap();
/// assert!(list.insert(3).is_err());
///
/// assert_eq!(list.get_all(), ["1", "3"]);
/// assert_eq!(list.remove(&1), Some(1));
/// assert_eq!(list.remove(&1), None);
/// ```
pub struct RankedSkipList<T> {
    // Every node, head included. Links between nodes are keys into this slab.
    nodes: Slab<SkipNode<T>>,
    head: usize,
    tail: Option<usize>,
    len: usize,
    // Number of active levels, i.e. one more than the highest level at which
    // the head has a forward link. Never below 1.
    level: usize,
    level_generator: Box<dyn LevelGenerator>,
    compare: Box<dyn Fn(&T, &T) -> Ordering>,
    format: Box<dyn Fn(&T) -> String>,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<T> RankedSkipList<T> {
    /// Create an empty list ordered by `compare` and displayed with `format`.
    ///
    /// Node heights follow a geometric distribution with
    /// [`DEFAULT_MAX_LEVEL`] levels and promotion probability [`DEFAULT_P`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::RankedSkipList;
    ///
    /// // Longest strings first.
    /// let mut list = RankedSkipList::new(
    ///     |a: &String, b: &String| b.len().cmp(&a.len()).then_with(|| a.cmp(b)),
    ///     String::clone,
    /// );
    /// list.extend(["a".to_owned(), "ccc".to_owned(), "bb".to_owned()]);
    /// assert_eq!(list.get_all(), ["ccc", "bb", "a"]);
    /// ```
    #[inline]
    #[expect(
        clippy::expect_used,
        reason = "The default parameters are statically valid"
    )]
    pub fn new(
        compare: impl Fn(&T, &T) -> Ordering + 'static,
        format: impl Fn(&T) -> String + 'static,
    ) -> Self {
        let generator = Geometric::new(DEFAULT_MAX_LEVEL, DEFAULT_P)
            .expect("default level generator parameters are valid");
        Self::with_level_generator(compare, format, generator)
    }

    /// Create an empty list using `generator` to draw the height of new nodes.
    /// The generator's [`total`][LevelGenerator::total] is the maximum height
    /// of any node.
    ///
    /// # Panics
    ///
    /// Panics if the generator reports zero levels.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::{RankedSkipList, Uniform};
    ///
    /// let list = RankedSkipList::with_level_generator(
    ///     |a: &u8, b: &u8| a.cmp(b),
    ///     |v: &u8| v.to_string(),
    ///     Uniform::new(4).unwrap(),
    /// );
    /// assert_eq!(list.max_level(), 4);
    /// ```
    pub fn with_level_generator(
        compare: impl Fn(&T, &T) -> Ordering + 'static,
        format: impl Fn(&T) -> String + 'static,
        generator: impl LevelGenerator + 'static,
    ) -> Self {
        assert!(
            generator.total() > 0,
            "level generator must provide at least one level"
        );
        let mut nodes = Slab::new();
        let head = nodes.insert(SkipNode::head());
        RankedSkipList {
            nodes,
            head,
            tail: None,
            len: 0,
            level: 1,
            level_generator: Box::new(generator),
            compare: Box::new(compare),
            format: Box::new(format),
        }
    }

    /// Returns the number of elements in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of active levels: one more than the highest level
    /// at which any element is linked from the head.
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns the maximum number of levels a node can reach.
    #[inline]
    pub fn max_level(&self) -> usize {
        self.level_generator.total()
    }

    /// Insert `value` into the list, returning a handle to its node.
    ///
    /// # Errors
    ///
    /// If an element comparing equal to `value` is already stored, nothing
    /// changes and `value` is handed back in a [`DuplicateError`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::RankedSkipList;
    ///
    /// let mut list = RankedSkipList::ordered();
    /// let id = list.insert(5).unwrap();
    /// assert_eq!(list.node(id), Some(&5));
    /// assert_eq!(list.insert(5).unwrap_err().into_inner(), 5);
    /// assert_eq!(list.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<NodeId, DuplicateError<T>> {
        let Path {
            mut update,
            mut rank,
            found,
        } = self.locate(&value);
        if found.is_some() {
            trace!(len = self.len, "rejected duplicate value");
            return Err(DuplicateError(value));
        }

        let total = self.level_generator.total();
        let drawn = self.level_generator.level();
        debug_assert!(drawn < total, "level generator returned {drawn} >= {total}");
        let height = drawn.saturating_add(1).min(total);

        if height > self.level {
            // New top levels are entered straight from the head.
            update.resize(height, self.head);
            rank.resize(height, 0);
            // Levels that were active before and then emptied out keep their
            // slot in the head; reset them along with the brand new ones.
            let len = self.len;
            let head = &mut self.nodes[self.head];
            for i in self.level..height {
                let link = Link {
                    next: None,
                    span: len,
                };
                match head.links.get_mut(i) {
                    Some(existing) => *existing = link,
                    None => head.links.push(link),
                }
            }
            debug!(from = self.level, to = height, "raised active levels");
            self.level = height;
        }

        let id = self.nodes.insert(SkipNode::new(value, height));
        for i in 0..height {
            let pred = update[i];
            // Hops between update[i] and update[0].
            let gap = rank[0] - rank[i];
            let old = self.nodes[pred].links[i];
            self.nodes[id].links[i] = Link {
                next: old.next,
                span: old.span - gap,
            };
            self.nodes[pred].links[i] = Link {
                next: Some(id),
                span: gap + 1,
            };
        }
        for i in height..self.level {
            self.nodes[update[i]].links[i].span += 1;
        }

        let pred = update[0];
        self.nodes[id].prev = (pred != self.head).then_some(pred);
        match self.nodes[id].next() {
            Some(next) => self.nodes[next].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.len += 1;

        trace!(height, rank = rank[0] + 1, len = self.len, "inserted value");
        Ok(NodeId(id))
    }

    /// Removes the element comparing equal to `value` and returns it, or
    /// `None` if there is no such element.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::RankedSkipList;
    ///
    /// let mut list: RankedSkipList<_> = (0..10).collect();
    /// assert_eq!(list.remove(&4), Some(4));
    /// assert_eq!(list.remove(&4), None);
    /// assert_eq!(list.len(), 9);
    /// ```
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let Path {
            update,
            rank,
            found,
        } = self.locate(value);
        let Some(found) = found else {
            trace!(len = self.len, "value to remove not found");
            return None;
        };

        // Taking the node out of the slab first leaves no way to reach it
        // through a stale link while the predecessors are patched.
        let removed = self.nodes.remove(found);
        for (i, &pred) in update.iter().enumerate().take(self.level) {
            let link = &mut self.nodes[pred].links[i];
            if i < removed.height() {
                debug_assert_eq!(link.next, Some(found), "broken link at level {i}");
                link.next = removed.links[i].next;
                link.span = link.span + removed.links[i].span - 1;
            } else {
                link.span -= 1;
            }
        }
        match removed.next() {
            Some(next) => self.nodes[next].prev = removed.prev,
            None => self.tail = removed.prev,
        }
        self.len -= 1;

        let level = self.nodes[self.head].links[..self.level]
            .iter()
            .rposition(|link| link.next.is_some())
            .map_or(1, |i| i + 1);
        if level != self.level {
            debug!(from = self.level, to = level, "lowered active levels");
            self.level = level;
        }

        trace!(
            height = removed.height(),
            rank = rank[0] + 1,
            len = self.len,
            "removed value"
        );
        removed.into_inner()
    }

    /// Returns true if an element comparing equal to `value` is stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::RankedSkipList;
    ///
    /// let list: RankedSkipList<_> = (25..75).collect();
    /// assert!(list.contains(&25));
    /// assert!(!list.contains(&75));
    /// ```
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.locate(value).found.is_some()
    }

    /// Returns the stored element comparing equal to `value`.
    #[inline]
    pub fn get(&self, value: &T) -> Option<&T> {
        self.locate(value).found.and_then(|key| self.value_at(key))
    }

    /// Resolves a handle returned by [`insert`][Self::insert].
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id.0).and_then(|node| node.value.as_ref())
    }

    /// Provides a reference to the smallest element, or `None` if the list is
    /// empty.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.nodes[self.head].next().and_then(|key| self.value_at(key))
    }

    /// Provides a reference to the largest element, or `None` if the list is
    /// empty.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|key| self.value_at(key))
    }

    /// Destroys every node, walking from the last element back to the first,
    /// and returns how many elements were destroyed.
    ///
    /// The list is consumed; build a new one to keep going.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::RankedSkipList;
    ///
    /// let list: RankedSkipList<_> = (0..10).collect();
    /// assert_eq!(list.clear_all(), 10);
    /// ```
    pub fn clear_all(mut self) -> usize {
        let mut destroyed = 0;
        let mut cursor = self.tail;
        while let Some(key) = cursor {
            cursor = self.nodes.remove(key).prev;
            destroyed += 1;
        }
        let _head = self.nodes.remove(self.head);
        debug_assert!(self.nodes.is_empty(), "nodes left after clearing");
        debug!(destroyed, "cleared list");
        destroyed
    }

    /// Returns an iterator over the elements in order.
    ///
    /// The iterator can be reversed to walk the backward links from the
    /// largest element. The list cannot be modified while iterating.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::RankedSkipList;
    ///
    /// let list: RankedSkipList<_> = [3, 1, 2].into_iter().collect();
    /// assert!(list.iter().eq([1, 2, 3].iter()));
    /// assert!(list.iter().rev().eq([3, 2, 1].iter()));
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            first: self.nodes[self.head].next(),
            last: self.tail,
            size: self.len,
        }
    }

    /// Returns every element, in order, rendered with the formatting
    /// function.
    pub fn get_all(&self) -> Vec<String> {
        self.iter().map(|value| (self.format)(value)).collect()
    }

    /// Renders the list as ASCII art, with the default widths.
    ///
    /// See [`visualize_with`][Self::visualize_with].
    #[inline]
    pub fn visualize(&self) -> String {
        self.visualize_with(DEFAULT_BLOCK_WIDTH, DEFAULT_SPAN_WIDTH)
    }

    /// Renders the list as ASCII art.
    ///
    /// There is one row per active level, top level first, starting with an
    /// `L{level}` block. Every link is drawn as an arrow carrying its span,
    /// `span + span_width` columns wide plus the head of the arrow, followed
    /// by the block of the value it leads to. Blocks are `block_width` columns
    /// wide, between `|`, unless the value is wider. Each row ends with a
    /// `NULL` marker. A last `BACK` row draws the backward chain.
    ///
    /// ```text
    /// |    L1    |---2--->|    b     |-->   NULL
    /// |    L0    |--1--->|    a     |--1--->|    b     |-->   NULL
    /// |   BACK   |<--b---|    a     |<--b---|    b     |
    /// ```
    pub fn visualize_with(&self, block_width: usize, span_width: usize) -> String {
        let mut out = String::new();
        for i in (0..self.level).rev() {
            out.push_str(&centered(block_width, &format!("L{i}"), ' ', "|"));
            let mut key = self.head;
            while let Some(next) = self.nodes[key].links[i].next {
                let span = self.nodes[key].links[i].span;
                out.push_str(&centered(span + span_width, &span.to_string(), '-', ""));
                out.push('>');
                out.push_str(&centered(block_width, &self.label(next), ' ', "|"));
                key = next;
            }
            out.push_str("-->");
            out.push_str(&centered(block_width, "NULL", ' ', ""));
            out.push('\n');
        }

        out.push_str(&centered(block_width, "BACK", ' ', "|"));
        let backward: Vec<String> = iter::successors(self.tail, |&key| self.nodes[key].prev)
            .map(|key| self.label(key))
            .collect();
        for label in backward.iter().rev() {
            out.push_str("<--b---");
            out.push_str(&centered(block_width, label, ' ', "|"));
        }
        out.push('\n');
        out
    }
}

impl<T> RankedSkipList<T>
where
    T: Ord + fmt::Display + 'static,
{
    /// Create an empty list using `T`'s natural ordering and its `Display`
    /// implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::RankedSkipList;
    ///
    /// let mut list = RankedSkipList::ordered();
    /// list.extend([3, 1, 2]);
    /// assert_eq!(list.get_all(), ["1", "2", "3"]);
    /// ```
    #[inline]
    pub fn ordered() -> Self {
        Self::new(|a: &T, b: &T| a.cmp(b), |v: &T| v.to_string())
    }
}

// ///////////////////////////////////////////////
// Internal methods
// ///////////////////////////////////////////////

impl<T> RankedSkipList<T> {
    /// Walks down from the top active level, advancing at each level while
    /// the next element is smaller than `value`.
    ///
    /// The recorded path is enough to splice a node in or out without walking
    /// again.
    fn locate(&self, value: &T) -> Path {
        let mut update = vec![self.head; self.level];
        let mut rank = vec![0; self.level];

        let mut key = self.head;
        for i in (0..self.level).rev() {
            rank[i] = if i + 1 == self.level { 0 } else { rank[i + 1] };
            while let Some(next) = self.nodes[key].links[i].next {
                if self.cmp_at(next, value) != Some(Ordering::Less) {
                    break;
                }
                rank[i] += self.nodes[key].links[i].span;
                key = next;
            }
            update[i] = key;
        }

        let found = self.nodes[key]
            .next()
            .filter(|&next| self.cmp_at(next, value) == Some(Ordering::Equal));
        Path {
            update,
            rank,
            found,
        }
    }

    /// Compares the value stored at `key` against `value`. `None` for the
    /// head.
    #[inline]
    fn cmp_at(&self, key: usize, value: &T) -> Option<Ordering> {
        self.value_at(key).map(|stored| (self.compare)(stored, value))
    }

    #[inline]
    fn value_at(&self, key: usize) -> Option<&T> {
        self.nodes[key].value.as_ref()
    }

    fn label(&self, key: usize) -> String {
        self.value_at(key)
            .map_or_else(String::new, |value| (self.format)(value))
    }

    /// Checks the integrity of the list: order, backward links, level chains
    /// and the span of every link.
    #[cfg(test)]
    #[expect(clippy::unwrap_used, clippy::indexing_slicing, reason = "Test helper")]
    pub(crate) fn check(&self) {
        use std::collections::HashMap;

        let head = &self.nodes[self.head];
        assert!((1..=self.max_level()).contains(&self.level));
        assert!(head.height() >= self.level);
        assert_eq!(head.prev, None);

        let chain: Vec<usize> = iter::successors(head.next(), |&key| self.nodes[key].next()).collect();
        assert_eq!(chain.len(), self.len);
        assert_eq!(self.nodes.len(), self.len + 1, "unreachable nodes in the slab");
        assert_eq!(chain.last().copied(), self.tail);

        for (rank, &key) in chain.iter().enumerate() {
            let node = &self.nodes[key];
            assert!(node.height() <= self.level, "node taller than the active levels");
            let expected_prev = rank.checked_sub(1).map(|prev| chain[prev]);
            assert_eq!(node.prev, expected_prev, "backward link at rank {rank}");
            if let Some(&next) = chain.get(rank + 1) {
                let ordering = (self.compare)(
                    self.value_at(key).unwrap(),
                    self.value_at(next).unwrap(),
                );
                assert_eq!(ordering, Ordering::Less, "out of order at rank {rank}");
            }
        }

        let ranks: HashMap<usize, usize> = iter::once((self.head, 0))
            .chain(chain.iter().enumerate().map(|(rank, &key)| (key, rank + 1)))
            .collect();
        for level in 0..self.level {
            let expected: Vec<usize> = chain
                .iter()
                .copied()
                .filter(|&key| self.nodes[key].height() > level)
                .collect();
            let actual: Vec<usize> =
                iter::successors(head.links[level].next, |&key| self.nodes[key].links[level].next)
                    .collect();
            assert_eq!(actual, expected, "chain at level {level}");
        }
        for (&key, &rank) in &ranks {
            let node = &self.nodes[key];
            let levels = if key == self.head { self.level } else { node.height() };
            for (level, link) in node.links[..levels].iter().enumerate() {
                let expected = link.next.map_or(self.len - rank, |next| ranks[&next] - rank);
                assert_eq!(link.span, expected, "span at level {level} from rank {rank}");
            }
        }

        if self.len == 0 {
            assert_eq!(self.level, 1);
        } else {
            assert!(head.links[self.level - 1].next.is_some());
        }
        assert!(head.links[self.level..].iter().all(|link| link.next.is_none()));
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<T> Default for RankedSkipList<T>
where
    T: Ord + fmt::Display + 'static,
{
    #[inline]
    fn default() -> Self {
        Self::ordered()
    }
}

/// This implementation of PartialEq only checks that the *values* are equal; it
/// does not check for equivalence of other features (such as the ordering
/// function and the node heights). Furthermore, this uses `T`'s implementation
/// of PartialEq and *does not* use the list's comparison function.
impl<A, B> PartialEq<RankedSkipList<B>> for RankedSkipList<A>
where
    A: PartialEq<B>,
{
    #[inline]
    fn eq(&self, other: &RankedSkipList<B>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> Eq for RankedSkipList<T> where T: Eq {}

impl<T: Hash> Hash for RankedSkipList<T> {
    #[inline]
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T> Extend<T> for RankedSkipList<T> {
    /// Inserts every element; those comparing equal to an element already
    /// stored are dropped.
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iterable: I) {
        for element in iterable {
            let _duplicate = self.insert(element);
        }
    }
}

impl<T> iter::FromIterator<T> for RankedSkipList<T>
where
    T: Ord + fmt::Display + 'static,
{
    #[inline]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut list = Self::ordered();
        list.extend(iter);
        list
    }
}

impl<T> fmt::Debug for RankedSkipList<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Renders [`RankedSkipList::visualize`].
impl<T> fmt::Display for RankedSkipList<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.visualize())
    }
}

impl<T> IntoIterator for RankedSkipList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let first = self.nodes[self.head].next();
        IntoIter {
            nodes: self.nodes,
            first,
            last: self.tail,
            size: self.len,
        }
    }
}

impl<'a, T> IntoIterator for &'a RankedSkipList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////
