use slab::Slab;

// ////////////////////////////////////////////////////////////////////////////
// Link
// ////////////////////////////////////////////////////////////////////////////

/// A forward link at one level of a node.
///
/// `next` is the arena key of the next node at this level. `span` is the
/// number of level-0 hops between the owning node and `next`. If there's no
/// next node, the span is the number of nodes after the owning node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Link {
    pub next: Option<usize>,
    pub span: usize,
}

// ////////////////////////////////////////////////////////////////////////////
// SkipNode
// ////////////////////////////////////////////////////////////////////////////

/// SkipNodes make up the list. All of them, head included, live in a slab
/// owned by the list and refer to each other through slab keys, so no node
/// ever owns another.
///
/// A node of height `h` participates in levels `0..h` and has exactly `h`
/// links. Lastly, each node records the key of the immediately previous node
/// so the list can be walked backwards.
#[derive(Debug)]
pub(crate) struct SkipNode<T> {
    // value should never be None, with the sole exception being the head node.
    pub value: Option<T>,
    // The immediately previous element. None for the head and for the first
    // element.
    pub prev: Option<usize>,
    // One link per level the node reaches.
    pub links: Vec<Link>,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<T> SkipNode<T> {
    /// Create a new head node with a single empty level.
    pub fn head() -> Self {
        SkipNode {
            value: None,
            prev: None,
            links: vec![Link::default()],
        }
    }

    /// Create a new node of the given height holding `value`. All links start
    /// out empty.
    pub fn new(value: T, height: usize) -> Self {
        debug_assert!(height > 0, "a node reaches at least level 0");
        SkipNode {
            value: Some(value),
            prev: None,
            links: vec![Link::default(); height],
        }
    }

    /// How many levels this node reaches.
    #[inline]
    pub fn height(&self) -> usize {
        self.links.len()
    }

    /// The next node at level 0.
    #[inline]
    pub fn next(&self) -> Option<usize> {
        self.links[0].next
    }

    /// Consumes the node returning the value it contains.
    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

// /////////////////////////////////
// Iterators
// /////////////////////////////////
// Iterators pop from front and back. There's no need for the head in the
// iterator, so the members are named first and last instead of head/end to
// avoid confusion.

/// Iterator over the values of a
/// [`RankedSkipList`][crate::RankedSkipList], in order.
///
/// The list cannot be modified while the iterator is alive.
pub struct Iter<'a, T> {
    pub(crate) nodes: &'a Slab<SkipNode<T>>,
    pub(crate) first: Option<usize>,
    pub(crate) last: Option<usize>,
    pub(crate) size: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.first?;
        let node = &self.nodes[current];
        if self.last == Some(current) {
            self.first = None;
            self.last = None;
        } else {
            self.first = node.next();
        }
        self.size -= 1;
        node.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.size, Some(self.size))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let current = self.last?;
        let node = &self.nodes[current];
        if self.first == Some(current) {
            self.first = None;
            self.last = None;
        } else {
            self.last = node.prev;
        }
        self.size -= 1;
        node.value.as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

/// Consuming iterator over the values of a
/// [`RankedSkipList`][crate::RankedSkipList], in order.
pub struct IntoIter<T> {
    pub(crate) nodes: Slab<SkipNode<T>>,
    pub(crate) first: Option<usize>,
    pub(crate) last: Option<usize>,
    pub(crate) size: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let current = self.first?;
        let node = self.nodes.remove(current);
        if self.last == Some(current) {
            self.first = None;
            self.last = None;
        } else {
            self.first = node.next();
        }
        self.size -= 1;
        node.into_inner()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.size, Some(self.size))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        let current = self.last?;
        let node = self.nodes.remove(current);
        if self.first == Some(current) {
            self.first = None;
            self.last = None;
        } else {
            self.last = node.prev;
        }
        self.size -= 1;
        node.into_inner()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use slab::Slab;

    use super::{IntoIter, Iter, Link, SkipNode};

    /// Chain `values` at level 0 behind a head node, returning the slab and
    /// the keys of the first and last nodes.
    fn chain(values: &[u32]) -> (Slab<SkipNode<u32>>, Option<usize>, Option<usize>) {
        let mut nodes = Slab::new();
        let head = nodes.insert(SkipNode::head());
        let mut prev = head;
        let mut first = None;
        for &v in values {
            let key = nodes.insert(SkipNode::new(v, 1));
            nodes[prev].links[0] = Link {
                next: Some(key),
                span: 1,
            };
            if prev != head {
                nodes[key].prev = Some(prev);
            }
            if first.is_none() {
                first = Some(key);
            }
            prev = key;
        }
        let last = (prev != head).then_some(prev);
        (nodes, first, last)
    }

    #[test]
    fn new_node() {
        let node = SkipNode::new("a", 3);
        assert_eq!(node.height(), 3);
        assert_eq!(node.prev, None);
        assert!(node.links.iter().all(|l| *l == Link::default()));
        assert_eq!(node.into_inner(), Some("a"));
    }

    #[test]
    fn head_node() {
        let head = SkipNode::<u32>::head();
        assert_eq!(head.height(), 1);
        assert_eq!(head.next(), None);
        assert_eq!(head.into_inner(), None);
    }

    #[test]
    fn iter_both_ends() {
        let (nodes, first, last) = chain(&[1, 2, 3, 4, 5]);
        let iter = Iter {
            nodes: &nodes,
            first,
            last,
            size: 5,
        };
        assert_eq!(iter.clone().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
        assert_eq!(iter.clone().rev().copied().collect::<Vec<_>>(), [5, 4, 3, 2, 1]);

        let mut iter = iter;
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn into_iter_frees_nodes() {
        let (nodes, first, last) = chain(&[1, 2, 3, 4]);
        let mut iter = IntoIter {
            nodes,
            first,
            last,
            size: 4,
        };
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.nodes.len(), 3);
        assert_eq!(iter.by_ref().collect::<Vec<_>>(), [2, 3]);
        // Only the head is left behind.
        assert_eq!(iter.nodes.len(), 1);
    }

    #[test]
    fn empty_iter() {
        let (nodes, first, last) = chain(&[]);
        let mut iter = Iter {
            nodes: &nodes,
            first,
            last,
            size: 0,
        };
        assert_eq!(iter.size_hint(), (0, Some(0)));
        assert_eq!(iter.next(), None);
    }
}
