//! Implicit array-tree span
//!
//! Span = half-open interval [start, end) of leaves.
//! Children via the largest power of two strictly below the length:
//!   Left child:  [start, start + p)
//!   Right child: [start + p, end)
//! This is the external-node tree built in order from an array.

use std::fmt;

/// Array-tree node (implicit - just an interval)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// First leaf (inclusive)
    pub start: usize,

    /// One past the last leaf
    pub end: usize,
}

impl Span {
    /// Root spanning `[0, len)`
    pub fn root(len: usize) -> Self {
        Self { start: 0, end: len }
    }

    /// Check if leaf (unit interval)
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.end - self.start == 1
    }

    /// Interval length
    #[inline]
    pub fn length(&self) -> usize {
        self.end - self.start
    }

    /// Size of the left child: largest power of two ≤ length − 1
    #[inline]
    pub fn split_len(&self) -> usize {
        debug_assert!(self.length() >= 2, "leaf has no split");
        1 << (usize::BITS - 1 - (self.length() - 1).leading_zeros())
    }

    /// Get children via the power-of-two split
    pub fn children(&self) -> (Span, Span) {
        debug_assert!(!self.is_leaf(), "Leaf has no children");

        let mid = self.start + self.split_len();
        (
            Span {
                start: self.start,
                end: mid,
            },
            Span {
                start: mid,
                end: self.end,
            },
        )
    }

    /// Whether `leaf` lies inside this span
    #[inline]
    pub fn contains(&self, leaf: usize) -> bool {
        self.start <= leaf && leaf < self.end
    }

    /// Number of splits from this span down to `leaf`
    pub fn depth_of(&self, leaf: usize) -> usize {
        debug_assert!(self.contains(leaf), "leaf {leaf} outside {self}");

        let mut node = *self;
        let mut depth = 0;
        while !node.is_leaf() {
            let (left, right) = node.children();
            node = if left.contains(leaf) { left } else { right };
            depth += 1;
        }
        depth
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            write!(f, "[{}]", self.start)
        } else {
            write!(f, "[{}, {})", self.start, self.end)
        }
    }
}
