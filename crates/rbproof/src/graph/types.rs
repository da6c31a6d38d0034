//! Core graph type, colors, and traversal.
//!
//! - `Rbg`: immutable recursive node with an ordered child list.
//! - `Color`: depth parity (blue at even depth, red at odd depth).
//! - `Walk`: pre-order traversal carrying depth and color.

use std::hash::{Hash, Hasher};
use std::ops::Add;

const DIGEST_SEED: u64 = 0xcbf2_9ce4_8422_2325;
const DIGEST_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Node color, implied by depth parity. The root is blue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Blue,
    Red,
}

impl Color {
    #[inline]
    pub fn at_depth(depth: usize) -> Self {
        if depth % 2 == 0 {
            Color::Blue
        } else {
            Color::Red
        }
    }

    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Color::Blue => Color::Red,
            Color::Red => Color::Blue,
        }
    }
}

/// Red-blue graph: a node with an ordered list of children.
///
/// Invariants:
/// - `size == 1 + Σ children.size` (total node count).
/// - `digest` is an order-sensitive fingerprint of the whole subtree.
/// - Values are never mutated after construction.
#[derive(Clone)]
pub struct Rbg {
    children: Vec<Rbg>,
    size: usize,
    digest: u64,
}

impl Rbg {
    pub fn new(children: Vec<Rbg>) -> Self {
        let size = 1 + children.iter().map(|c| c.size).sum::<usize>();
        let digest = children.iter().fold(
            (DIGEST_SEED ^ children.len() as u64).wrapping_mul(DIGEST_PRIME),
            |h, c| (h ^ c.digest).wrapping_mul(DIGEST_PRIME).rotate_left(23),
        );
        Self {
            children,
            size,
            digest,
        }
    }

    /// Childless node.
    #[inline]
    pub fn leaf() -> Self {
        Self::new(Vec::new())
    }

    /// The two-node axiom graph `B(r)`.
    #[inline]
    pub fn unit() -> Self {
        Self::new(vec![Self::leaf()])
    }

    #[inline]
    pub fn children(&self) -> &[Rbg] {
        &self.children
    }

    #[inline]
    pub fn into_children(self) -> Vec<Rbg> {
        self.children
    }

    /// Number of children (not nodes).
    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Total node count, cached at construction.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn number_of_nodes(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_unit(&self) -> bool {
        self.size == 2
    }

    /// Child at a cyclic index.
    ///
    /// Panics if the graph has no children.
    pub fn at(&self, idx: usize) -> &Rbg {
        assert!(!self.is_empty(), "cyclic index {idx} into a childless graph");
        &self.children[idx % self.children.len()]
    }

    /// The `length` consecutive children starting at `start` (cyclically),
    /// wrapped in a fresh node. `length == 0` yields a leaf.
    pub fn window(&self, start: usize, length: usize) -> Rbg {
        if length == 0 {
            return Rbg::leaf();
        }
        let n = self.children.len();
        assert!(n > 0, "window of length {length} into a childless graph");
        let start = start % n;
        Rbg::new(
            (start..start + length)
                .map(|i| self.children[i % n].clone())
                .collect(),
        )
    }

    /// Non-cyclic append of both child lists under one node.
    pub fn concat(&self, other: &Rbg) -> Rbg {
        let mut children = Vec::with_capacity(self.len() + other.len());
        children.extend_from_slice(&self.children);
        children.extend_from_slice(&other.children);
        Rbg::new(children)
    }

    /// Ordered structural equality (no rotation at any depth).
    pub fn same_shape(&self, other: &Rbg) -> bool {
        self.size == other.size
            && self.digest == other.digest
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_shape(b))
    }

    /// Pre-order traversal with depth and color.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }

    /// Number of leaves of the given color.
    pub fn units(&self, color: Color) -> usize {
        self.walk()
            .filter(|(depth, node)| node.is_empty() && Color::at_depth(*depth) == color)
            .count()
    }

    /// Offset of the lexicographically least rotation of the child digests.
    fn canonical_offset(&self) -> usize {
        let n = self.children.len();
        let rotated = |off: usize| (0..n).map(move |i| self.children[(off + i) % n].digest);
        (1..n).fold(0, |best, off| {
            if rotated(off).lt(rotated(best)) {
                off
            } else {
                best
            }
        })
    }
}

impl Default for Rbg {
    fn default() -> Self {
        Self::leaf()
    }
}

impl PartialEq for Rbg {
    fn eq(&self, other: &Self) -> bool {
        if self.size != other.size || self.len() != other.len() {
            return false;
        }
        let n = self.len();
        if n == 0 {
            return true;
        }
        (0..n).any(|off| {
            (0..n).all(|i| self.children[i].same_shape(&other.children[(i + off) % n]))
        })
    }
}

impl Eq for Rbg {}

impl Hash for Rbg {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size.hash(state);
        let n = self.children.len();
        n.hash(state);
        let off = self.canonical_offset();
        for i in 0..n {
            self.children[(off + i) % n].digest.hash(state);
        }
    }
}

impl Add for Rbg {
    type Output = Rbg;
    fn add(mut self, rhs: Rbg) -> Self::Output {
        self.children.extend(rhs.children);
        Rbg::new(self.children)
    }
}

impl<'a> Add<&'a Rbg> for &'a Rbg {
    type Output = Rbg;
    fn add(self, rhs: &'a Rbg) -> Self::Output {
        self.concat(rhs)
    }
}

/// Pre-order iterator over `(depth, node)`.
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Rbg)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Rbg);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}
