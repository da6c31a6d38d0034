//! The merge (splice) operator and its coordinate space.
//!
//! `a.merge(b, (i, j, k, l))` cuts the `j` children of `a` starting at `i` and
//! the `l` children of `b` starting at `k`, joins both fragments under a new
//! red node, and appends what is left of `b`, then what is left of `a`.
//! A cut of exactly one child is unwrapped to that child's own children, and a
//! joined fragment of exactly one element is spliced in without a new node.

use std::fmt;

use super::types::Rbg;

/// Cut coordinates `(i, j, k, l)`: start/length in the left graph, then in the right graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MergeCoords {
    pub i: usize,
    pub j: usize,
    pub k: usize,
    pub l: usize,
}

impl MergeCoords {
    #[inline]
    pub fn new(i: usize, j: usize, k: usize, l: usize) -> Self {
        Self { i, j, k, l }
    }

    /// Every valid coordinate for a left graph with `n` children and a right
    /// graph with `m` children: `i < n`, `j <= n`, `k < m`, `l <= m`.
    pub fn all(n: usize, m: usize) -> impl Iterator<Item = MergeCoords> {
        (0..n).flat_map(move |i| {
            (0..=n).flat_map(move |j| {
                (0..m).flat_map(move |k| (0..=m).map(move |l| MergeCoords::new(i, j, k, l)))
            })
        })
    }
}

impl From<(usize, usize, usize, usize)> for MergeCoords {
    fn from((i, j, k, l): (usize, usize, usize, usize)) -> Self {
        Self::new(i, j, k, l)
    }
}

impl fmt::Display for MergeCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.i, self.j, self.k, self.l)
    }
}

/// Which operand of a merge a cut refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Errors surfaced by `Rbg::try_merge`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// A cut start is not below the child count or a cut length exceeds it.
    CutOutOfRange {
        side: Side,
        start: usize,
        len: usize,
        children: usize,
    },
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::CutOutOfRange {
                side,
                start,
                len,
                children,
            } => write!(
                f,
                "{} cut (start {start}, length {len}) out of range for {children} children",
                match side {
                    Side::Left => "left",
                    Side::Right => "right",
                }
            ),
        }
    }
}

impl std::error::Error for MergeError {}

fn check_cut(side: Side, start: usize, len: usize, children: usize) -> Result<(), MergeError> {
    if start < children && len <= children {
        Ok(())
    } else {
        Err(MergeError::CutOutOfRange {
            side,
            start,
            len,
            children,
        })
    }
}

/// Red unitality: a single-child cut contributes that child's children.
fn unwrap_single(cut: Rbg) -> Vec<Rbg> {
    if cut.len() == 1 {
        cut.into_children()
            .into_iter()
            .flat_map(Rbg::into_children)
            .collect()
    } else {
        vec![cut]
    }
}

impl Rbg {
    /// Checked merge for untrusted coordinates.
    pub fn try_merge(&self, other: &Rbg, coords: MergeCoords) -> Result<Rbg, MergeError> {
        check_cut(Side::Left, coords.i, coords.j, self.len())?;
        check_cut(Side::Right, coords.k, coords.l, other.len())?;
        Ok(self.splice(other, coords))
    }

    /// Merge `self` with `other` at `coords`.
    ///
    /// Panics if `i >= len(self)`, `j > len(self)`, `k >= len(other)` or `l > len(other)`.
    pub fn merge(&self, other: &Rbg, coords: MergeCoords) -> Rbg {
        match self.try_merge(other, coords) {
            Ok(merged) => merged,
            Err(err) => panic!("invalid merge coordinates {coords}: {err}"),
        }
    }

    fn splice(&self, other: &Rbg, coords: MergeCoords) -> Rbg {
        let MergeCoords { i, j, k, l } = coords;
        let mut fragment = unwrap_single(self.window(i, j));
        fragment.extend(unwrap_single(other.window(k, l)));

        let mut children = if fragment.len() == 1 {
            fragment
                .into_iter()
                .flat_map(Rbg::into_children)
                .collect()
        } else {
            vec![Rbg::new(fragment)]
        };
        children.extend(other.window(k + l, other.len() - l).into_children());
        children.extend(self.window(i + j, self.len() - j).into_children());
        Rbg::new(children)
    }

    /// Lazily yields every merge of `self` with `other` together with its coordinates.
    ///
    /// Cost is `O(len(self)² · len(other)²)` merges; meant for exhaustive search.
    pub fn possible_merges<'a>(
        &'a self,
        other: &'a Rbg,
    ) -> impl Iterator<Item = (Rbg, MergeCoords)> + 'a {
        MergeCoords::all(self.len(), other.len()).map(move |c| (self.splice(other, c), c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_space_matches_cross_product() {
        assert_eq!(MergeCoords::all(1, 1).count(), 4);
        assert_eq!(MergeCoords::all(3, 2).count(), 3 * 4 * 2 * 3);
        assert_eq!(MergeCoords::all(0, 5).count(), 0);
        assert!(MergeCoords::all(2, 2).all(|c| c.i < 2 && c.j <= 2 && c.k < 2 && c.l <= 2));
    }

    #[test]
    fn try_merge_rejects_out_of_range_cuts() {
        let unit = Rbg::unit();
        let err = unit
            .try_merge(&unit, MergeCoords::new(1, 0, 0, 0))
            .unwrap_err();
        assert_eq!(
            err,
            MergeError::CutOutOfRange {
                side: Side::Left,
                start: 1,
                len: 0,
                children: 1
            }
        );
        let err = unit
            .try_merge(&unit, MergeCoords::new(0, 0, 0, 2))
            .unwrap_err();
        assert!(matches!(
            err,
            MergeError::CutOutOfRange {
                side: Side::Right,
                ..
            }
        ));
        assert!(err.to_string().contains("right cut"));
    }

    #[test]
    #[should_panic(expected = "invalid merge coordinates")]
    fn merge_fails_fast_on_bad_coordinates() {
        let unit = Rbg::unit();
        let _ = unit.merge(&unit, MergeCoords::new(0, 2, 0, 0));
    }

    #[test]
    fn coords_display_as_tuple() {
        assert_eq!(MergeCoords::new(0, 2, 1, 3).to_string(), "(0, 2, 1, 3)");
        assert_eq!(MergeCoords::from((1, 2, 3, 4)), MergeCoords::new(1, 2, 3, 4));
    }
}
