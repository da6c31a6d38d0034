//! Elementary proof steps and the pairwise commutation rule.
//!
//! A step stores the full term list that exists right after it fires and the
//! index in the previous term list where it acted.

use std::fmt;

use crate::graph::{MergeCoords, Rbg};

/// One node of a linear derivation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProofStep {
    /// Inserts a fresh unit graph at `position`.
    Unit { terms: Vec<Rbg>, position: usize },
    /// Replaces the terms at `position` and `position + 1` by their merge at `coords`.
    Merge {
        terms: Vec<Rbg>,
        position: usize,
        coords: MergeCoords,
    },
}

/// A commuted pair: the step that now fires first, then the one that fires second.
pub type Swap = (ProofStep, ProofStep);

fn splice_terms(parent: &[Rbg], at: usize, removed: usize, inserted: Rbg) -> Vec<Rbg> {
    let mut terms = Vec::with_capacity(parent.len() + 1 - removed);
    terms.extend_from_slice(&parent[..at]);
    terms.push(inserted);
    terms.extend_from_slice(&parent[at + removed..]);
    terms
}

impl ProofStep {
    /// Unit introduction at `position` of `parent`.
    ///
    /// Panics if `position > parent.len()`.
    pub fn unit_from_parent(parent: &[Rbg], position: usize) -> Self {
        assert!(
            position <= parent.len(),
            "unit position {position} out of range for {} terms",
            parent.len()
        );
        ProofStep::Unit {
            terms: splice_terms(parent, position, 0, Rbg::unit()),
            position,
        }
    }

    /// Merge of `parent[position]` with `parent[position + 1]`.
    ///
    /// Panics if there is no term pair at `position` or the coordinates are out of range.
    pub fn merge_from_parent(parent: &[Rbg], position: usize, coords: MergeCoords) -> Self {
        assert!(
            position < parent.len().saturating_sub(1),
            "merge position {position} out of range for {} terms",
            parent.len()
        );
        let merged = parent[position].merge(&parent[position + 1], coords);
        ProofStep::Merge {
            terms: splice_terms(parent, position, 2, merged),
            position,
            coords,
        }
    }

    /// Terms right after this step.
    #[inline]
    pub fn terms(&self) -> &[Rbg] {
        match self {
            ProofStep::Unit { terms, .. } | ProofStep::Merge { terms, .. } => terms,
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        match self {
            ProofStep::Unit { position, .. } | ProofStep::Merge { position, .. } => *position,
        }
    }

    #[inline]
    pub fn number_of_premises(&self) -> usize {
        match self {
            ProofStep::Unit { .. } => 0,
            ProofStep::Merge { .. } => 2,
        }
    }

    #[inline]
    pub fn is_unit(&self) -> bool {
        matches!(self, ProofStep::Unit { .. })
    }

    #[inline]
    pub fn is_merge(&self) -> bool {
        matches!(self, ProofStep::Merge { .. })
    }

    /// Fire the same rule (same kind, same coordinates) on `parent` at `position`.
    pub fn refire(&self, parent: &[Rbg], position: usize) -> Self {
        match self {
            ProofStep::Unit { .. } => Self::unit_from_parent(parent, position),
            ProofStep::Merge { coords, .. } => Self::merge_from_parent(parent, position, *coords),
        }
    }

    /// Same rule, moved to `position`, with `terms` as its result.
    fn relocated(&self, terms: Vec<Rbg>, position: usize) -> Self {
        match self {
            ProofStep::Unit { .. } => ProofStep::Unit { terms, position },
            ProofStep::Merge { coords, .. } => ProofStep::Merge {
                terms,
                position,
                coords: *coords,
            },
        }
    }

    /// All ways to swap `previous` (fired on `parent_terms`) with `self` (fired right after it)
    /// while keeping the terms after both steps unchanged.
    ///
    /// An empty result means the pair does not commute; that is not an error.
    pub fn commutes_with_previous(&self, previous: &ProofStep, parent_terms: &[Rbg]) -> Vec<Swap> {
        let pp = previous.position();
        match self {
            ProofStep::Unit { terms, position } => {
                let (first_pos, second_pos) = if *position <= pp {
                    (*position, pp + 1)
                } else {
                    (*position + previous.number_of_premises() - 1, pp)
                };
                vec![(
                    Self::unit_from_parent(parent_terms, first_pos),
                    previous.relocated(terms.clone(), second_pos),
                )]
            }
            ProofStep::Merge {
                terms,
                position,
                coords,
            } => {
                let p = *position;
                if pp < p {
                    let first_pos = p + previous.number_of_premises() - 1;
                    vec![(
                        Self::merge_from_parent(parent_terms, first_pos, *coords),
                        previous.relocated(terms.clone(), pp),
                    )]
                } else if pp > p + 1 {
                    vec![(
                        Self::merge_from_parent(parent_terms, p, *coords),
                        previous.relocated(terms.clone(), pp - 1),
                    )]
                } else if previous.is_merge() {
                    reassociations(terms, p, pp, parent_terms)
                } else {
                    // the merge consumes the unit introduced just before it
                    Vec::new()
                }
            }
        }
    }
}

/// Overlapping merges: search every alternative bracketing of the three terms
/// involved whose outer merge reproduces the known result.
fn reassociations(terms: &[Rbg], p: usize, pp: usize, parent: &[Rbg]) -> Vec<Swap> {
    let same_site = p == pp;
    let first_pos = if same_site { p + 1 } else { p };
    let third = &parent[if same_site { p } else { p + 2 }];
    let target = &terms[p];
    let (b, c) = (&parent[first_pos], &parent[first_pos + 1]);

    let mut swaps = Vec::new();
    for (inner, inner_coords) in b.possible_merges(c) {
        let outer = if same_site {
            third.possible_merges(&inner)
        } else {
            inner.possible_merges(third)
        };
        let matches: Vec<MergeCoords> = outer
            .filter(|(candidate, _)| candidate == target)
            .map(|(_, outer_coords)| outer_coords)
            .collect();
        if matches.is_empty() {
            continue;
        }
        let first_terms = splice_terms(parent, first_pos, 2, inner);
        for outer_coords in matches {
            swaps.push((
                ProofStep::Merge {
                    terms: first_terms.clone(),
                    position: first_pos,
                    coords: inner_coords,
                },
                ProofStep::Merge {
                    terms: terms.to_vec(),
                    position: p,
                    coords: outer_coords,
                },
            ));
        }
    }
    tracing::trace!(same_site, found = swaps.len(), "reassociations");
    swaps
}

impl fmt::Display for ProofStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofStep::Unit { position, .. } => write!(f, "unit[{position}]"),
            ProofStep::Merge {
                position, coords, ..
            } => write!(f, "merge[{position}] at {coords}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(n: usize) -> Vec<Rbg> {
        vec![Rbg::unit(); n]
    }

    #[test]
    fn from_parent_inserts_and_replaces() {
        let step = ProofStep::unit_from_parent(&[], 0);
        assert_eq!(step.terms(), &[Rbg::unit()][..]);
        assert_eq!(step.number_of_premises(), 0);

        let step = ProofStep::merge_from_parent(&units(3), 1, MergeCoords::default());
        assert_eq!(step.terms().len(), 2);
        assert_eq!(step.terms()[1].to_string(), "B(R(b,b),r,r)");
        assert_eq!(step.number_of_premises(), 2);
        assert_eq!(step.to_string(), "merge[1] at (0, 0, 0, 0)");
    }

    #[test]
    #[should_panic(expected = "merge position")]
    fn merge_needs_two_terms() {
        let _ = ProofStep::merge_from_parent(&units(1), 0, MergeCoords::default());
    }

    #[test]
    #[should_panic(expected = "merge position")]
    fn merge_position_does_not_overflow() {
        let _ = ProofStep::merge_from_parent(&units(2), usize::MAX, MergeCoords::default());
    }

    #[test]
    fn unit_commutes_before_later_merge() {
        // parent [u, u]; merge at 0, then unit at 1 (to the right of the merged term)
        let parent = units(2);
        let merge = ProofStep::merge_from_parent(&parent, 0, MergeCoords::default());
        let unit = ProofStep::unit_from_parent(merge.terms(), 1);
        let swaps = unit.commutes_with_previous(&merge, &parent);
        assert_eq!(swaps.len(), 1);
        let (first, second) = &swaps[0];
        assert_eq!(first.position(), 2);
        assert!(first.is_unit());
        assert_eq!(second.position(), 0);
        assert_eq!(second.terms(), unit.terms());
        assert_eq!(second.refire(first.terms(), 0), *second);
    }

    #[test]
    fn disjoint_merges_swap_both_ways() {
        let parent = units(4);
        let left = ProofStep::merge_from_parent(&parent, 0, MergeCoords::default());
        let right = ProofStep::merge_from_parent(left.terms(), 1, MergeCoords::new(0, 1, 0, 1));
        let swaps = right.commutes_with_previous(&left, &parent);
        assert_eq!(swaps.len(), 1);
        let (first, second) = &swaps[0];
        assert_eq!(first.position(), 2);
        assert_eq!(second.position(), 0);
        assert_eq!(second.refire(first.terms(), 0).terms(), right.terms());

        // and back: the right merge fired first, the left one second
        let back = second.commutes_with_previous(first, &parent);
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].0, left);
        assert_eq!(back[0].1, right);
    }

    #[test]
    fn merge_does_not_commute_with_its_unit() {
        let parent = units(1);
        let unit = ProofStep::unit_from_parent(&parent, 1);
        let merge = ProofStep::merge_from_parent(unit.terms(), 0, MergeCoords::default());
        assert!(merge.commutes_with_previous(&unit, &parent).is_empty());
        let unit = ProofStep::unit_from_parent(&parent, 0);
        let merge = ProofStep::merge_from_parent(unit.terms(), 0, MergeCoords::default());
        assert!(merge.commutes_with_previous(&unit, &parent).is_empty());
    }

    #[test]
    fn overlapping_merges_reassociate() {
        let parent = units(3);
        let inner = ProofStep::merge_from_parent(&parent, 0, MergeCoords::default());
        let outer = ProofStep::merge_from_parent(inner.terms(), 0, MergeCoords::new(1, 0, 0, 0));
        assert_eq!(outer.terms()[0].to_string(), "B(R(b,b),r,r,r,R(b,b))");
        let swaps = outer.commutes_with_previous(&inner, &parent);
        assert_eq!(swaps.len(), 1);
        let (first, second) = &swaps[0];
        assert_eq!(
            *first,
            ProofStep::merge_from_parent(&parent, 1, MergeCoords::default())
        );
        assert_eq!(
            *second,
            ProofStep::merge_from_parent(first.terms(), 0, MergeCoords::default())
        );
        assert_eq!(second.terms(), outer.terms());
    }
}
