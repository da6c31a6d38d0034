//! Reachability enumeration over merge depth and exhaustive derivation reconstruction.
//!
//! Purpose
//! - `Proof::enumerate(limit)` computes, depth by depth, every graph derivable from
//!   units with exactly `m` merges, how many ways it is reached, and a backtracking
//!   table recording each `(lhs, rhs, coords)` that produces it.
//! - `Proof::reconstruct` walks that table to rebuild every concrete derivation.
//!
//! Why this design
//! - The table plays the role of a parse chart: a graph is a nonterminal, each entry
//!   a production. It is returned explicitly and owned by the caller.
//! - A graph belongs to the first depth that reaches it. Later depths skip it, but
//!   further productions found at that first depth still append to its entries.

use std::collections::{HashMap, HashSet};

use crate::graph::{MergeCoords, Rbg};

use super::types::Proof;

/// One production: `lhs` merged with `rhs` at `coords`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Derivation {
    pub lhs: Rbg,
    pub rhs: Rbg,
    pub coords: MergeCoords,
}

/// Graph -> every recorded production of it.
pub type Backtrack = HashMap<Rbg, Vec<Derivation>>;

/// Result of [`Proof::enumerate`].
#[derive(Clone, Debug, Default)]
pub struct Enumeration {
    /// `reachable[m]` maps each graph first reached with `m` merges to its multiplicity.
    pub reachable: Vec<HashMap<Rbg, u128>>,
    pub backtrack: Backtrack,
}

impl Enumeration {
    /// Merge depth at which `term` was first reached.
    pub fn depth_of(&self, term: &Rbg) -> Option<usize> {
        self.reachable.iter().position(|layer| layer.contains_key(term))
    }

    /// Number of ways `term` is reached at its depth (0 if unreachable).
    pub fn multiplicity(&self, term: &Rbg) -> u128 {
        self.reachable
            .iter()
            .find_map(|layer| layer.get(term).copied())
            .unwrap_or(0)
    }

    pub fn derivations_of(&self, term: &Rbg) -> &[Derivation] {
        self.backtrack.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Deepest merge count covered.
    pub fn limit(&self) -> usize {
        self.reachable.len().saturating_sub(1)
    }
}

impl Proof {
    /// All graphs derivable with up to `limit` merges, starting from the unit.
    pub fn enumerate(limit: usize) -> Enumeration {
        let unit = Rbg::unit();
        let mut reachable: Vec<HashMap<Rbg, u128>> = vec![HashMap::from([(unit.clone(), 1)])];
        let mut all_reachables = HashSet::from([unit]);
        let mut backtrack = Backtrack::new();

        for m in 1..=limit {
            let mut layer: HashMap<Rbg, u128> = HashMap::new();
            let mut productions = 0usize;
            for p in 0..m {
                for (lhs, &num_lhs) in &reachable[p] {
                    for (rhs, &num_rhs) in &reachable[m - 1 - p] {
                        for (term, coords) in lhs.possible_merges(rhs) {
                            let ways = num_lhs.saturating_mul(num_rhs);
                            if let Some(count) = layer.get_mut(&term) {
                                *count = count.saturating_add(ways);
                            } else if all_reachables.insert(term.clone()) {
                                layer.insert(term.clone(), ways);
                            } else {
                                continue;
                            }
                            productions += 1;
                            backtrack.entry(term).or_default().push(Derivation {
                                lhs: lhs.clone(),
                                rhs: rhs.clone(),
                                coords,
                            });
                        }
                    }
                }
            }
            tracing::debug!(depth = m, terms = layer.len(), productions, "enumerate");
            reachable.push(layer);
        }
        Enumeration {
            reachable,
            backtrack,
        }
    }

    /// Every derivation of `term` placed right after `left`, extending `proof_of_left`
    /// (whose conclusion is expected to end with `left`).
    ///
    /// The unit is derived by introducing it; any other graph by deriving both sides of
    /// one of its productions and merging them. A graph absent from `backtrack` yields
    /// nothing.
    pub fn reconstruct<'a>(
        left: Vec<Rbg>,
        term: &Rbg,
        proof_of_left: Proof,
        backtrack: &'a Backtrack,
    ) -> Box<dyn Iterator<Item = Proof> + 'a> {
        if term.is_unit() {
            let position = left.len();
            return Box::new(std::iter::once(proof_of_left.unit(position)));
        }
        let Some(entries) = backtrack.get(term) else {
            return Box::new(std::iter::empty());
        };
        Box::new(entries.iter().flat_map(move |derivation| {
            let position = left.len();
            let mut with_lhs = left.clone();
            with_lhs.push(derivation.lhs.clone());
            let coords = derivation.coords;
            Self::reconstruct(left.clone(), &derivation.lhs, proof_of_left.clone(), backtrack)
                .flat_map(move |proof_of_lhs| {
                    Self::reconstruct(with_lhs.clone(), &derivation.rhs, proof_of_lhs, backtrack)
                })
                .map(move |proof| proof.merge(position, coords))
        }))
    }

    /// Every derivation of `term` from no hypotheses.
    pub fn derivations<'a>(
        term: &Rbg,
        enumeration: &'a Enumeration,
    ) -> Box<dyn Iterator<Item = Proof> + 'a> {
        Self::reconstruct(Vec::new(), term, Proof::default(), &enumeration.backtrack)
    }
}
