//! Proof equivalence: one-step commutations, class traversal, paths, and unit lifting.
//!
//! The commutation graph can be factorial in the proof length, so every
//! traversal keeps an explicit visited set and never expands a proof twice.

use std::collections::{HashMap, HashSet};

use super::types::Proof;

impl Proof {
    /// Every proof obtained by commuting one adjacent pair of steps.
    pub fn neighbours(&self) -> impl Iterator<Item = Proof> + '_ {
        (0..self.len().saturating_sub(1)).flat_map(move |i| {
            let swaps = self.steps[i + 1]
                .commutes_with_previous(&self.steps[i], self.hypotheses_at_index(i));
            swaps.into_iter().map(move |(first, second)| {
                let mut next = self.clone();
                next.steps[i] = first;
                next.steps[i + 1] = second;
                next
            })
        })
    }

    /// Lazy depth-first traversal of all proofs reachable by repeated commutation,
    /// starting with `self`.
    pub fn equivalence_class(&self) -> EquivalenceClass {
        EquivalenceClass::new(self.clone())
    }

    pub fn equivalent(&self, other: &Proof) -> bool {
        self.equivalence_class().any(|p| p == *other)
    }

    /// One commutation path from `other` to `self` (both ends included), if any.
    pub fn equivalence_path(&self, other: &Proof) -> Option<Vec<Proof>> {
        let mut parent: HashMap<Proof, Option<Proof>> = HashMap::new();
        parent.insert(self.clone(), None);
        let mut stack = vec![self.clone()];
        while let Some(current) = stack.pop() {
            if current == *other {
                let mut path = vec![current];
                while let Some(Some(prev)) = path.last().and_then(|p| parent.get(p)) {
                    path.push(prev.clone());
                }
                tracing::debug!(explored = parent.len(), length = path.len(), "equivalence_path");
                return Some(path);
            }
            for next in current.neighbours() {
                if !parent.contains_key(&next) {
                    parent.insert(next.clone(), Some(current.clone()));
                    stack.push(next);
                }
            }
        }
        tracing::debug!(explored = parent.len(), "equivalence_path: unreachable");
        None
    }

    /// Lift every unit introduction above the first merge and drop them: the result
    /// starts from the terms present once all units are in place and contains only merges.
    pub fn remove_unit_intros(&self) -> Proof {
        let mut current = self.clone();
        let mut passes = 0usize;
        loop {
            let mut swapped = false;
            for i in 0..current.len().saturating_sub(1) {
                if !(current.steps[i].is_merge() && current.steps[i + 1].is_unit()) {
                    continue;
                }
                let swap = current.steps[i + 1]
                    .commutes_with_previous(&current.steps[i], current.hypotheses_at_index(i))
                    .into_iter()
                    .next();
                if let Some((first, second)) = swap {
                    current.steps[i] = first;
                    current.steps[i + 1] = second;
                    swapped = true;
                }
            }
            passes += 1;
            if !swapped {
                break;
            }
        }
        let first_merge = current
            .steps
            .iter()
            .position(|s| s.is_merge())
            .unwrap_or(current.len());
        tracing::trace!(passes, first_merge, "remove_unit_intros");
        Proof {
            hypotheses: current.hypotheses_at_index(first_merge).to_vec(),
            steps: current.steps.split_off(first_merge),
        }
    }
}

/// Iterator over an equivalence class. Owns its visited set.
pub struct EquivalenceClass {
    stack: Vec<Proof>,
    seen: HashSet<Proof>,
}

impl EquivalenceClass {
    fn new(start: Proof) -> Self {
        let mut seen = HashSet::new();
        seen.insert(start.clone());
        Self {
            stack: vec![start],
            seen,
        }
    }

    /// Proofs discovered so far (yielded or still queued).
    pub fn seen(&self) -> &HashSet<Proof> {
        &self.seen
    }
}

impl Iterator for EquivalenceClass {
    type Item = Proof;

    fn next(&mut self) -> Option<Proof> {
        let current = self.stack.pop()?;
        for next in current.neighbours() {
            if self.seen.insert(next.clone()) {
                self.stack.push(next);
            }
        }
        if self.stack.is_empty() {
            tracing::debug!(size = self.seen.len(), "equivalence_class exhausted");
        }
        Some(current)
    }
}
