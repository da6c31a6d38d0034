//! `Proof`: hypotheses plus an ordered list of steps.

use std::fmt;

use crate::graph::{MergeCoords, MergeError, Rbg};

use super::step::ProofStep;

/// Errors surfaced by checked proof construction and replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// A unit cannot be inserted at `position` into `terms` terms.
    UnitPosition { position: usize, terms: usize },
    /// There is no adjacent pair at `position` among `terms` terms.
    MergePosition { position: usize, terms: usize },
    /// The merge coordinates do not fit the two terms.
    Merge { position: usize, source: MergeError },
    /// Replaying step `index` from its hypotheses does not give its stored terms.
    StepMismatch { index: usize },
}

impl fmt::Display for ProofError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofError::UnitPosition { position, terms } => {
                write!(f, "cannot introduce a unit at {position} among {terms} terms")
            }
            ProofError::MergePosition { position, terms } => {
                write!(f, "no adjacent pair at {position} among {terms} terms")
            }
            ProofError::Merge { position, source } => {
                write!(f, "merge at {position}: {source}")
            }
            ProofError::StepMismatch { index } => {
                write!(f, "step {index} does not follow from its hypotheses")
            }
        }
    }
}

impl std::error::Error for ProofError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProofError::Merge { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A sequence of chained proof steps over a hypothesis context.
///
/// Invariant: `steps[i].terms()` is what step `i` produces from `hypotheses_at_index(i)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Proof {
    pub(super) hypotheses: Vec<Rbg>,
    pub(super) steps: Vec<ProofStep>,
}

impl Proof {
    pub fn new(hypotheses: Vec<Rbg>) -> Self {
        Self {
            hypotheses,
            steps: Vec::new(),
        }
    }

    #[inline]
    pub fn hypotheses(&self) -> &[Rbg] {
        &self.hypotheses
    }

    #[inline]
    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Terms after the last step (the hypotheses if there are no steps).
    pub fn conclusion(&self) -> &[Rbg] {
        self.steps
            .last()
            .map(ProofStep::terms)
            .unwrap_or(&self.hypotheses)
    }

    /// Terms right before step `idx` fires.
    pub fn hypotheses_at_index(&self, idx: usize) -> &[Rbg] {
        if idx == 0 {
            &self.hypotheses
        } else {
            self.steps[idx - 1].terms()
        }
    }

    /// Introduce a unit at `position`. Panics if the position is out of range.
    pub fn unit(mut self, position: usize) -> Self {
        let step = ProofStep::unit_from_parent(self.conclusion(), position);
        self.steps.push(step);
        self
    }

    /// Merge the two adjacent conclusion terms at `position`. Panics on bad input.
    pub fn merge(mut self, position: usize, coords: impl Into<MergeCoords>) -> Self {
        let step = ProofStep::merge_from_parent(self.conclusion(), position, coords.into());
        self.steps.push(step);
        self
    }

    /// Append an already built step. The caller keeps the chaining invariant.
    pub fn add_step(&mut self, step: ProofStep) {
        self.steps.push(step);
    }

    pub fn try_unit(&mut self, position: usize) -> Result<(), ProofError> {
        let terms = self.conclusion().len();
        if position > terms {
            return Err(ProofError::UnitPosition { position, terms });
        }
        let step = ProofStep::unit_from_parent(self.conclusion(), position);
        self.steps.push(step);
        Ok(())
    }

    pub fn try_merge(&mut self, position: usize, coords: MergeCoords) -> Result<(), ProofError> {
        let parent = self.conclusion();
        if position >= parent.len().saturating_sub(1) {
            return Err(ProofError::MergePosition {
                position,
                terms: parent.len(),
            });
        }
        parent[position]
            .try_merge(&parent[position + 1], coords)
            .map_err(|source| ProofError::Merge { position, source })?;
        let step = ProofStep::merge_from_parent(parent, position, coords);
        self.steps.push(step);
        Ok(())
    }

    /// Replay every step from its hypotheses and check the stored terms.
    pub fn verify(&self) -> Result<(), ProofError> {
        for (index, step) in self.steps.iter().enumerate() {
            let parent = self.hypotheses_at_index(index);
            let position = step.position();
            let replayed = match step {
                ProofStep::Unit { .. } if position > parent.len() => {
                    return Err(ProofError::UnitPosition {
                        position,
                        terms: parent.len(),
                    })
                }
                ProofStep::Merge { .. } if position >= parent.len().saturating_sub(1) => {
                    return Err(ProofError::MergePosition {
                        position,
                        terms: parent.len(),
                    })
                }
                ProofStep::Merge { coords, .. } => {
                    parent[position]
                        .try_merge(&parent[position + 1], *coords)
                        .map_err(|source| ProofError::Merge { position, source })?;
                    step.refire(parent, position)
                }
                ProofStep::Unit { .. } => step.refire(parent, position),
            };
            if replayed.terms() != step.terms() {
                return Err(ProofError::StepMismatch { index });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", Terms(&self.hypotheses))?;
        for step in &self.steps {
            writeln!(f, "{step}")?;
            writeln!(f, "{}", Terms(step.terms()))?;
        }
        Ok(())
    }
}

/// Displays a term list as `(t0, t1, ...)`.
pub struct Terms<'a>(pub &'a [Rbg]);

impl fmt::Display for Terms<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (idx, term) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{term}")?;
        }
        write!(f, ")")
    }
}
