//! JSON documents emitted by the `derive`, `path` and `class` commands.

use rbproof::prelude::*;
use serde::Serialize;

#[derive(Serialize)]
pub struct StepDoc {
    pub kind: &'static str,
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coords: Option<[usize; 4]>,
    pub terms: Vec<String>,
}

#[derive(Serialize)]
pub struct ProofDoc {
    pub hypotheses: Vec<String>,
    pub steps: Vec<StepDoc>,
    pub conclusion: Vec<String>,
}

fn notation(terms: &[Rbg]) -> Vec<String> {
    terms.iter().map(Rbg::to_string).collect()
}

impl From<&Proof> for ProofDoc {
    fn from(proof: &Proof) -> Self {
        let steps = proof
            .steps()
            .iter()
            .map(|step| StepDoc {
                kind: if step.is_unit() { "unit" } else { "merge" },
                position: step.position(),
                coords: match step {
                    ProofStep::Merge { coords, .. } => Some([coords.i, coords.j, coords.k, coords.l]),
                    ProofStep::Unit { .. } => None,
                },
                terms: notation(step.terms()),
            })
            .collect();
        Self {
            hypotheses: notation(proof.hypotheses()),
            steps,
            conclusion: notation(proof.conclusion()),
        }
    }
}

#[derive(Serialize)]
pub struct DerivationsDoc {
    pub term: String,
    pub depth: Option<usize>,
    pub multiplicity: u128,
    pub proofs: Vec<ProofDoc>,
    /// `classes[i]` is the index of the first proof equivalent to proof `i`.
    pub classes: Vec<usize>,
}

#[derive(Serialize)]
pub struct PathDoc {
    pub term: String,
    pub from: usize,
    pub to: usize,
    pub path: Option<Vec<ProofDoc>>,
}

#[derive(Serialize)]
pub struct ClassDoc {
    pub proof: ProofDoc,
    pub size: usize,
    pub truncated: bool,
    pub members: Vec<ProofDoc>,
    pub without_units: ProofDoc,
}
