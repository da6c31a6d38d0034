//! Random proofs with replay tokens.
//!
//! Purpose
//! - Provide a small, deterministic sampler of well-formed proofs for property
//!   tests and benchmarks of commutation, equivalence and unit lifting.
//!
//! Model
//! - Start from no hypotheses. At each step, with probability `merge_bias`, merge
//!   two adjacent terms at a uniform position with uniform coordinates; otherwise
//!   (or when no merge applies) introduce a unit at a uniform position.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.
//!
//! Code cross-refs: `Proof::unit`, `Proof::merge`, `MergeCoords::all`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::graph::MergeCoords;
use crate::proof::Proof;

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Random proof configuration.
#[derive(Clone, Copy, Debug)]
pub struct RandomProofCfg {
    /// Number of steps drawn.
    pub steps: usize,
    /// Probability of a merge when one is possible. Clamped to [0, 1].
    pub merge_bias: f64,
}

impl Default for RandomProofCfg {
    fn default() -> Self {
        Self {
            steps: 6,
            merge_bias: 0.5,
        }
    }
}

/// Draw a random proof of `cfg.steps` steps. Every draw verifies.
pub fn draw_proof(cfg: RandomProofCfg, tok: ReplayToken) -> Proof {
    let mut rng = tok.to_std_rng();
    let bias = cfg.merge_bias.clamp(0.0, 1.0);
    let mut proof = Proof::default();
    for _ in 0..cfg.steps {
        let terms = proof.conclusion();
        let n = terms.len();
        let merge_at = if n >= 2 && rng.gen_bool(bias) {
            let position = rng.gen_range(0..n - 1);
            let (a, b) = (terms[position].len(), terms[position + 1].len());
            // leaves have no cut start
            (a > 0 && b > 0).then(|| {
                let coords = MergeCoords::new(
                    rng.gen_range(0..a),
                    rng.gen_range(0..=a),
                    rng.gen_range(0..b),
                    rng.gen_range(0..=b),
                );
                (position, coords)
            })
        } else {
            None
        };
        proof = match merge_at {
            Some((position, coords)) => proof.merge(position, coords),
            None => {
                let position = rng.gen_range(0..=n);
                proof.unit(position)
            }
        };
    }
    tracing::trace!(seed = tok.seed, index = tok.index, steps = proof.len(), "draw_proof");
    proof
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reproducible_draw() {
        let cfg = RandomProofCfg {
            steps: 10,
            merge_bias: 0.6,
        };
        let tok = ReplayToken { seed: 42, index: 7 };
        let p1 = draw_proof(cfg, tok);
        let p2 = draw_proof(cfg, tok);
        assert_eq!(p1, p2);
        assert_eq!(p1.len(), 10);
        assert!(p1.verify().is_ok());
    }

    #[test]
    fn bias_extremes() {
        let tok = ReplayToken { seed: 3, index: 0 };
        let units_only = draw_proof(
            RandomProofCfg {
                steps: 5,
                merge_bias: 0.0,
            },
            tok,
        );
        assert!(units_only.steps().iter().all(|s| s.is_unit()));
        assert_eq!(units_only.conclusion().len(), 5);

        let eager = draw_proof(
            RandomProofCfg {
                steps: 5,
                merge_bias: 1.0,
            },
            tok,
        );
        // merges whenever two terms are present, so units and merges alternate
        assert!(eager.steps()[0].is_unit());
        assert!(eager.conclusion().len() <= 2);
    }
}
