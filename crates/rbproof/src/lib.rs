//! Rewriting engine for cyclic multiplicative proof nets.
//!
//! Cross-refs live in doc comments:
//! - `graph`: red-blue graphs, cyclic equality, the merge operator.
//! - `proof`: proof steps, commutation, equivalence classes, reachability search.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - Rendering, report generation and correctness criteria live outside this
//!   crate; they consume `Rbg` and `Proof` values through their public accessors.

pub mod graph;
pub mod proof;
pub mod rand;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use graph::{Color, MergeCoords, Rbg};
pub use proof::{Proof, ProofStep};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::graph::{Color, MergeCoords, MergeError, ParseGraphError, Rbg};
    pub use crate::proof::{
        Backtrack, Derivation, Enumeration, EquivalenceClass, Proof, ProofError, ProofStep,
    };
    pub use crate::rand::{draw_proof, RandomProofCfg, ReplayToken};
}
