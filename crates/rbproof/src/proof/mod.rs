//! Linear derivations of red-blue graphs and their equivalence up to commutation.
//!
//! Purpose
//! - `ProofStep`: a unit introduction or a merge of two adjacent terms, with the
//!   local rule deciding when two consecutive steps can be swapped.
//! - `Proof`: hypotheses plus a chain of steps; equivalence classes, paths between
//!   equivalent proofs, and lifting of unit introductions.
//! - `Proof::enumerate` / `Proof::reconstruct`: reachability by merge depth and
//!   exhaustive rebuilding of all derivations of a graph.
//!
//! Why this design
//! - Every step stores the full term list it produces, so a proof can be compared,
//!   hashed, and commuted without replaying it.
//! - All searches are lazy and finite; callers bound them by depth or by
//!   truncating the iterators.
//!
//! Code cross-refs: `graph::Rbg::merge`, `graph::Rbg::possible_merges`.

mod equiv;
mod search;
mod step;
mod types;

pub use equiv::EquivalenceClass;
pub use search::{Backtrack, Derivation, Enumeration};
pub use step::{ProofStep, Swap};
pub use types::{Proof, ProofError, Terms};
