//! Red-blue graphs (cyclic sequents) and the merge operator.
//!
//! Purpose
//! - Provide an immutable, structurally compared value type `Rbg` for the
//!   recursive graphs that represent one side of a cyclic sequent.
//! - Provide the single rewriting primitive `Rbg::merge` together with the
//!   exhaustive enumeration `Rbg::possible_merges` used by every search.
//!
//! Why this design
//! - Colors are never stored: the root is blue and colors alternate by depth,
//!   so `Color::at_depth` recovers them for renderers.
//! - Equality is a necklace equivalence on the outermost child list only;
//!   nested lists compare in order. Each node caches an order-sensitive digest
//!   so that hashing can pick a canonical rotation without allocation-heavy
//!   normal forms.
//!
//! Code cross-refs: `proof::ProofStep` (materializes merges), `proof::Proof::enumerate`.

mod merge;
mod notation;
mod types;

pub use merge::{MergeCoords, MergeError, Side};
pub use notation::ParseGraphError;
pub use types::{Color, Rbg, Walk};
