#![deny(missing_docs)]
//! Brute-force isomorphism engine for decorated graphs.
//!
//! Candidate bijections are generated lazily as the cartesian product of
//! per-characteristic-class permutations; the class partition is the only
//! pruning and is always applied before any permutation is materialized.
//! Worst-case cost is factorial in the largest class, which is inherent to
//! the problem: no canonical-labeling shortcut is attempted.

/// Lazy candidate-bijection enumeration over characteristic classes.
pub mod bijections;
/// Bijection verification and the isomorphism decision queries.
pub mod engine;

pub use bijections::{candidate_bijections, VertexBijection};
pub use engine::{
    are_isomorphic, automorphism_count, is_isomorphism, isomorphisms, IsoPolicy, IsomorphismExt,
};
