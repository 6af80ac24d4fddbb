#![deny(missing_docs)]
//! Moduli-space generation for decorated dual graphs.
//!
//! Starting from a seed curve, [`ModuliSpaceBuilder`] explores the strata
//! reachable by the two degeneration moves (vertex splitting and genus
//! reduction), deduplicating by isomorphism class and recording the
//! specialization poset between representatives.

mod builder;
mod serialization;
mod space;

pub use builder::{ModuliSpaceBuilder, Traversal};
pub use serialization::{space_from_json, space_to_json, RelationPayload, SpacePayload};
pub use space::{ModuliSpace, MoveKind, Specialization, StratumId};
