#![deny(missing_docs)]
//! Decorated multigraph data model for dual graphs of tropical curves.
//!
//! A [`DecoratedGraph`] owns vertices carrying a non-negative genus, unordered
//! edges with optional positive lengths, and legs carrying marking labels that
//! are unique within the graph. The combinatorial genus invariant
//! `genus = Σ vertex genus + |E| − |V| + components` holds at all times and is
//! preserved by the three degeneration moves (`contract`, `split`,
//! `reduce_genus`).

mod generators;
mod graph;
mod hash;
mod serialization;
mod spanning;

pub use generators::gen_random_curve;
pub use graph::{
    Attachment, CloneMap, DecoratedGraph, EdgeView, LegView, SplitOutcome, VertexCharacteristic,
};
pub use hash::signature_hash;
pub use serialization::{
    curve_from_bytes, curve_from_json, curve_to_bytes, curve_to_json, CurvePayload, EdgePayload,
    LegPayload,
};
pub use spanning::SpanningTree;
