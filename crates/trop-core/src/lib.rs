#![deny(missing_docs)]
//! Core identifiers, errors, and deterministic RNG shared by the tropical
//! moduli engine crates.

pub mod errors;
pub mod ids;
pub mod rng;

pub use errors::{ErrorInfo, TropError};
pub use ids::{EdgeId, GraphStamp, LegId, Marking, VertexId};
pub use rng::{derive_substream_seed, RngHandle};
