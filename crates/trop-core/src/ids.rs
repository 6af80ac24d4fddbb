//! Stamped identifiers for decorated-graph entities.
//!
//! Every graph instance receives a unique [`GraphStamp`] when it is created.
//! Vertex, edge, and leg identifiers carry the stamp of the graph that issued
//! them, so an identifier presented to the wrong graph is rejected instead of
//! silently aliasing an unrelated entity.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_STAMP: AtomicU64 = AtomicU64::new(1);

/// Process-unique tag identifying a single graph instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GraphStamp(u64);

impl GraphStamp {
    /// Allocates a stamp never handed out before within this process.
    pub fn fresh() -> Self {
        Self(NEXT_STAMP.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw integer representation of the stamp.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

/// Identifier for a vertex within a decorated graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId {
    stamp: GraphStamp,
    index: u32,
}

/// Identifier for an edge within a decorated graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId {
    stamp: GraphStamp,
    index: u32,
}

/// Identifier for a leg (labeled half-edge) within a decorated graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LegId {
    stamp: GraphStamp,
    index: u32,
}

macro_rules! stamped_id {
    ($name:ident) => {
        impl $name {
            /// Creates an identifier. Only graphs hand these out; callers
            /// should treat identifiers as opaque.
            pub fn new(stamp: GraphStamp, index: u32) -> Self {
                Self { stamp, index }
            }

            /// Returns the stamp of the graph that issued this identifier.
            pub fn stamp(&self) -> GraphStamp {
                self.stamp
            }

            /// Returns the arena index behind this identifier.
            pub fn index(&self) -> u32 {
                self.index
            }
        }
    };
}

stamped_id!(VertexId);
stamped_id!(EdgeId);
stamped_id!(LegId);

/// Marking label carried by a leg. Unique within any one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Marking(u64);

impl Marking {
    /// Creates a marking label from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the label.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}
