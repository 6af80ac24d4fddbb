use sha2::{Digest, Sha256};

use crate::graph::DecoratedGraph;

/// Computes the cheap invariant signature of a curve as a hex digest.
///
/// The signature covers the vertex count, edge count, sorted genus multiset,
/// and sorted marking set. Isomorphic curves always share a signature, so it
/// is safe to bucket isomorphism-class representatives by it; distinct
/// non-isomorphic curves may collide and are separated by the full engine.
pub fn signature_hash(graph: &DecoratedGraph) -> String {
    let mut hasher = Sha256::new();

    hasher.update((graph.num_vertices() as u64).to_le_bytes());
    hasher.update((graph.num_edges() as u64).to_le_bytes());
    hasher.update((graph.num_legs() as u64).to_le_bytes());

    let mut genera: Vec<u32> = graph
        .vertex_ids()
        .into_iter()
        .filter_map(|vertex| graph.vertex_genus(vertex).ok())
        .collect();
    genera.sort_unstable();
    hasher.update((genera.len() as u64).to_le_bytes());
    for genus in genera {
        hasher.update((genus as u64).to_le_bytes());
    }

    let markings = graph.marking_set();
    hasher.update((markings.len() as u64).to_le_bytes());
    for marking in markings {
        hasher.update(marking.as_raw().to_le_bytes());
    }

    format!("{:x}", hasher.finalize())
}
