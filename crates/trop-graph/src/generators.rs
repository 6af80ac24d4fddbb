use rand::Rng;
use trop_core::rng::RngHandle;
use trop_core::{ErrorInfo, Marking, TropError};

use crate::graph::DecoratedGraph;

const GENUS_STREAM: u64 = 0;
const ENDPOINT_STREAM: u64 = 1;
const LEG_STREAM: u64 = 2;

/// Generates a random decorated curve with deterministic randomness.
///
/// Endpoints are sampled uniformly, so self-loops and parallel edges occur;
/// markings `1..=n_legs` are attached to random vertices. Genera, endpoints,
/// and leg roots draw from separate substreams of the handle, so changing the
/// edge count never shifts the sampled genera. Intended for property tests
/// that need a stream of small reproducible curves.
pub fn gen_random_curve(
    n_vertices: usize,
    n_edges: usize,
    n_legs: usize,
    max_genus: u32,
    rng: &RngHandle,
) -> Result<DecoratedGraph, TropError> {
    if n_vertices == 0 {
        return Err(TropError::InvariantViolation(ErrorInfo::new(
            "empty-graph",
            "the random curve generator requires at least one vertex",
        )));
    }

    let mut graph = DecoratedGraph::new();
    let mut genus_rng = rng.substream(GENUS_STREAM);
    let vertices: Vec<_> = (0..n_vertices)
        .map(|_| graph.add_vertex(genus_rng.gen_range(0..=max_genus)))
        .collect();

    let mut endpoint_rng = rng.substream(ENDPOINT_STREAM);
    for _ in 0..n_edges {
        let first = vertices[endpoint_rng.gen_range(0..n_vertices)];
        let second = vertices[endpoint_rng.gen_range(0..n_vertices)];
        graph.add_edge(first, second, None)?;
    }

    let mut leg_rng = rng.substream(LEG_STREAM);
    for marking in 1..=n_legs as u64 {
        let root = vertices[leg_rng.gen_range(0..n_vertices)];
        graph.add_leg(root, Marking::from_raw(marking))?;
    }

    Ok(graph)
}
