use serde::{Deserialize, Serialize};
use trop_core::{ErrorInfo, Marking, TropError, VertexId};

use crate::graph::DecoratedGraph;

/// Serializes a curve to a compact binary representation using `bincode`.
pub fn curve_to_bytes(graph: &DecoratedGraph) -> Result<Vec<u8>, TropError> {
    let payload = CurvePayload::from_graph(graph);
    bincode::serialize(&payload)
        .map_err(|err| TropError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a curve from its binary representation.
pub fn curve_from_bytes(bytes: &[u8]) -> Result<DecoratedGraph, TropError> {
    let payload: CurvePayload = bincode::deserialize(bytes)
        .map_err(|err| TropError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    payload.into_graph()
}

/// Serializes a curve to a JSON string.
pub fn curve_to_json(graph: &DecoratedGraph) -> Result<String, TropError> {
    let payload = CurvePayload::from_graph(graph);
    serde_json::to_string_pretty(&payload)
        .map_err(|err| TropError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a curve from a JSON string.
pub fn curve_from_json(json: &str) -> Result<DecoratedGraph, TropError> {
    let payload: CurvePayload = serde_json::from_str(json)
        .map_err(|err| TropError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    payload.into_graph()
}

/// Persisted form of one edge: dense endpoint indices plus optional length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgePayload {
    /// Index of the first endpoint into the payload vertex list.
    pub first: usize,
    /// Index of the second endpoint into the payload vertex list.
    pub second: usize,
    /// Optional positive length decoration.
    pub length: Option<f64>,
}

/// Persisted form of one leg: dense root index plus marking label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegPayload {
    /// Index of the root vertex into the payload vertex list.
    pub root: usize,
    /// Raw marking label.
    pub marking: u64,
}

/// Persisted form of one decorated curve.
///
/// Vertices are stored densely as their genus decorations; edges and legs
/// reference them by position. Restoring a payload always produces a graph
/// with fresh internal identities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurvePayload {
    /// Genus decoration per vertex, densely indexed.
    pub vertices: Vec<u32>,
    /// Edge list referencing the dense vertex indices.
    pub edges: Vec<EdgePayload>,
    /// Leg list referencing the dense vertex indices.
    pub legs: Vec<LegPayload>,
}

impl CurvePayload {
    /// Captures the live entities of a graph in dense persisted form.
    pub fn from_graph(graph: &DecoratedGraph) -> Self {
        let vertex_ids = graph.vertex_ids();
        let position = |id: VertexId| -> usize {
            vertex_ids
                .iter()
                .position(|candidate| *candidate == id)
                .unwrap_or(usize::MAX)
        };
        let vertices = vertex_ids
            .iter()
            .filter_map(|vertex| graph.vertex_genus(*vertex).ok())
            .collect();
        let edges = graph
            .edge_views()
            .into_iter()
            .map(|view| EdgePayload {
                first: position(view.ends.0),
                second: position(view.ends.1),
                length: view.length,
            })
            .collect();
        let legs = graph
            .leg_views()
            .into_iter()
            .map(|view| LegPayload {
                root: position(view.root),
                marking: view.marking.as_raw(),
            })
            .collect();
        Self {
            vertices,
            edges,
            legs,
        }
    }

    /// Rebuilds a graph with fresh identities, validating every reference.
    pub fn into_graph(self) -> Result<DecoratedGraph, TropError> {
        let mut graph = DecoratedGraph::new();
        let ids: Vec<VertexId> = self
            .vertices
            .iter()
            .map(|genus| graph.add_vertex(*genus))
            .collect();
        let resolve = |index: usize| -> Result<VertexId, TropError> {
            ids.get(index).copied().ok_or_else(|| {
                TropError::MalformedData(
                    ErrorInfo::new("unknown-vertex-index", "entry references a missing vertex")
                        .with_context("index", index)
                        .with_context("vertices", ids.len()),
                )
            })
        };
        for edge in self.edges {
            let first = resolve(edge.first)?;
            let second = resolve(edge.second)?;
            graph
                .add_edge(first, second, edge.length)
                .map_err(malformed)?;
        }
        for leg in self.legs {
            let root = resolve(leg.root)?;
            graph
                .add_leg(root, Marking::from_raw(leg.marking))
                .map_err(malformed)?;
        }
        Ok(graph)
    }
}

/// Re-labels construction failures as persisted-data errors, preserving the
/// structured payload.
fn malformed(err: TropError) -> TropError {
    TropError::MalformedData(err.info().clone())
}
