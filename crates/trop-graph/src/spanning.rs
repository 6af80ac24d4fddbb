//! Spanning trees, fundamental loops, and the core subgraph.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use trop_core::{EdgeId, ErrorInfo, TropError, VertexId};

use crate::graph::DecoratedGraph;

#[derive(Debug, Clone)]
struct TreeNode {
    vertex: VertexId,
    parent: Option<(usize, EdgeId)>,
}

/// Rooted spanning tree of a connected decorated graph.
///
/// Nodes live in an arena with parent indices and the connecting edge tag;
/// ancestor queries walk the parent pointers instead of a live tree of
/// back-references.
#[derive(Debug, Clone)]
pub struct SpanningTree {
    nodes: Vec<TreeNode>,
    index_of: BTreeMap<VertexId, usize>,
}

impl SpanningTree {
    /// Returns the root vertex of the tree.
    pub fn root(&self) -> VertexId {
        self.nodes[0].vertex
    }

    /// Returns the tree edges in discovery order.
    pub fn edges(&self) -> Vec<EdgeId> {
        self.nodes
            .iter()
            .filter_map(|node| node.parent.map(|(_, edge)| edge))
            .collect()
    }

    /// Whether the given edge belongs to the tree.
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.nodes
            .iter()
            .any(|node| node.parent.map(|(_, tree_edge)| tree_edge) == Some(edge))
    }

    /// Edges on the path from `vertex` up to the root, nearest first.
    pub fn ancestor_edges(&self, vertex: VertexId) -> Result<Vec<EdgeId>, TropError> {
        let mut current = *self.index_of.get(&vertex).ok_or_else(|| {
            TropError::InvariantViolation(
                ErrorInfo::new("vertex-not-in-tree", "vertex is not covered by the spanning tree")
                    .with_context("vertex", vertex.index()),
            )
        })?;
        let mut path = Vec::new();
        while let Some((parent, edge)) = self.nodes[current].parent {
            path.push(edge);
            current = parent;
        }
        Ok(path)
    }
}

impl DecoratedGraph {
    /// Builds a spanning tree rooted at the smallest vertex id.
    ///
    /// Self-loops never enter the tree. Fails on disconnected or empty
    /// graphs, where no spanning tree exists.
    pub fn spanning_tree(&self) -> Result<SpanningTree, TropError> {
        let vertices = self.vertex_ids();
        if vertices.is_empty() {
            return Err(TropError::InvariantViolation(ErrorInfo::new(
                "empty-graph",
                "a spanning tree requires at least one vertex",
            )));
        }
        if !self.is_connected() {
            return Err(TropError::InvariantViolation(
                ErrorInfo::new("disconnected", "a spanning tree requires a connected graph")
                    .with_context("components", self.connected_components()),
            ));
        }

        let mut adjacency: BTreeMap<VertexId, Vec<(VertexId, EdgeId)>> = BTreeMap::new();
        for view in self.edge_views() {
            let (a, b) = view.ends;
            if a == b {
                continue;
            }
            adjacency.entry(a).or_default().push((b, view.id));
            adjacency.entry(b).or_default().push((a, view.id));
        }

        let root = vertices[0];
        let mut nodes = vec![TreeNode {
            vertex: root,
            parent: None,
        }];
        let mut index_of = BTreeMap::new();
        index_of.insert(root, 0);
        let mut frontier = VecDeque::from([0usize]);
        while let Some(current) = frontier.pop_front() {
            let vertex = nodes[current].vertex;
            let Some(neighbours) = adjacency.get(&vertex) else {
                continue;
            };
            for (neighbour, edge) in neighbours.clone() {
                if index_of.contains_key(&neighbour) {
                    continue;
                }
                let index = nodes.len();
                nodes.push(TreeNode {
                    vertex: neighbour,
                    parent: Some((current, edge)),
                });
                index_of.insert(neighbour, index);
                frontier.push_back(index);
            }
        }

        Ok(SpanningTree { nodes, index_of })
    }

    /// Returns the unique cycle closed by a non-tree edge.
    ///
    /// The cycle consists of the tree path between the endpoints of `edge`
    /// together with `edge` itself; for a self-loop the cycle is the loop
    /// alone.
    pub fn loop_through(&self, edge: EdgeId) -> Result<Vec<EdgeId>, TropError> {
        let tree = self.spanning_tree()?;
        if tree.contains_edge(edge) {
            return Err(TropError::InvariantViolation(
                ErrorInfo::new(
                    "edge-in-spanning-tree",
                    "only a non-tree edge determines a unique cycle",
                )
                .with_context("edge", edge.index()),
            ));
        }
        let (a, b) = self.edge_endpoints(edge)?;
        let mut path_a = tree.ancestor_edges(a)?;
        let mut path_b = tree.ancestor_edges(b)?;
        // Drop the shared root-ward tail so only the two branch segments
        // remain.
        while let (Some(last_a), Some(last_b)) = (path_a.last(), path_b.last()) {
            if last_a != last_b {
                break;
            }
            path_a.pop();
            path_b.pop();
        }
        path_a.reverse();
        path_a.push(edge);
        path_a.extend(path_b);
        Ok(path_a)
    }

    /// Returns one fundamental cycle per non-tree edge.
    pub fn fundamental_loops(&self) -> Result<Vec<Vec<EdgeId>>, TropError> {
        let tree = self.spanning_tree()?;
        let mut loops = Vec::new();
        for edge in self.edge_ids() {
            if !tree.contains_edge(edge) {
                loops.push(self.loop_through(edge)?);
            }
        }
        Ok(loops)
    }

    /// Returns the core: the graph with legs dropped and genus-0 leaves
    /// pruned repeatedly. Defined for connected graphs of positive genus.
    pub fn core(&self) -> Result<DecoratedGraph, TropError> {
        if self.genus() == 0 {
            return Err(TropError::InvariantViolation(ErrorInfo::new(
                "genus-zero-core",
                "the core is only defined for curves of positive genus",
            )));
        }
        if !self.is_connected() {
            return Err(TropError::InvariantViolation(ErrorInfo::new(
                "disconnected",
                "the core is only defined for connected curves",
            )));
        }

        let (mut core, _) = self.clone_with_map();
        for leg in core.leg_ids() {
            core.remove_leg(leg)?;
        }
        loop {
            let mut pruned = false;
            for vertex in core.vertex_ids() {
                if core.vertex_genus(vertex)? == 0 && core.degree(vertex)? < 2 {
                    for view in core.edge_views() {
                        if view.ends.0 == vertex || view.ends.1 == vertex {
                            core.remove_edge(view.id)?;
                        }
                    }
                    core.remove_vertex(vertex)?;
                    pruned = true;
                }
            }
            if !pruned {
                break;
            }
        }
        Ok(core)
    }
}
