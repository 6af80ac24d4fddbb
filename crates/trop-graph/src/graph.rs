use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use trop_core::{EdgeId, ErrorInfo, GraphStamp, LegId, Marking, TropError, VertexId};

#[derive(Debug, Clone)]
struct VertexRecord {
    alive: bool,
    genus: u32,
}

#[derive(Debug, Clone)]
struct EdgeRecord {
    alive: bool,
    ends: [u32; 2],
    length: Option<f64>,
}

#[derive(Debug, Clone)]
struct LegRecord {
    alive: bool,
    root: u32,
    marking: Marking,
}

/// Isomorphism-invariant profile of a single vertex.
///
/// Two vertices can only correspond under an isomorphism when their
/// characteristics agree, so partitioning by characteristic prunes the
/// brute-force bijection search. The marking list is sorted; legs carry
/// individually identified labels, unlike edges.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexCharacteristic {
    /// Genus decoration of the vertex.
    pub genus: u32,
    /// Number of edge endpoints at the vertex (self-loops counted twice).
    pub edge_degree: usize,
    /// Number of self-loops based at the vertex.
    pub self_loops: usize,
    /// Sorted marking labels of the legs rooted at the vertex.
    pub markings: Vec<Marking>,
}

/// One item incident to a vertex: a specific edge endpoint or a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Attachment {
    /// Endpoint `end` (0 or 1) of the referenced edge. The two ends of a
    /// self-loop appear as two distinct attachments.
    EdgeEnd {
        /// Edge owning the endpoint.
        edge: EdgeId,
        /// Which of the two endpoints, 0 or 1.
        end: u8,
    },
    /// A leg rooted at the vertex.
    Leg(LegId),
}

/// Entities created by a [`DecoratedGraph::split`] call.
#[derive(Debug, Clone, Copy)]
pub struct SplitOutcome {
    /// Vertex that received the first side of the partition.
    pub first: VertexId,
    /// Vertex that received the complementary side.
    pub second: VertexId,
    /// Fresh edge joining the two new vertices.
    pub bridge: EdgeId,
}

/// Correspondence between the entities of a graph and those of its clone.
#[derive(Debug, Clone, Default)]
pub struct CloneMap {
    /// Original vertex id to cloned vertex id.
    pub vertices: BTreeMap<VertexId, VertexId>,
    /// Original edge id to cloned edge id.
    pub edges: BTreeMap<EdgeId, EdgeId>,
    /// Original leg id to cloned leg id.
    pub legs: BTreeMap<LegId, LegId>,
}

/// Read-only description of one edge.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView {
    /// Identifier of the edge.
    pub id: EdgeId,
    /// Unordered endpoint pair (identical for self-loops).
    pub ends: (VertexId, VertexId),
    /// Optional positive length decoration.
    pub length: Option<f64>,
}

/// Read-only description of one leg.
#[derive(Debug, Clone, Copy)]
pub struct LegView {
    /// Identifier of the leg.
    pub id: LegId,
    /// Vertex the leg is rooted at.
    pub root: VertexId,
    /// Marking label, unique within the graph.
    pub marking: Marking,
}

#[derive(Debug, Default)]
struct QueryCache {
    generation: u64,
    genus: Option<u32>,
    components: Option<usize>,
    characteristic_counts: Option<BTreeMap<VertexCharacteristic, usize>>,
}

/// Decorated multigraph with genus-weighted vertices, optional edge lengths,
/// and uniquely labeled legs.
///
/// Entities are owned by the graph that created them; identifiers carry the
/// owning graph's stamp and are rejected with `ForeignReference` elsewhere.
/// Derived quantities are memoized behind a generation counter that every
/// mutator bumps before returning.
#[derive(Debug)]
pub struct DecoratedGraph {
    stamp: GraphStamp,
    vertices: Vec<VertexRecord>,
    edges: Vec<EdgeRecord>,
    legs: Vec<LegRecord>,
    markings: BTreeSet<Marking>,
    generation: u64,
    cache: RefCell<QueryCache>,
}

impl DecoratedGraph {
    /// Creates an empty graph with a fresh stamp.
    pub fn new() -> Self {
        Self {
            stamp: GraphStamp::fresh(),
            vertices: Vec::new(),
            edges: Vec::new(),
            legs: Vec::new(),
            markings: BTreeSet::new(),
            generation: 0,
            cache: RefCell::new(QueryCache::default()),
        }
    }

    /// Returns the stamp identifying this graph instance.
    pub fn stamp(&self) -> GraphStamp {
        self.stamp
    }

    fn touch(&mut self) {
        self.generation += 1;
    }

    fn vid(&self, index: usize) -> VertexId {
        VertexId::new(self.stamp, index as u32)
    }

    fn eid(&self, index: usize) -> EdgeId {
        EdgeId::new(self.stamp, index as u32)
    }

    fn lid(&self, index: usize) -> LegId {
        LegId::new(self.stamp, index as u32)
    }

    fn vertex_index(&self, id: VertexId) -> Result<usize, TropError> {
        if id.stamp() != self.stamp {
            return Err(foreign_error("vertex-from-other-graph", id.index()));
        }
        let index = id.index() as usize;
        match self.vertices.get(index) {
            Some(record) if record.alive => Ok(index),
            _ => Err(foreign_error("unknown-vertex", id.index())),
        }
    }

    fn edge_index(&self, id: EdgeId) -> Result<usize, TropError> {
        if id.stamp() != self.stamp {
            return Err(foreign_error("edge-from-other-graph", id.index()));
        }
        let index = id.index() as usize;
        match self.edges.get(index) {
            Some(record) if record.alive => Ok(index),
            _ => Err(foreign_error("unknown-edge", id.index())),
        }
    }

    fn leg_index(&self, id: LegId) -> Result<usize, TropError> {
        if id.stamp() != self.stamp {
            return Err(foreign_error("leg-from-other-graph", id.index()));
        }
        let index = id.index() as usize;
        match self.legs.get(index) {
            Some(record) if record.alive => Ok(index),
            _ => Err(foreign_error("unknown-leg", id.index())),
        }
    }

    /// Adds a vertex with the given genus decoration.
    pub fn add_vertex(&mut self, genus: u32) -> VertexId {
        let id = self.vid(self.vertices.len());
        self.vertices.push(VertexRecord { alive: true, genus });
        self.touch();
        id
    }

    /// Adds an unordered edge between `first` and `second` (a self-loop when
    /// they coincide), carrying an optional positive length.
    pub fn add_edge(
        &mut self,
        first: VertexId,
        second: VertexId,
        length: Option<f64>,
    ) -> Result<EdgeId, TropError> {
        let a = self.vertex_index(first)?;
        let b = self.vertex_index(second)?;
        if let Some(value) = length {
            if !(value > 0.0) {
                return Err(TropError::InvariantViolation(
                    ErrorInfo::new("nonpositive-length", "edge lengths must be positive")
                        .with_context("length", value),
                ));
            }
        }
        let id = self.eid(self.edges.len());
        self.edges.push(EdgeRecord {
            alive: true,
            ends: [a as u32, b as u32],
            length,
        });
        self.touch();
        Ok(id)
    }

    /// Adds a leg rooted at `vertex` carrying `marking`.
    pub fn add_leg(&mut self, vertex: VertexId, marking: Marking) -> Result<LegId, TropError> {
        let root = self.vertex_index(vertex)?;
        if self.markings.contains(&marking) {
            return Err(TropError::InvalidLabel(
                ErrorInfo::new("duplicate-marking", "marking label already present")
                    .with_context("marking", marking.as_raw()),
            ));
        }
        let id = self.lid(self.legs.len());
        self.legs.push(LegRecord {
            alive: true,
            root: root as u32,
            marking,
        });
        self.markings.insert(marking);
        self.touch();
        Ok(id)
    }

    /// Removes an isolated vertex. Incident edges and legs must be removed
    /// first; cascading deletes would make genus bookkeeping ambiguous.
    pub fn remove_vertex(&mut self, vertex: VertexId) -> Result<(), TropError> {
        let index = self.vertex_index(vertex)?;
        let edge_ends = self
            .edges
            .iter()
            .filter(|record| record.alive)
            .flat_map(|record| record.ends)
            .filter(|&end| end as usize == index)
            .count();
        let leg_roots = self
            .legs
            .iter()
            .filter(|record| record.alive && record.root as usize == index)
            .count();
        if edge_ends > 0 || leg_roots > 0 {
            return Err(TropError::DanglingEdge(
                ErrorInfo::new("vertex-not-isolated", "cannot remove vertex with incident items")
                    .with_context("vertex", vertex.index())
                    .with_context("edge_endpoints", edge_ends)
                    .with_context("legs", leg_roots),
            ));
        }
        self.vertices[index].alive = false;
        self.touch();
        Ok(())
    }

    /// Removes an edge. Endpoint vertices are left in place.
    pub fn remove_edge(&mut self, edge: EdgeId) -> Result<(), TropError> {
        let index = self.edge_index(edge)?;
        self.edges[index].alive = false;
        self.touch();
        Ok(())
    }

    /// Removes a leg, releasing its marking label.
    pub fn remove_leg(&mut self, leg: LegId) -> Result<(), TropError> {
        let index = self.leg_index(leg)?;
        self.legs[index].alive = false;
        let marking = self.legs[index].marking;
        self.markings.remove(&marking);
        self.touch();
        Ok(())
    }

    /// Contracts an edge in place and returns the merged vertex.
    ///
    /// A connecting edge merges its endpoints into one vertex whose genus is
    /// the sum of the two originals; all other incident edges and legs are
    /// reattached to the merged vertex. A self-loop requires `absorb_loops`
    /// and instead removes the loop while bumping the vertex genus by one.
    /// Both forms preserve the total genus.
    pub fn contract(&mut self, edge: EdgeId, absorb_loops: bool) -> Result<VertexId, TropError> {
        let index = self.edge_index(edge)?;
        let [a, b] = self.edges[index].ends;
        if a == b {
            if !absorb_loops {
                return Err(TropError::InvariantViolation(
                    ErrorInfo::new("loop-contraction", "edge is a self-loop")
                        .with_context("edge", edge.index())
                        .with_hint("request genus absorption to fold the loop into the vertex"),
                ));
            }
            self.edges[index].alive = false;
            self.vertices[a as usize].genus += 1;
            self.touch();
            return Ok(self.vid(a as usize));
        }

        let genus = self.vertices[a as usize].genus + self.vertices[b as usize].genus;
        let merged = self.vertices.len() as u32;
        self.vertices.push(VertexRecord { alive: true, genus });
        self.edges[index].alive = false;
        for record in self.edges.iter_mut().filter(|record| record.alive) {
            for end in record.ends.iter_mut() {
                if *end == a || *end == b {
                    *end = merged;
                }
            }
        }
        for record in self.legs.iter_mut().filter(|record| record.alive) {
            if record.root == a || record.root == b {
                record.root = merged;
            }
        }
        self.vertices[a as usize].alive = false;
        self.vertices[b as usize].alive = false;
        self.touch();
        Ok(self.vid(merged as usize))
    }

    /// Splits `vertex` into two vertices joined by a fresh edge.
    ///
    /// `first_side` selects which incident attachments move to the first new
    /// vertex; the rest move to the second. `genus_split` distributes the
    /// original genus between the two sides and must sum to it exactly. The
    /// move preserves the total genus: the bridge edge joins the two halves
    /// without closing a new independent cycle.
    pub fn split(
        &mut self,
        vertex: VertexId,
        first_side: &[Attachment],
        genus_split: (u32, u32),
    ) -> Result<SplitOutcome, TropError> {
        let index = self.vertex_index(vertex)?;
        let genus = self.vertices[index].genus;
        let (g1, g2) = genus_split;
        if g1 + g2 != genus {
            return Err(TropError::InvariantViolation(
                ErrorInfo::new("genus-split-mismatch", "genus split must sum to the vertex genus")
                    .with_context("vertex_genus", genus)
                    .with_context("first", g1)
                    .with_context("second", g2),
            ));
        }

        let incident = self.attachments(vertex)?;
        let incident_set: BTreeSet<Attachment> = incident.iter().copied().collect();
        let mut chosen: BTreeSet<Attachment> = BTreeSet::new();
        for attachment in first_side {
            // Ownership first: an id stamped by another graph is a foreign
            // reference, not a bad partition.
            match attachment {
                Attachment::EdgeEnd { edge, .. } => {
                    self.edge_index(*edge)?;
                }
                Attachment::Leg(leg) => {
                    self.leg_index(*leg)?;
                }
            }
            if !incident_set.contains(attachment) {
                return Err(TropError::InvariantViolation(
                    ErrorInfo::new("attachment-not-incident", "attachment is not incident to the split vertex")
                        .with_context("vertex", vertex.index()),
                ));
            }
            if !chosen.insert(*attachment) {
                return Err(TropError::InvariantViolation(
                    ErrorInfo::new("duplicate-attachment", "attachment listed twice in the partition")
                        .with_context("vertex", vertex.index()),
                ));
            }
        }

        let first = self.vertices.len() as u32;
        self.vertices.push(VertexRecord {
            alive: true,
            genus: g1,
        });
        let second = self.vertices.len() as u32;
        self.vertices.push(VertexRecord {
            alive: true,
            genus: g2,
        });

        for attachment in incident {
            let target = if chosen.contains(&attachment) {
                first
            } else {
                second
            };
            match attachment {
                Attachment::EdgeEnd { edge, end } => {
                    self.edges[edge.index() as usize].ends[end as usize] = target;
                }
                Attachment::Leg(leg) => {
                    self.legs[leg.index() as usize].root = target;
                }
            }
        }

        let bridge = self.eid(self.edges.len());
        self.edges.push(EdgeRecord {
            alive: true,
            ends: [first, second],
            length: None,
        });
        self.vertices[index].alive = false;
        self.touch();
        Ok(SplitOutcome {
            first: self.vid(first as usize),
            second: self.vid(second as usize),
            bridge,
        })
    }

    /// Trades one unit of vertex genus for a self-loop at the vertex.
    ///
    /// Preserves the total genus: the loop raises the first Betti number by
    /// exactly the unit removed from the vertex decoration.
    pub fn reduce_genus(&mut self, vertex: VertexId) -> Result<EdgeId, TropError> {
        let index = self.vertex_index(vertex)?;
        if self.vertices[index].genus == 0 {
            return Err(TropError::InvariantViolation(
                ErrorInfo::new("genus-exhausted", "vertex genus is already zero")
                    .with_context("vertex", vertex.index()),
            ));
        }
        self.vertices[index].genus -= 1;
        let id = self.eid(self.edges.len());
        self.edges.push(EdgeRecord {
            alive: true,
            ends: [index as u32, index as u32],
            length: None,
        });
        self.touch();
        Ok(id)
    }

    /// Returns all live vertex identifiers.
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, record)| record.alive)
            .map(|(index, _)| self.vid(index))
            .collect()
    }

    /// Returns all live edge identifiers.
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, record)| record.alive)
            .map(|(index, _)| self.eid(index))
            .collect()
    }

    /// Returns all live leg identifiers.
    pub fn leg_ids(&self) -> Vec<LegId> {
        self.legs
            .iter()
            .enumerate()
            .filter(|(_, record)| record.alive)
            .map(|(index, _)| self.lid(index))
            .collect()
    }

    /// Returns the genus decoration of a vertex.
    pub fn vertex_genus(&self, vertex: VertexId) -> Result<u32, TropError> {
        let index = self.vertex_index(vertex)?;
        Ok(self.vertices[index].genus)
    }

    /// Returns the unordered endpoint pair of an edge.
    pub fn edge_endpoints(&self, edge: EdgeId) -> Result<(VertexId, VertexId), TropError> {
        let index = self.edge_index(edge)?;
        let [a, b] = self.edges[index].ends;
        Ok((self.vid(a as usize), self.vid(b as usize)))
    }

    /// Returns the optional length of an edge.
    pub fn edge_length(&self, edge: EdgeId) -> Result<Option<f64>, TropError> {
        let index = self.edge_index(edge)?;
        Ok(self.edges[index].length)
    }

    /// Returns the root vertex of a leg.
    pub fn leg_root(&self, leg: LegId) -> Result<VertexId, TropError> {
        let index = self.leg_index(leg)?;
        Ok(self.vid(self.legs[index].root as usize))
    }

    /// Returns the marking label of a leg.
    pub fn leg_marking(&self, leg: LegId) -> Result<Marking, TropError> {
        let index = self.leg_index(leg)?;
        Ok(self.legs[index].marking)
    }

    /// Read-only view over all live edges with endpoints and length.
    pub fn edge_views(&self) -> Vec<EdgeView> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, record)| record.alive)
            .map(|(index, record)| EdgeView {
                id: self.eid(index),
                ends: (
                    self.vid(record.ends[0] as usize),
                    self.vid(record.ends[1] as usize),
                ),
                length: record.length,
            })
            .collect()
    }

    /// Read-only view over all live legs with root and marking.
    pub fn leg_views(&self) -> Vec<LegView> {
        self.legs
            .iter()
            .enumerate()
            .filter(|(_, record)| record.alive)
            .map(|(index, record)| LegView {
                id: self.lid(index),
                root: self.vid(record.root as usize),
                marking: record.marking,
            })
            .collect()
    }

    /// Number of live vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.iter().filter(|record| record.alive).count()
    }

    /// Number of live edges.
    pub fn num_edges(&self) -> usize {
        self.edges.iter().filter(|record| record.alive).count()
    }

    /// Number of live legs.
    pub fn num_legs(&self) -> usize {
        self.legs.iter().filter(|record| record.alive).count()
    }

    /// Number of edge endpoints at a vertex; self-loops count twice.
    pub fn edge_degree(&self, vertex: VertexId) -> Result<usize, TropError> {
        let index = self.vertex_index(vertex)? as u32;
        Ok(self
            .edges
            .iter()
            .filter(|record| record.alive)
            .flat_map(|record| record.ends)
            .filter(|&end| end == index)
            .count())
    }

    /// Number of legs rooted at a vertex.
    pub fn leg_degree(&self, vertex: VertexId) -> Result<usize, TropError> {
        let index = self.vertex_index(vertex)? as u32;
        Ok(self
            .legs
            .iter()
            .filter(|record| record.alive && record.root == index)
            .count())
    }

    /// Total incidence at a vertex: edge endpoints plus legs.
    pub fn degree(&self, vertex: VertexId) -> Result<usize, TropError> {
        Ok(self.edge_degree(vertex)? + self.leg_degree(vertex)?)
    }

    /// Number of self-loops based at a vertex.
    pub fn self_loops_at(&self, vertex: VertexId) -> Result<usize, TropError> {
        let index = self.vertex_index(vertex)? as u32;
        Ok(self
            .edges
            .iter()
            .filter(|record| record.alive && record.ends[0] == index && record.ends[1] == index)
            .count())
    }

    /// Total number of self-loops in the graph.
    pub fn self_loop_count(&self) -> usize {
        self.edges
            .iter()
            .filter(|record| record.alive && record.ends[0] == record.ends[1])
            .count()
    }

    /// Number of live edges whose endpoint pair is `{first, second}`.
    pub fn edge_multiplicity(
        &self,
        first: VertexId,
        second: VertexId,
    ) -> Result<usize, TropError> {
        let a = self.vertex_index(first)? as u32;
        let b = self.vertex_index(second)? as u32;
        Ok(self
            .edges
            .iter()
            .filter(|record| {
                record.alive
                    && ((record.ends[0] == a && record.ends[1] == b)
                        || (record.ends[0] == b && record.ends[1] == a))
            })
            .count())
    }

    /// Sorted marking labels of the legs rooted at a vertex.
    pub fn markings_at(&self, vertex: VertexId) -> Result<Vec<Marking>, TropError> {
        let index = self.vertex_index(vertex)? as u32;
        let mut markings: Vec<Marking> = self
            .legs
            .iter()
            .filter(|record| record.alive && record.root == index)
            .map(|record| record.marking)
            .collect();
        markings.sort_unstable();
        Ok(markings)
    }

    /// The full set of marking labels present in the graph.
    pub fn marking_set(&self) -> BTreeSet<Marking> {
        self.markings.clone()
    }

    /// First Betti number: `|E| − |V| + components`.
    pub fn betti_number(&self) -> usize {
        (self.num_edges() + self.connected_components()) - self.num_vertices()
    }

    /// Number of connected components (memoized).
    pub fn connected_components(&self) -> usize {
        if let Some(components) = self.with_cache(|cache| cache.components) {
            return components;
        }
        let components = self.compute_components();
        self.with_cache(|cache| cache.components = Some(components));
        components
    }

    /// Whether the graph is connected. The empty graph counts as connected.
    pub fn is_connected(&self) -> bool {
        self.connected_components() <= 1
    }

    /// Total combinatorial genus: `Σ vertex genus + first Betti number`
    /// (memoized). Invariant under `contract`, `split`, and `reduce_genus`.
    pub fn genus(&self) -> u32 {
        if let Some(genus) = self.with_cache(|cache| cache.genus) {
            return genus;
        }
        let decoration: u32 = self
            .vertices
            .iter()
            .filter(|record| record.alive)
            .map(|record| record.genus)
            .sum();
        let genus = decoration + self.betti_number() as u32;
        self.with_cache(|cache| cache.genus = Some(genus));
        genus
    }

    /// Returns the characteristic of a vertex.
    pub fn characteristic(&self, vertex: VertexId) -> Result<VertexCharacteristic, TropError> {
        Ok(VertexCharacteristic {
            genus: self.vertex_genus(vertex)?,
            edge_degree: self.edge_degree(vertex)?,
            self_loops: self.self_loops_at(vertex)?,
            markings: self.markings_at(vertex)?,
        })
    }

    /// Multiset of vertex characteristics (memoized). Graphs with different
    /// counts are never isomorphic.
    pub fn characteristic_counts(&self) -> BTreeMap<VertexCharacteristic, usize> {
        if let Some(counts) = self.with_cache(|cache| cache.characteristic_counts.clone()) {
            return counts;
        }
        let mut counts: BTreeMap<VertexCharacteristic, usize> = BTreeMap::new();
        for (characteristic, members) in self.vertices_by_characteristic() {
            counts.insert(characteristic, members.len());
        }
        self.with_cache(|cache| cache.characteristic_counts = Some(counts.clone()));
        counts
    }

    /// Partition of the vertex set into characteristic classes. Every class
    /// is non-empty and classes are keyed deterministically.
    pub fn vertices_by_characteristic(&self) -> BTreeMap<VertexCharacteristic, Vec<VertexId>> {
        let mut classes: BTreeMap<VertexCharacteristic, Vec<VertexId>> = BTreeMap::new();
        for vertex in self.vertex_ids() {
            // vertex_ids only yields live ids of this graph, so the lookups
            // cannot fail
            if let Ok(characteristic) = self.characteristic(vertex) {
                classes.entry(characteristic).or_default().push(vertex);
            }
        }
        classes
    }

    /// All attachments incident to a vertex: every edge endpoint resting on
    /// it (both ends of a self-loop separately) and every leg rooted at it.
    pub fn attachments(&self, vertex: VertexId) -> Result<Vec<Attachment>, TropError> {
        let index = self.vertex_index(vertex)? as u32;
        let mut attachments = Vec::new();
        for (edge_index, record) in self.edges.iter().enumerate() {
            if !record.alive {
                continue;
            }
            for end in 0..2u8 {
                if record.ends[end as usize] == index {
                    attachments.push(Attachment::EdgeEnd {
                        edge: self.eid(edge_index),
                        end,
                    });
                }
            }
        }
        for (leg_index, record) in self.legs.iter().enumerate() {
            if record.alive && record.root == index {
                attachments.push(Attachment::Leg(self.lid(leg_index)));
            }
        }
        Ok(attachments)
    }

    /// Deep clone with fresh identities and an explicit correspondence map.
    ///
    /// The clone receives its own stamp; identifiers of the original are
    /// rejected by the clone and vice versa. Callers that need to track
    /// entities across the copy use the returned map.
    pub fn clone_with_map(&self) -> (DecoratedGraph, CloneMap) {
        let clone = DecoratedGraph {
            stamp: GraphStamp::fresh(),
            vertices: self.vertices.clone(),
            edges: self.edges.clone(),
            legs: self.legs.clone(),
            markings: self.markings.clone(),
            generation: 0,
            cache: RefCell::new(QueryCache::default()),
        };
        let mut map = CloneMap::default();
        for (index, record) in self.vertices.iter().enumerate() {
            if record.alive {
                map.vertices.insert(self.vid(index), clone.vid(index));
            }
        }
        for (index, record) in self.edges.iter().enumerate() {
            if record.alive {
                map.edges.insert(self.eid(index), clone.eid(index));
            }
        }
        for (index, record) in self.legs.iter().enumerate() {
            if record.alive {
                map.legs.insert(self.lid(index), clone.lid(index));
            }
        }
        (clone, map)
    }

    /// Non-destructive contraction: clones the graph, contracts the image of
    /// `edge` there, and returns the contracted clone with the clone map.
    /// Self-loops are absorbed into vertex genus.
    pub fn contraction(&self, edge: EdgeId) -> Result<(DecoratedGraph, CloneMap), TropError> {
        self.edge_index(edge)?;
        let (mut clone, map) = self.clone_with_map();
        let mapped = map.edges[&edge];
        clone.contract(mapped, true)?;
        Ok((clone, map))
    }

    fn with_cache<T>(&self, body: impl FnOnce(&mut QueryCache) -> T) -> T {
        let mut cache = self.cache.borrow_mut();
        if cache.generation != self.generation {
            *cache = QueryCache {
                generation: self.generation,
                ..QueryCache::default()
            };
        }
        body(&mut cache)
    }

    fn compute_components(&self) -> usize {
        let live: Vec<usize> = self
            .vertices
            .iter()
            .enumerate()
            .filter(|(_, record)| record.alive)
            .map(|(index, _)| index)
            .collect();
        if live.is_empty() {
            return 0;
        }
        let mut parent: Vec<usize> = (0..self.vertices.len()).collect();
        for record in self.edges.iter().filter(|record| record.alive) {
            union(
                &mut parent,
                record.ends[0] as usize,
                record.ends[1] as usize,
            );
        }
        let mut roots = BTreeSet::new();
        for index in live {
            roots.insert(find(&mut parent, index));
        }
        roots.len()
    }
}

impl Default for DecoratedGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DecoratedGraph {
    fn clone(&self) -> Self {
        self.clone_with_map().0
    }
}

fn foreign_error(code: &str, index: u32) -> TropError {
    TropError::ForeignReference(
        ErrorInfo::new(code, "entity does not belong to this graph").with_context("index", index),
    )
}

fn find(parent: &mut [usize], index: usize) -> usize {
    if parent[index] != index {
        let root = find(parent, parent[index]);
        parent[index] = root;
    }
    parent[index]
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        parent[rb] = ra;
    }
}
