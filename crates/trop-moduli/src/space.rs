use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use trop_core::Marking;
use trop_graph::{signature_hash, DecoratedGraph};
use trop_iso::{are_isomorphic, IsoPolicy};

/// Identifier of one stratum (isomorphism-class representative) within a
/// [`ModuliSpace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StratumId(usize);

impl StratumId {
    /// Creates an identifier from its raw index representation.
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw index representation of the identifier.
    pub fn as_raw(&self) -> usize {
        self.0
    }
}

/// The degeneration move that produced a specialization relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// Vertex splitting: one vertex becomes two joined by a fresh edge.
    Split,
    /// Genus reduction: one unit of vertex genus traded for a self-loop.
    ReduceGenus,
}

/// One edge of the specialization poset: `parent` degenerates to `child`
/// under `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Specialization {
    /// The less degenerate stratum the move was applied to.
    pub parent: StratumId,
    /// The move that produced the child.
    pub kind: MoveKind,
    /// The stratum the move produced (up to isomorphism).
    pub child: StratumId,
}

/// The face poset of a tropical moduli space: isomorphism-class
/// representatives bucketed by cheap invariant signature, plus the
/// specialization relation between them.
///
/// Grows monotonically during generation and is immutable afterwards.
#[derive(Debug, Clone)]
pub struct ModuliSpace {
    total_genus: u32,
    markings: BTreeSet<Marking>,
    strata: Vec<DecoratedGraph>,
    buckets: BTreeMap<String, Vec<StratumId>>,
    relations: BTreeSet<Specialization>,
}

impl ModuliSpace {
    pub(crate) fn new(total_genus: u32, markings: BTreeSet<Marking>) -> Self {
        Self {
            total_genus,
            markings,
            strata: Vec::new(),
            buckets: BTreeMap::new(),
            relations: BTreeSet::new(),
        }
    }

    /// The conserved total genus of every stratum in the space.
    pub fn total_genus(&self) -> u32 {
        self.total_genus
    }

    /// The marking label set shared by every stratum.
    pub fn marking_set(&self) -> &BTreeSet<Marking> {
        &self.markings
    }

    /// Number of discovered strata.
    pub fn num_strata(&self) -> usize {
        self.strata.len()
    }

    /// Returns the representative graph of a stratum.
    pub fn stratum(&self, id: StratumId) -> Option<&DecoratedGraph> {
        self.strata.get(id.as_raw())
    }

    /// Iterates over all strata with their identifiers.
    pub fn strata(&self) -> impl Iterator<Item = (StratumId, &DecoratedGraph)> {
        self.strata
            .iter()
            .enumerate()
            .map(|(index, graph)| (StratumId::from_raw(index), graph))
    }

    /// Iterates over the specialization relation in deterministic order.
    pub fn relations(&self) -> impl Iterator<Item = &Specialization> {
        self.relations.iter()
    }

    /// Number of recorded specialization relations.
    pub fn num_relations(&self) -> usize {
        self.relations.len()
    }

    /// Finds the stratum isomorphic to `graph`, if any.
    ///
    /// Only the bucket sharing the cheap invariant signature is searched; the
    /// full engine separates genuine collisions.
    pub fn contains_isomorphic(&self, graph: &DecoratedGraph) -> Option<StratumId> {
        let bucket = self.buckets.get(&signature_hash(graph))?;
        bucket
            .iter()
            .copied()
            .find(|id| are_isomorphic(&self.strata[id.as_raw()], graph, IsoPolicy::default()))
    }

    pub(crate) fn insert_stratum(&mut self, graph: DecoratedGraph) -> StratumId {
        let id = StratumId::from_raw(self.strata.len());
        self.buckets
            .entry(signature_hash(&graph))
            .or_default()
            .push(id);
        self.strata.push(graph);
        id
    }

    pub(crate) fn record_relation(&mut self, parent: StratumId, kind: MoveKind, child: StratumId) {
        self.relations.insert(Specialization {
            parent,
            kind,
            child,
        });
    }
}
