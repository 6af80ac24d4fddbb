use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use trop_core::VertexId;
use trop_graph::DecoratedGraph;

use crate::bijections::{candidate_bijections, VertexBijection};

/// Comparison mode for the isomorphism queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IsoPolicy {
    /// When set, edges only match when their length decorations agree
    /// bit-exactly; the default compares combinatorial structure only.
    pub compare_lengths: bool,
}

/// Checks whether a candidate bijection is a structure-preserving
/// isomorphism from `a` to `b`.
///
/// The bijection must cover exactly the vertices of `a` and hit exactly the
/// vertices of `b`; genus, per-pair edge multiplicity (and lengths under the
/// policy), and the exact marking labels at every vertex must be preserved.
pub fn is_isomorphism(
    a: &DecoratedGraph,
    b: &DecoratedGraph,
    bijection: &VertexBijection,
    policy: &IsoPolicy,
) -> bool {
    let domain: BTreeSet<VertexId> = a.vertex_ids().into_iter().collect();
    let codomain: BTreeSet<VertexId> = b.vertex_ids().into_iter().collect();
    if bijection.len() != domain.len() {
        return false;
    }
    let keys: BTreeSet<VertexId> = bijection.keys().copied().collect();
    let values: BTreeSet<VertexId> = bijection.values().copied().collect();
    if keys != domain || values != codomain {
        return false;
    }
    if a.marking_set() != b.marking_set() {
        return false;
    }

    for (&v, &image) in bijection {
        // Lookups cannot fail: both ids were just checked against their
        // graphs.
        let genus = a.vertex_genus(v).unwrap_or(0);
        let image_genus = b.vertex_genus(image).unwrap_or(0);
        if genus != image_genus {
            return false;
        }
        let markings = a.markings_at(v).unwrap_or_default();
        let image_markings = b.markings_at(image).unwrap_or_default();
        if markings != image_markings {
            return false;
        }
    }

    let vertices: Vec<VertexId> = domain.into_iter().collect();
    for (index, &u) in vertices.iter().enumerate() {
        for &v in &vertices[index..] {
            let multiplicity = a.edge_multiplicity(u, v).unwrap_or(0);
            let image_multiplicity = b
                .edge_multiplicity(bijection[&u], bijection[&v])
                .unwrap_or(0);
            if multiplicity != image_multiplicity {
                return false;
            }
            if policy.compare_lengths
                && lengths_between(a, u, v) != lengths_between(b, bijection[&u], bijection[&v])
            {
                return false;
            }
        }
    }
    true
}

/// Sorted multiset of length decorations on the edges joining `u` and `v`,
/// encoded bit-exactly for comparison.
fn lengths_between(graph: &DecoratedGraph, u: VertexId, v: VertexId) -> Vec<Option<u64>> {
    let mut lengths: Vec<Option<u64>> = graph
        .edge_views()
        .into_iter()
        .filter(|view| {
            (view.ends.0 == u && view.ends.1 == v) || (view.ends.0 == v && view.ends.1 == u)
        })
        .map(|view| view.length.map(f64::to_bits))
        .collect();
    lengths.sort_unstable();
    lengths
}

/// Lazily enumerates every isomorphism from `a` to `b`.
///
/// Drives the class-pruned candidate stream through the verifier; callers
/// needing only a decision should prefer [`are_isomorphic`], which stops at
/// the first match. Enumerating `isomorphisms(g, g, ..)` yields the
/// automorphism group of `g`, which collaborators use for symmetry factors.
pub fn isomorphisms<'a>(
    a: &'a DecoratedGraph,
    b: &'a DecoratedGraph,
    policy: IsoPolicy,
) -> impl Iterator<Item = VertexBijection> + 'a {
    candidate_bijections(a, b)
        .into_iter()
        .flatten()
        .filter(move |bijection| is_isomorphism(a, b, bijection, &policy))
}

/// Decides whether two decorated graphs are isomorphic.
///
/// Cheap invariants are compared first (entity counts, marking sets,
/// characteristic multisets); only then is the candidate search started, and
/// it stops at the first valid bijection.
pub fn are_isomorphic(a: &DecoratedGraph, b: &DecoratedGraph, policy: IsoPolicy) -> bool {
    if a.num_vertices() != b.num_vertices()
        || a.num_edges() != b.num_edges()
        || a.num_legs() != b.num_legs()
    {
        return false;
    }
    if a.marking_set() != b.marking_set() {
        return false;
    }
    if a.characteristic_counts() != b.characteristic_counts() {
        return false;
    }
    isomorphisms(a, b, policy).next().is_some()
}

/// Number of automorphisms of a decorated graph (vertex-level).
pub fn automorphism_count(graph: &DecoratedGraph, policy: IsoPolicy) -> u64 {
    isomorphisms(graph, graph, policy).count() as u64
}

/// Ergonomic isomorphism queries directly on [`DecoratedGraph`].
pub trait IsomorphismExt {
    /// Exhaustive class-pruned search without the cheap pre-checks.
    fn is_brute_force_isomorphic_to(&self, other: &DecoratedGraph) -> bool;
    /// Cheap invariants first, then brute force. See [`are_isomorphic`].
    fn is_isomorphic_to(&self, other: &DecoratedGraph) -> bool;
}

impl IsomorphismExt for DecoratedGraph {
    fn is_brute_force_isomorphic_to(&self, other: &DecoratedGraph) -> bool {
        isomorphisms(self, other, IsoPolicy::default())
            .next()
            .is_some()
    }

    fn is_isomorphic_to(&self, other: &DecoratedGraph) -> bool {
        are_isomorphic(self, other, IsoPolicy::default())
    }
}
