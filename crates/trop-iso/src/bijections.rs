use std::collections::BTreeMap;

use itertools::{Either, Itertools};
use trop_core::VertexId;
use trop_graph::DecoratedGraph;

/// A candidate vertex correspondence between two graphs.
pub type VertexBijection = BTreeMap<VertexId, VertexId>;

/// Lazily enumerates every bijection compatible with the characteristic
/// partition, or `None` when the class signatures already rule out an
/// isomorphism.
///
/// Vertices of `a` are listed class by class in key order; for each class the
/// matching class of `b` is permuted, and the cartesian product across
/// classes yields the candidates. The iterator is restartable and never
/// materializes more than one candidate at a time, so a decision query can
/// stop at the first match while an enumeration query can drain it.
pub fn candidate_bijections(
    a: &DecoratedGraph,
    b: &DecoratedGraph,
) -> Option<impl Iterator<Item = VertexBijection>> {
    let classes_a = a.vertices_by_characteristic();
    let classes_b = b.vertices_by_characteristic();
    if classes_a.len() != classes_b.len() {
        return None;
    }
    for (characteristic, members) in &classes_a {
        match classes_b.get(characteristic) {
            Some(image) if image.len() == members.len() => {}
            _ => return None,
        }
    }

    if classes_a.is_empty() {
        // Two empty vertex sets admit exactly the empty bijection.
        return Some(Either::Left(std::iter::once(VertexBijection::new())));
    }

    let domain: Vec<VertexId> = classes_a.values().flatten().copied().collect();
    let factors: Vec<_> = classes_a
        .keys()
        .map(|characteristic| {
            let members = classes_b[characteristic].clone();
            let size = members.len();
            members.into_iter().permutations(size)
        })
        .collect();

    let candidates = factors
        .into_iter()
        .multi_cartesian_product()
        .map(move |image_blocks| {
            let image = image_blocks.into_iter().flatten();
            domain.iter().copied().zip(image).collect::<VertexBijection>()
        });
    Some(Either::Right(candidates))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_signature_mismatch_short_circuits() {
        let mut a = DecoratedGraph::new();
        a.add_vertex(1);
        let mut b = DecoratedGraph::new();
        b.add_vertex(2);
        assert!(candidate_bijections(&a, &b).is_none());
    }

    #[test]
    fn empty_graphs_yield_the_empty_bijection() {
        let a = DecoratedGraph::new();
        let b = DecoratedGraph::new();
        let candidates: Vec<_> = candidate_bijections(&a, &b)
            .expect("empty graphs share an empty class signature")
            .collect();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].is_empty());
    }

    #[test]
    fn candidate_count_is_the_product_of_class_factorials() {
        let mut a = DecoratedGraph::new();
        for _ in 0..3 {
            a.add_vertex(0);
        }
        a.add_vertex(1);
        let mut b = DecoratedGraph::new();
        for _ in 0..3 {
            b.add_vertex(0);
        }
        b.add_vertex(1);
        let candidates = candidate_bijections(&a, &b).expect("signatures match");
        assert_eq!(candidates.count(), 6);
    }
}
