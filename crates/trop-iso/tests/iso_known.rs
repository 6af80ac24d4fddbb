use trop_core::{Marking, TropError};
use trop_graph::DecoratedGraph;
use trop_iso::{are_isomorphic, automorphism_count, IsoPolicy, IsomorphismExt};

fn banana(lengths: (Option<f64>, Option<f64>)) -> Result<DecoratedGraph, TropError> {
    let mut graph = DecoratedGraph::new();
    let a = graph.add_vertex(0);
    let b = graph.add_vertex(1);
    graph.add_edge(a, b, lengths.0)?;
    graph.add_edge(a, b, lengths.1)?;
    Ok(graph)
}

#[test]
fn parallel_edges_match_regardless_of_insertion_order() -> Result<(), TropError> {
    let a = banana((Some(1.0), Some(2.0)))?;
    let b = banana((Some(2.0), Some(1.0)))?;
    assert!(a.is_isomorphic_to(&b));
    assert!(a.is_brute_force_isomorphic_to(&b));
    Ok(())
}

#[test]
fn genus_decorations_distinguish() -> Result<(), TropError> {
    let mut a = DecoratedGraph::new();
    let va = a.add_vertex(1);
    a.add_edge(va, va, None)?;
    let mut b = DecoratedGraph::new();
    let vb = b.add_vertex(2);
    b.add_edge(vb, vb, None)?;
    assert!(!a.is_isomorphic_to(&b));
    Ok(())
}

#[test]
fn loop_and_parallel_pair_are_not_confused() -> Result<(), TropError> {
    // Same vertex, edge, and leg counts; different incidence structure.
    let mut a = DecoratedGraph::new();
    let u = a.add_vertex(0);
    let v = a.add_vertex(0);
    a.add_edge(u, u, None)?;
    a.add_edge(u, v, None)?;

    let b = banana((None, None))?;
    assert_eq!(a.genus(), b.genus());
    assert!(!a.is_isomorphic_to(&b));
    Ok(())
}

#[test]
fn leg_marking_labels_must_match_exactly() -> Result<(), TropError> {
    // Asymmetric host so only the identity vertex map is available: the
    // swapped labels cannot be repaired by a different bijection.
    let build = |first: u64, second: u64| -> Result<DecoratedGraph, TropError> {
        let mut graph = DecoratedGraph::new();
        let heavy = graph.add_vertex(1);
        let light = graph.add_vertex(0);
        graph.add_edge(heavy, light, None)?;
        graph.add_edge(heavy, light, None)?;
        graph.add_leg(heavy, Marking::from_raw(first))?;
        graph.add_leg(light, Marking::from_raw(second))?;
        Ok(graph)
    };
    let a = build(1, 2)?;
    let b = build(1, 2)?;
    let swapped = build(2, 1)?;
    assert!(a.is_isomorphic_to(&b));
    assert!(!a.is_isomorphic_to(&swapped));
    Ok(())
}

#[test]
fn disjoint_marking_sets_never_match() -> Result<(), TropError> {
    let mut a = DecoratedGraph::new();
    let va = a.add_vertex(0);
    a.add_leg(va, Marking::from_raw(1))?;
    let mut b = DecoratedGraph::new();
    let vb = b.add_vertex(0);
    b.add_leg(vb, Marking::from_raw(9))?;
    assert!(!a.is_isomorphic_to(&b));
    Ok(())
}

#[test]
fn lengths_only_matter_under_the_policy() -> Result<(), TropError> {
    let a = banana((Some(1.0), Some(2.0)))?;
    let b = banana((Some(1.0), Some(3.0)))?;
    assert!(are_isomorphic(&a, &b, IsoPolicy::default()));
    let strict = IsoPolicy {
        compare_lengths: true,
    };
    assert!(!are_isomorphic(&a, &b, strict));
    let c = banana((Some(2.0), Some(1.0)))?;
    assert!(are_isomorphic(&a, &c, strict));
    Ok(())
}

#[test]
fn triangle_has_six_vertex_automorphisms() -> Result<(), TropError> {
    let mut graph = DecoratedGraph::new();
    let a = graph.add_vertex(0);
    let b = graph.add_vertex(0);
    let c = graph.add_vertex(0);
    graph.add_edge(a, b, None)?;
    graph.add_edge(b, c, None)?;
    graph.add_edge(c, a, None)?;
    assert_eq!(automorphism_count(&graph, IsoPolicy::default()), 6);
    Ok(())
}

#[test]
fn theta_graph_has_two_vertex_automorphisms() -> Result<(), TropError> {
    let mut graph = DecoratedGraph::new();
    let a = graph.add_vertex(0);
    let b = graph.add_vertex(0);
    graph.add_edge(a, b, None)?;
    graph.add_edge(a, b, None)?;
    graph.add_edge(a, b, None)?;
    assert_eq!(automorphism_count(&graph, IsoPolicy::default()), 2);
    Ok(())
}

#[test]
fn empty_graphs_are_isomorphic() {
    let a = DecoratedGraph::new();
    let b = DecoratedGraph::new();
    assert!(a.is_isomorphic_to(&b));
    assert_eq!(automorphism_count(&a, IsoPolicy::default()), 1);
}
