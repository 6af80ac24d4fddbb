use trop_core::{Marking, TropError};
use trop_graph::{Attachment, DecoratedGraph};

#[test]
fn contracting_a_connecting_edge_merges_genus() -> Result<(), TropError> {
    let mut graph = DecoratedGraph::new();
    let a = graph.add_vertex(1);
    let b = graph.add_vertex(2);
    let edge = graph.add_edge(a, b, None)?;
    assert_eq!(graph.genus(), 3);

    let merged = graph.contract(edge, false)?;
    assert_eq!(graph.num_vertices(), 1);
    assert_eq!(graph.num_edges(), 0);
    assert_eq!(graph.vertex_genus(merged)?, 3);
    assert_eq!(graph.genus(), 3);
    Ok(())
}

#[test]
fn absorbing_a_self_loop_raises_vertex_genus() -> Result<(), TropError> {
    let mut graph = DecoratedGraph::new();
    let v = graph.add_vertex(0);
    let loop_edge = graph.add_edge(v, v, None)?;
    assert_eq!(graph.genus(), 1);

    let vertex = graph.contract(loop_edge, true)?;
    assert_eq!(graph.num_edges(), 0);
    assert_eq!(graph.vertex_genus(vertex)?, 1);
    assert_eq!(graph.genus(), 1);
    Ok(())
}

#[test]
fn contracting_a_loop_without_absorption_is_rejected() -> Result<(), TropError> {
    let mut graph = DecoratedGraph::new();
    let v = graph.add_vertex(0);
    let loop_edge = graph.add_edge(v, v, None)?;
    let err = graph.contract(loop_edge, false).unwrap_err();
    assert!(matches!(err, TropError::InvariantViolation(_)));
    assert_eq!(err.info().code, "loop-contraction");
    // The failed call must not have mutated anything.
    assert_eq!(graph.num_edges(), 1);
    assert_eq!(graph.genus(), 1);
    Ok(())
}

#[test]
fn splitting_preserves_genus_and_moves_attachments() -> Result<(), TropError> {
    let mut graph = DecoratedGraph::new();
    let v = graph.add_vertex(2);
    let leg_one = graph.add_leg(v, Marking::from_raw(1))?;
    graph.add_leg(v, Marking::from_raw(2))?;
    assert_eq!(graph.genus(), 2);

    let outcome = graph.split(v, &[Attachment::Leg(leg_one)], (1, 1))?;
    assert_eq!(graph.num_vertices(), 2);
    assert_eq!(graph.num_edges(), 1);
    assert_eq!(graph.genus(), 2);
    assert_eq!(graph.vertex_genus(outcome.first)?, 1);
    assert_eq!(graph.vertex_genus(outcome.second)?, 1);
    assert_eq!(graph.markings_at(outcome.first)?, vec![Marking::from_raw(1)]);
    assert_eq!(graph.markings_at(outcome.second)?, vec![Marking::from_raw(2)]);
    assert_eq!(graph.edge_multiplicity(outcome.first, outcome.second)?, 1);
    Ok(())
}

#[test]
fn splitting_a_loop_end_pair_keeps_the_cycle() -> Result<(), TropError> {
    let mut graph = DecoratedGraph::new();
    let v = graph.add_vertex(0);
    let loop_edge = graph.add_edge(v, v, None)?;
    assert_eq!(graph.genus(), 1);

    // Send one loop end to each side: the loop becomes a second connecting
    // edge and the cycle survives.
    let first_side = [Attachment::EdgeEnd {
        edge: loop_edge,
        end: 0,
    }];
    let outcome = graph.split(v, &first_side, (0, 0))?;
    assert_eq!(graph.num_vertices(), 2);
    assert_eq!(graph.num_edges(), 2);
    assert_eq!(graph.edge_multiplicity(outcome.first, outcome.second)?, 2);
    assert_eq!(graph.genus(), 1);
    Ok(())
}

#[test]
fn genus_reduction_trades_decoration_for_a_loop() -> Result<(), TropError> {
    let mut graph = DecoratedGraph::new();
    let v = graph.add_vertex(1);
    graph.add_leg(v, Marking::from_raw(1))?;
    assert_eq!(graph.genus(), 1);

    let loop_edge = graph.reduce_genus(v)?;
    assert_eq!(graph.vertex_genus(v)?, 0);
    assert_eq!(graph.self_loops_at(v)?, 1);
    let (end_a, end_b) = graph.edge_endpoints(loop_edge)?;
    assert_eq!(end_a, end_b);
    assert_eq!(graph.genus(), 1);

    let err = graph.reduce_genus(v).unwrap_err();
    assert_eq!(err.info().code, "genus-exhausted");
    Ok(())
}

#[test]
fn betti_number_counts_independent_cycles() -> Result<(), TropError> {
    let mut graph = DecoratedGraph::new();
    let a = graph.add_vertex(0);
    let b = graph.add_vertex(0);
    graph.add_edge(a, b, None)?;
    graph.add_edge(a, b, None)?;
    graph.add_edge(a, a, None)?;
    assert_eq!(graph.betti_number(), 2);
    assert_eq!(graph.genus(), 2);
    Ok(())
}

#[test]
fn disconnected_components_enter_the_genus_formula() -> Result<(), TropError> {
    let mut graph = DecoratedGraph::new();
    let a = graph.add_vertex(1);
    let b = graph.add_vertex(0);
    let c = graph.add_vertex(0);
    graph.add_edge(b, c, None)?;
    graph.add_edge(b, c, None)?;
    assert_eq!(graph.connected_components(), 2);
    assert!(!graph.is_connected());
    // decoration 1 + betti (2 − 3 + 2) = 2
    assert_eq!(graph.genus(), 2);
    let _ = a;
    Ok(())
}

#[test]
fn empty_graph_is_connected_with_zero_genus() {
    let graph = DecoratedGraph::new();
    assert_eq!(graph.connected_components(), 0);
    assert!(graph.is_connected());
    assert_eq!(graph.genus(), 0);
}
