use trop_core::{Marking, TropError};
use trop_graph::DecoratedGraph;
use trop_moduli::ModuliSpaceBuilder;

#[test]
fn canonical_seed_matches_the_configuration() -> Result<(), TropError> {
    let builder = ModuliSpaceBuilder::new(2, 3);
    let seed = builder.seed_curve();
    assert_eq!(seed.num_vertices(), 1);
    assert_eq!(seed.genus(), 2);
    assert_eq!(seed.marking_set(), builder.marking_set());
    Ok(())
}

#[test]
fn seed_with_wrong_genus_is_rejected() -> Result<(), TropError> {
    let mut seed = DecoratedGraph::new();
    let v = seed.add_vertex(2);
    seed.add_leg(v, Marking::from_raw(1))?;
    let err = ModuliSpaceBuilder::new(1, 1).generate(seed).unwrap_err();
    assert!(matches!(err, TropError::InvariantViolation(_)));
    assert_eq!(err.info().code, "seed-genus-mismatch");
    Ok(())
}

#[test]
fn seed_with_wrong_markings_is_rejected() -> Result<(), TropError> {
    let mut seed = DecoratedGraph::new();
    let v = seed.add_vertex(1);
    seed.add_leg(v, Marking::from_raw(5))?;
    let err = ModuliSpaceBuilder::new(1, 1).generate(seed).unwrap_err();
    assert_eq!(err.info().code, "seed-markings-mismatch");
    Ok(())
}

#[test]
fn disconnected_seeds_are_rejected() -> Result<(), TropError> {
    let mut seed = DecoratedGraph::new();
    let v = seed.add_vertex(0);
    seed.add_vertex(1);
    seed.add_leg(v, Marking::from_raw(1))?;
    let err = ModuliSpaceBuilder::new(1, 1).generate(seed).unwrap_err();
    assert_eq!(err.info().code, "seed-disconnected");
    Ok(())
}

#[test]
fn generation_explores_only_what_the_seed_reaches() -> Result<(), TropError> {
    // The maximally degenerate stratum of genus 1 with one marking admits no
    // further moves, so seeding there yields a single point.
    let mut seed = DecoratedGraph::new();
    let v = seed.add_vertex(0);
    seed.add_edge(v, v, None)?;
    seed.add_leg(v, Marking::from_raw(1))?;

    let space = ModuliSpaceBuilder::new(1, 1).generate(seed)?;
    assert_eq!(space.num_strata(), 1);
    assert_eq!(space.num_relations(), 0);
    Ok(())
}
