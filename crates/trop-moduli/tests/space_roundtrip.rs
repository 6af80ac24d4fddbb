use trop_core::TropError;
use trop_graph::{CurvePayload, DecoratedGraph, LegPayload};
use trop_moduli::{
    space_from_json, space_to_json, ModuliSpace, ModuliSpaceBuilder, MoveKind, RelationPayload,
    SpacePayload,
};

fn one_marked_vertex(genus: u32, markings: &[u64]) -> CurvePayload {
    CurvePayload {
        vertices: vec![genus],
        edges: Vec::new(),
        legs: markings
            .iter()
            .map(|&marking| LegPayload { root: 0, marking })
            .collect(),
    }
}

#[test]
fn json_roundtrip_preserves_the_space() -> Result<(), TropError> {
    let space = ModuliSpaceBuilder::new(1, 2).generate_space()?;
    let json = space_to_json(&space)?;
    let restored = space_from_json(&json)?;

    assert_eq!(restored.total_genus(), space.total_genus());
    assert_eq!(restored.marking_set(), space.marking_set());
    assert_eq!(restored.num_strata(), space.num_strata());
    assert_eq!(restored.num_relations(), space.num_relations());
    for (_, graph) in space.strata() {
        assert!(restored.contains_isomorphic(graph).is_some());
    }
    Ok(())
}

#[test]
fn save_and_load_through_a_file() -> Result<(), TropError> {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("m11.json");
    let space = ModuliSpaceBuilder::new(1, 1).generate_space()?;
    space.save(&path)?;

    let restored = ModuliSpace::load(&path)?;
    assert_eq!(restored.num_strata(), 2);
    assert_eq!(restored.num_relations(), 1);
    assert_eq!(restored.total_genus(), 1);
    Ok(())
}

#[test]
fn loading_a_missing_file_fails_with_context() {
    let err = ModuliSpace::load("/nonexistent/m.json").unwrap_err();
    assert!(matches!(err, TropError::Serde(_)));
    assert_eq!(err.info().code, "read-file");
    assert!(err.info().context.contains_key("path"));
}

#[test]
fn entries_must_satisfy_the_genus_invariant() {
    let payload = SpacePayload {
        total_genus: 1,
        markings: vec![1],
        strata: vec![one_marked_vertex(0, &[1])],
        relations: Vec::new(),
    };
    let err = payload.into_space().unwrap_err();
    assert!(matches!(err, TropError::MalformedData(_)));
    assert_eq!(err.info().code, "genus-invariant-broken");
}

#[test]
fn entries_must_carry_the_declared_markings() {
    let payload = SpacePayload {
        total_genus: 1,
        markings: vec![1, 2],
        strata: vec![one_marked_vertex(1, &[1])],
        relations: Vec::new(),
    };
    let err = payload.into_space().unwrap_err();
    assert_eq!(err.info().code, "marking-set-mismatch");
}

#[test]
fn relations_must_reference_existing_strata() {
    let payload = SpacePayload {
        total_genus: 1,
        markings: vec![1],
        strata: vec![one_marked_vertex(1, &[1])],
        relations: vec![RelationPayload {
            parent: 0,
            kind: MoveKind::Split,
            child: 7,
        }],
    };
    let err = payload.into_space().unwrap_err();
    assert_eq!(err.info().code, "unknown-stratum");
}

#[test]
fn loaded_graphs_have_fresh_identities() -> Result<(), TropError> {
    let space = ModuliSpaceBuilder::new(0, 3).generate_space()?;
    let restored = space_from_json(&space_to_json(&space)?)?;
    let original: &DecoratedGraph = space.stratum(space.strata().next().unwrap().0).unwrap();
    let loaded: &DecoratedGraph = restored.stratum(restored.strata().next().unwrap().0).unwrap();
    assert_ne!(original.stamp(), loaded.stamp());
    Ok(())
}
