use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use trop_core::{ErrorInfo, Marking, TropError};
use trop_graph::CurvePayload;

use crate::space::{ModuliSpace, MoveKind, StratumId};

/// Serializes a moduli space to its persisted JSON text form.
pub fn space_to_json(space: &ModuliSpace) -> Result<String, TropError> {
    let payload = SpacePayload::from_space(space);
    serde_json::to_string_pretty(&payload)
        .map_err(|err| TropError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a moduli space from its persisted JSON text form.
pub fn space_from_json(json: &str) -> Result<ModuliSpace, TropError> {
    let payload: SpacePayload = serde_json::from_str(json)
        .map_err(|err| TropError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    payload.into_space()
}

/// Persisted form of one specialization relation, referencing strata by
/// their dense position in the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationPayload {
    /// Position of the parent stratum.
    pub parent: usize,
    /// The move that produced the child.
    pub kind: MoveKind,
    /// Position of the child stratum.
    pub child: usize,
}

/// Persisted form of a whole moduli space: one curve entry per stratum
/// followed by the recorded specialization relations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpacePayload {
    /// Conserved total genus of the space.
    pub total_genus: u32,
    /// Raw marking labels shared by every stratum.
    pub markings: Vec<u64>,
    /// Curve entries in stratum order.
    pub strata: Vec<CurvePayload>,
    /// Specialization relations between strata.
    pub relations: Vec<RelationPayload>,
}

impl SpacePayload {
    /// Captures a space in persisted form.
    pub fn from_space(space: &ModuliSpace) -> Self {
        Self {
            total_genus: space.total_genus(),
            markings: space
                .marking_set()
                .iter()
                .map(|marking| marking.as_raw())
                .collect(),
            strata: space
                .strata()
                .map(|(_, graph)| CurvePayload::from_graph(graph))
                .collect(),
            relations: space
                .relations()
                .map(|relation| RelationPayload {
                    parent: relation.parent.as_raw(),
                    kind: relation.kind,
                    child: relation.child.as_raw(),
                })
                .collect(),
        }
    }

    /// Rebuilds the space, validating every entry.
    ///
    /// Each curve is reconstructed with fresh identities and must satisfy the
    /// genus invariant and carry the declared marking set; relations must
    /// reference existing strata. Violations surface as `MalformedData`.
    pub fn into_space(self) -> Result<ModuliSpace, TropError> {
        let markings: BTreeSet<Marking> =
            self.markings.iter().copied().map(Marking::from_raw).collect();
        let mut space = ModuliSpace::new(self.total_genus, markings.clone());
        let num_strata = self.strata.len();
        for (position, entry) in self.strata.into_iter().enumerate() {
            let graph = entry.into_graph()?;
            if graph.genus() != self.total_genus {
                return Err(TropError::MalformedData(
                    ErrorInfo::new("genus-invariant-broken", "entry violates the genus invariant")
                        .with_context("stratum", position)
                        .with_context("expected", self.total_genus)
                        .with_context("actual", graph.genus()),
                ));
            }
            if graph.marking_set() != markings {
                return Err(TropError::MalformedData(
                    ErrorInfo::new("marking-set-mismatch", "entry carries the wrong marking set")
                        .with_context("stratum", position),
                ));
            }
            space.insert_stratum(graph);
        }
        for relation in self.relations {
            if relation.parent >= num_strata || relation.child >= num_strata {
                return Err(TropError::MalformedData(
                    ErrorInfo::new("unknown-stratum", "relation references a missing stratum")
                        .with_context("parent", relation.parent)
                        .with_context("child", relation.child)
                        .with_context("strata", num_strata),
                ));
            }
            space.record_relation(
                StratumId::from_raw(relation.parent),
                relation.kind,
                StratumId::from_raw(relation.child),
            );
        }
        Ok(space)
    }
}

impl ModuliSpace {
    /// Writes the space to `path` in the persisted JSON text form.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TropError> {
        let json = space_to_json(self)?;
        std::fs::write(path.as_ref(), json).map_err(|err| {
            TropError::Serde(
                ErrorInfo::new("write-file", err.to_string())
                    .with_context("path", path.as_ref().display()),
            )
        })
    }

    /// Loads a space from `path`, rebuilding graphs with fresh identities.
    pub fn load(path: impl AsRef<Path>) -> Result<ModuliSpace, TropError> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|err| {
            TropError::Serde(
                ErrorInfo::new("read-file", err.to_string())
                    .with_context("path", path.as_ref().display()),
            )
        })?;
        space_from_json(&json)
    }
}
