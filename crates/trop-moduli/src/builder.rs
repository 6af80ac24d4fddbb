use std::collections::{BTreeSet, VecDeque};

use trop_core::{ErrorInfo, Marking, TropError};
use trop_graph::{Attachment, DecoratedGraph};

use crate::space::{ModuliSpace, MoveKind, StratumId};

/// Frontier discipline used while exploring the space.
///
/// Both orders discover the same strata up to isomorphism; the option exists
/// so that order-independence can be exercised directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Depth-first: newest stratum explored next.
    #[default]
    Dfs,
    /// Breadth-first: oldest unexplored stratum next.
    Bfs,
}

/// Exhaustive generator for the moduli space of decorated dual graphs of a
/// fixed total genus and marking count.
#[derive(Debug, Clone)]
pub struct ModuliSpaceBuilder {
    total_genus: u32,
    num_markings: u64,
    traversal: Traversal,
}

impl ModuliSpaceBuilder {
    /// Creates a builder for total genus `total_genus` with markings
    /// `1..=num_markings`.
    pub fn new(total_genus: u32, num_markings: u64) -> Self {
        Self {
            total_genus,
            num_markings,
            traversal: Traversal::default(),
        }
    }

    /// Selects the frontier discipline.
    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// The marking labels every stratum of this space must carry.
    pub fn marking_set(&self) -> BTreeSet<Marking> {
        (1..=self.num_markings).map(Marking::from_raw).collect()
    }

    /// Builds the canonical seed: a single vertex of the target genus
    /// carrying all markings as legs.
    pub fn seed_curve(&self) -> DecoratedGraph {
        let mut graph = DecoratedGraph::new();
        let vertex = graph.add_vertex(self.total_genus);
        for marking in self.marking_set() {
            // The labels are distinct by construction, so this cannot fail.
            let _ = graph.add_leg(vertex, marking);
        }
        graph
    }

    /// Generates the full space from the canonical seed.
    pub fn generate_space(&self) -> Result<ModuliSpace, TropError> {
        self.generate(self.seed_curve())
    }

    /// Generates the full space reachable from `seed` by splitting and genus
    /// reduction, deduplicated by isomorphism class.
    ///
    /// Fails fast with `InvariantViolation` when the seed does not carry the
    /// configured total genus or marking set, or is disconnected. A candidate
    /// that drifts off the genus invariant aborts the exploration step
    /// instead of being dropped.
    pub fn generate(&self, seed: DecoratedGraph) -> Result<ModuliSpace, TropError> {
        if seed.genus() != self.total_genus {
            return Err(TropError::InvariantViolation(
                ErrorInfo::new("seed-genus-mismatch", "seed violates the total genus invariant")
                    .with_context("expected", self.total_genus)
                    .with_context("actual", seed.genus()),
            ));
        }
        if seed.marking_set() != self.marking_set() {
            return Err(TropError::InvariantViolation(
                ErrorInfo::new("seed-markings-mismatch", "seed carries the wrong marking set")
                    .with_context("expected", self.num_markings),
            ));
        }
        if !seed.is_connected() {
            return Err(TropError::InvariantViolation(
                ErrorInfo::new("seed-disconnected", "dual graphs of curves are connected")
                    .with_context("components", seed.connected_components()),
            ));
        }

        let mut space = ModuliSpace::new(self.total_genus, self.marking_set());
        let root = space.insert_stratum(seed);
        let mut frontier = VecDeque::from([root]);

        while let Some(current) = self.next_stratum(&mut frontier) {
            let candidates = {
                let Some(graph) = space.stratum(current) else {
                    continue;
                };
                let mut candidates = split_candidates(graph)?;
                candidates.extend(reduction_candidates(graph)?);
                candidates
            };
            for (kind, candidate) in candidates {
                if candidate.genus() != self.total_genus {
                    return Err(TropError::InvariantViolation(
                        ErrorInfo::new(
                            "candidate-genus-drift",
                            "a degeneration move changed the total genus",
                        )
                        .with_context("expected", self.total_genus)
                        .with_context("actual", candidate.genus()),
                    ));
                }
                match space.contains_isomorphic(&candidate) {
                    Some(existing) => space.record_relation(current, kind, existing),
                    None => {
                        let id = space.insert_stratum(candidate);
                        space.record_relation(current, kind, id);
                        frontier.push_back(id);
                    }
                }
            }
        }
        Ok(space)
    }

    fn next_stratum(&self, frontier: &mut VecDeque<StratumId>) -> Option<StratumId> {
        match self.traversal {
            Traversal::Dfs => frontier.pop_back(),
            Traversal::Bfs => frontier.pop_front(),
        }
    }
}

/// A side of a prospective split survives exactly when the resulting vertex
/// is stable: genus 0 demands total incidence at least three, counting the
/// bridge edge.
fn side_is_stable(genus: u32, incidence: usize) -> bool {
    genus > 0 || incidence >= 3
}

fn split_candidates(
    graph: &DecoratedGraph,
) -> Result<Vec<(MoveKind, DecoratedGraph)>, TropError> {
    let mut candidates = Vec::new();
    for vertex in graph.vertex_ids() {
        let genus = graph.vertex_genus(vertex)?;
        let attachments = graph.attachments(vertex)?;
        let incidence = attachments.len();
        if incidence > 60 {
            return Err(TropError::InvariantViolation(
                ErrorInfo::new("incidence-overflow", "vertex incidence exceeds the partition limit")
                    .with_context("vertex", vertex.index())
                    .with_context("incidence", incidence),
            ));
        }
        for g1 in 0..=genus {
            let g2 = genus - g1;
            for mask in 0u64..(1u64 << incidence) {
                let first_size = mask.count_ones() as usize;
                if !side_is_stable(g1, first_size + 1)
                    || !side_is_stable(g2, incidence - first_size + 1)
                {
                    continue;
                }
                let (mut clone, map) = graph.clone_with_map();
                let first_side: Vec<Attachment> = attachments
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1 << bit) != 0)
                    .map(|(_, attachment)| map_attachment(attachment, &map))
                    .collect();
                clone.split(map.vertices[&vertex], &first_side, (g1, g2))?;
                candidates.push((MoveKind::Split, clone));
            }
        }
    }
    Ok(candidates)
}

fn reduction_candidates(
    graph: &DecoratedGraph,
) -> Result<Vec<(MoveKind, DecoratedGraph)>, TropError> {
    let mut candidates = Vec::new();
    for vertex in graph.vertex_ids() {
        if graph.vertex_genus(vertex)? == 0 {
            continue;
        }
        let (mut clone, map) = graph.clone_with_map();
        clone.reduce_genus(map.vertices[&vertex])?;
        candidates.push((MoveKind::ReduceGenus, clone));
    }
    Ok(candidates)
}

fn map_attachment(attachment: &Attachment, map: &trop_graph::CloneMap) -> Attachment {
    match attachment {
        Attachment::EdgeEnd { edge, end } => Attachment::EdgeEnd {
            edge: map.edges[edge],
            end: *end,
        },
        Attachment::Leg(leg) => Attachment::Leg(map.legs[leg]),
    }
}
