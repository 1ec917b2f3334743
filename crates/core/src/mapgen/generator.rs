//! High-level generation orchestration that composes layout, room types, and validation.

use crate::error::GenerationError;
use crate::graph::DungeonGraph;
use crate::rules::GenerationRules;

use super::builder::{AttemptFailure, GraphBuilder, Topology};
use super::rooms::RoomTypeAssigner;
use super::seed::SeedSource;

/// Entry point turning `(rules, seed)` into a validated [`DungeonGraph`].
///
/// Holds no state between calls; every `generate` builds its own random stream and
/// working buffers, so one generator can be shared freely across threads.
#[derive(Clone, Debug, PartialEq)]
pub struct DungeonGenerator {
    rules: GenerationRules,
}

impl DungeonGenerator {
    pub fn new(rules: GenerationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &GenerationRules {
        &self.rules
    }

    pub fn generate(&self, seed: u64) -> Result<DungeonGraph, GenerationError> {
        self.rules.validate()?;

        let mut source = SeedSource::new(seed);
        let topology = self.build_topology(&mut source)?;

        let entry_id = topology.floors[0][0];
        let boss_id = if self.rules.include_boss_room {
            topology.floors.last().and_then(|floor| floor.first()).copied()
        } else {
            None
        };
        let nodes =
            RoomTypeAssigner::new(&self.rules).assign(&topology, entry_id, boss_id, &mut source);

        let graph = DungeonGraph::from_parts(
            self.rules.clone(),
            seed,
            nodes,
            topology.edges,
            entry_id,
            boss_id,
        );
        let (valid, violations) = graph.validate();
        if !valid {
            return Err(GenerationError::InternalViolation(violations));
        }

        log::debug!(
            "seed {seed}: {} rooms, {} passages, {} branch points",
            graph.node_count(),
            graph.edge_count(),
            graph.branch_point_count()
        );
        Ok(graph)
    }

    /// Retries layout attempts on the same stream, so each retry sees fresh draws.
    fn build_topology(&self, source: &mut SeedSource) -> Result<Topology, GenerationError> {
        let attempts = self.rules.max_attempts;
        let mut last_failure = AttemptFailure::Bounds;

        for attempt in 1..=attempts {
            match GraphBuilder::new(&self.rules).build(source) {
                Ok(topology) => return Ok(topology),
                Err(failure) => {
                    log::debug!("layout attempt {attempt}/{attempts} rejected: {failure:?}");
                    last_failure = failure;
                }
            }
        }

        Err(match last_failure {
            AttemptFailure::Bounds => GenerationError::BoundsUnsatisfiable {
                min_rooms: self.rules.min_rooms,
                max_rooms: self.rules.max_rooms,
                attempts,
            },
            AttemptFailure::Disconnected { floor } => {
                GenerationError::Unsatisfiable { floor, attempts }
            }
        })
    }
}
