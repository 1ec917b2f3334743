//! Floor-by-floor room placement and forward passage wiring.

use crate::rules::GenerationRules;
use crate::types::{DungeonEdge, EdgeType, NodeId};

use super::floors::plan_floor_sizes;
use super::seed::SeedSource;

/// Rooms grouped by floor plus the passages between them, before room types exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct Topology {
    /// Room ids per floor, ascending.
    pub(super) floors: Vec<Vec<NodeId>>,
    pub(super) edges: Vec<DungeonEdge>,
}

impl Topology {
    pub(super) fn node_count(&self) -> usize {
        self.floors.iter().map(Vec::len).sum()
    }
}

/// Why a single layout attempt was thrown away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum AttemptFailure {
    /// Floor counts could not be steered into the room bounds.
    Bounds,
    /// Some room on `floor` could not get an incoming passage without exceeding the cap.
    Disconnected { floor: usize },
}

struct PendingEdge {
    from: NodeId,
    to: NodeId,
    /// The first passage drawn for a room; never hidden.
    mandatory: bool,
}

/// Working state for one layout attempt.
pub(super) struct GraphBuilder<'a> {
    rules: &'a GenerationRules,
    floors: Vec<Vec<NodeId>>,
    edges: Vec<PendingEdge>,
    out_degree: Vec<usize>,
    in_degree: Vec<usize>,
}

impl<'a> GraphBuilder<'a> {
    pub(super) fn new(rules: &'a GenerationRules) -> Self {
        Self {
            rules,
            floors: Vec::new(),
            edges: Vec::new(),
            out_degree: Vec::new(),
            in_degree: Vec::new(),
        }
    }

    /// Runs one full attempt: floor sizes, forward passages, repair, and the secret overlay.
    pub(super) fn build(mut self, source: &mut SeedSource) -> Result<Topology, AttemptFailure> {
        let sizes = plan_floor_sizes(self.rules, source).ok_or(AttemptFailure::Bounds)?;
        self.place_rooms(&sizes);

        for floor in 0..self.floors.len().saturating_sub(1) {
            self.connect_floor(floor, source);
            self.repair_floor(floor, source)?;
        }

        Ok(self.finish(source))
    }

    /// Validated rules keep the total under `GenerationRules::ROOM_LIMIT`, so ids fit `u32`.
    fn place_rooms(&mut self, sizes: &[usize]) {
        let mut next_id = 0_u32;
        for &size in sizes {
            let floor: Vec<NodeId> = (next_id..next_id + size as u32).map(NodeId).collect();
            next_id += size as u32;
            self.floors.push(floor);
        }
        let total = next_id as usize;
        self.out_degree = vec![0; total];
        self.in_degree = vec![0; total];
    }

    /// Draws each room's passages to the next floor. Targets come from rooms nobody reaches
    /// yet before any already reached room is picked, so the floor's combined branch budget
    /// goes to coverage first.
    fn connect_floor(&mut self, floor: usize, source: &mut SeedSource) {
        for index in 0..self.floors[floor].len() {
            let from = self.floors[floor][index];

            let branches = source.chance(self.rules.branching_factor);
            let degree = if branches && self.rules.max_branches >= 2 {
                source.next_int(2, self.rules.max_branches + 1)
            } else {
                1
            };

            let (uncovered, covered): (Vec<NodeId>, Vec<NodeId>) =
                self.floors[floor + 1].iter().partition(|&&to| self.in_degree[slot(to)] == 0);
            let fresh = degree.min(uncovered.len());
            let mut targets = sample_distinct(source, &uncovered, fresh);
            targets.extend(sample_distinct(source, &covered, (degree - fresh).min(covered.len())));

            for (rank, to) in targets.into_iter().enumerate() {
                self.push_edge(from, to, rank == 0);
            }
        }
    }

    /// Gives every room on `floor + 1` that nobody reached an incoming passage from a
    /// room on `floor` that still has spare out-degree. After coverage-first drawing this
    /// only fails when the floor holds more rooms than `floor` can reach in total.
    fn repair_floor(
        &mut self,
        floor: usize,
        source: &mut SeedSource,
    ) -> Result<(), AttemptFailure> {
        for index in 0..self.floors[floor + 1].len() {
            let orphan = self.floors[floor + 1][index];
            if self.in_degree[slot(orphan)] > 0 {
                continue;
            }

            let donors: Vec<NodeId> = self.floors[floor]
                .iter()
                .copied()
                .filter(|&donor| self.out_degree[slot(donor)] < self.rules.max_branches)
                .collect();
            if donors.is_empty() {
                return Err(AttemptFailure::Disconnected { floor: floor + 1 });
            }

            let donor = donors[source.next_int(0, donors.len())];
            log::trace!("repairing {orphan} with a passage from {donor}");
            self.push_edge(donor, orphan, false);
        }
        Ok(())
    }

    fn push_edge(&mut self, from: NodeId, to: NodeId, mandatory: bool) {
        self.out_degree[slot(from)] += 1;
        self.in_degree[slot(to)] += 1;
        self.edges.push(PendingEdge { from, to, mandatory });
    }

    fn finish(self, source: &mut SeedSource) -> Topology {
        let secret_ratio = self.rules.secret_edge_ratio;
        let edges = self
            .edges
            .into_iter()
            .map(|pending| {
                let hidden = !pending.mandatory && source.chance(secret_ratio);
                DungeonEdge {
                    from: pending.from,
                    to: pending.to,
                    edge_type: if hidden { EdgeType::Secret } else { EdgeType::Normal },
                }
            })
            .collect();
        Topology { floors: self.floors, edges }
    }
}

/// Picks `count` distinct entries uniformly, in draw order.
fn sample_distinct(source: &mut SeedSource, candidates: &[NodeId], count: usize) -> Vec<NodeId> {
    let mut pool = candidates.to_vec();
    for index in 0..count {
        let pick = source.next_int(index, pool.len());
        pool.swap(index, pick);
    }
    pool.truncate(count);
    pool
}

fn slot(id: NodeId) -> usize {
    id.0 as usize
}
