//! Traversal cursor over a generated dungeon.
//! This module owns the "where is the player" state that gameplay layers advance room by room.
//! It does not own room contents, encounter resolution, or persistence.

use crate::error::RunError;
use crate::graph::DungeonGraph;
use crate::types::{DungeonEdge, DungeonNode, NodeId};

/// A dungeon plus the room the player currently stands in and the rooms visited so far.
#[derive(Clone, Debug, PartialEq)]
pub struct DungeonRun {
    graph: DungeonGraph,
    current: NodeId,
    path: Vec<NodeId>,
}

impl DungeonRun {
    /// Starts a run in the graph's entry room.
    pub fn new(graph: DungeonGraph) -> Self {
        let current = graph.entry_id();
        Self { graph, current, path: vec![current] }
    }

    pub fn graph(&self) -> &DungeonGraph {
        &self.graph
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn current_node(&self) -> Option<&DungeonNode> {
        self.graph.node(self.current)
    }

    /// Rooms visited so far, entry first and current last.
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    pub fn choices(&self) -> impl Iterator<Item = &DungeonEdge> {
        self.graph.outgoing_edges(self.current)
    }

    /// Moves along the passage from the current room to `to`.
    pub fn advance(&mut self, to: NodeId) -> Result<&DungeonNode, RunError> {
        if self.graph.node(to).is_none() {
            return Err(RunError::UnknownNode(to));
        }
        if !self.choices().any(|edge| edge.to == to) {
            return Err(RunError::NotConnected { from: self.current, to });
        }

        log::trace!("run advanced {} -> {to}", self.current);
        self.current = to;
        self.path.push(to);
        self.graph.node(to).ok_or(RunError::UnknownNode(to))
    }

    pub fn is_at_boss(&self) -> bool {
        self.graph.boss_id() == Some(self.current)
    }

    /// True once the current room has no passage onward.
    pub fn is_finished(&self) -> bool {
        self.choices().next().is_none()
    }

    pub fn into_graph(self) -> DungeonGraph {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::generate;
    use crate::rules::GenerationRules;
    use crate::types::{EdgeType, RoomType};

    fn chain() -> DungeonGraph {
        let rules = GenerationRules {
            min_rooms: 3,
            max_rooms: 3,
            total_floors: 3,
            max_nodes_per_floor: 1,
            ..GenerationRules::default()
        };
        let nodes = vec![
            DungeonNode { id: NodeId(0), room_type: RoomType::Start, floor: 0 },
            DungeonNode { id: NodeId(1), room_type: RoomType::Rest, floor: 1 },
            DungeonNode { id: NodeId(2), room_type: RoomType::Boss, floor: 2 },
        ];
        let edges = vec![
            DungeonEdge { from: NodeId(0), to: NodeId(1), edge_type: EdgeType::Normal },
            DungeonEdge { from: NodeId(1), to: NodeId(2), edge_type: EdgeType::Normal },
        ];
        DungeonGraph::from_parts(rules, 0, nodes, edges, NodeId(0), Some(NodeId(2)))
    }

    #[test]
    fn run_starts_at_entry() {
        let run = DungeonRun::new(chain());
        assert_eq!(run.current(), NodeId(0));
        assert_eq!(run.path(), &[NodeId(0)]);
        assert_eq!(run.current_node().map(|node| node.room_type), Some(RoomType::Start));
        assert!(!run.is_at_boss());
        assert!(!run.is_finished());
    }

    #[test]
    fn advancing_follows_passages_to_the_boss() {
        let mut run = DungeonRun::new(chain());
        let rest = run.advance(NodeId(1)).expect("entry connects to the rest room");
        assert_eq!(rest.room_type, RoomType::Rest);
        run.advance(NodeId(2)).expect("rest room connects to the boss");
        assert!(run.is_at_boss());
        assert!(run.is_finished());
        assert_eq!(run.path(), &[NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(run.choices().count(), 0);
    }

    #[test]
    fn advancing_without_a_passage_is_rejected() {
        let mut run = DungeonRun::new(chain());
        assert_eq!(
            run.advance(NodeId(2)),
            Err(RunError::NotConnected { from: NodeId(0), to: NodeId(2) })
        );
        assert_eq!(run.advance(NodeId(9)), Err(RunError::UnknownNode(NodeId(9))));
        assert_eq!(run.current(), NodeId(0));
        assert_eq!(run.path().len(), 1);
    }

    #[test]
    fn shortest_path_is_walkable_as_a_run() {
        let rules = GenerationRules::default();
        for seed in 0..16 {
            let graph = generate(&rules, seed).expect("default rules should generate");
            let route: Vec<NodeId> = graph
                .shortest_path(graph.entry_id(), graph.boss_id().expect("boss is on by default"))
                .iter()
                .map(|node| node.id)
                .collect();

            let mut run = DungeonRun::new(graph);
            for &next in &route[1..] {
                run.advance(next).expect("shortest path only follows passages");
            }
            assert!(run.is_at_boss(), "seed={seed}");
            assert_eq!(run.path(), route.as_slice());
            assert_eq!(run.into_graph().seed(), seed);
        }
    }
}
