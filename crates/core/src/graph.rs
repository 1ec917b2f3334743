//! The immutable dungeon graph and its read-only query surface.

pub mod hash;
pub mod validate;

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::rules::GenerationRules;
use crate::types::{DungeonEdge, DungeonNode, NodeId, RoomType};

use self::validate::{Violation, validate_graph};

/// Rooms, forward passages, and the designated entry and boss rooms of one dungeon.
///
/// A graph never changes after construction. Lookups tolerate malformed input (unknown
/// ids, dangling passages) so that hand-authored graphs can still be inspected and
/// reported on by [`DungeonGraph::validate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "GraphRecord", into = "GraphRecord")]
pub struct DungeonGraph {
    rules: GenerationRules,
    seed: u64,
    nodes: Vec<DungeonNode>,
    edges: Vec<DungeonEdge>,
    entry_id: NodeId,
    boss_id: Option<NodeId>,
    node_index: BTreeMap<NodeId, usize>,
    outgoing: BTreeMap<NodeId, Vec<usize>>,
    incoming: BTreeMap<NodeId, Vec<usize>>,
}

impl DungeonGraph {
    /// Assembles a graph without checking it. `rules` is what [`Self::validate`] checks
    /// the graph against.
    pub fn from_parts(
        rules: GenerationRules,
        seed: u64,
        nodes: Vec<DungeonNode>,
        edges: Vec<DungeonEdge>,
        entry_id: NodeId,
        boss_id: Option<NodeId>,
    ) -> Self {
        let mut node_index = BTreeMap::new();
        for (index, node) in nodes.iter().enumerate() {
            node_index.entry(node.id).or_insert(index);
        }

        let mut outgoing: BTreeMap<NodeId, Vec<usize>> = BTreeMap::new();
        let mut incoming: BTreeMap<NodeId, Vec<usize>> = BTreeMap::new();
        for (index, edge) in edges.iter().enumerate() {
            outgoing.entry(edge.from).or_default().push(index);
            incoming.entry(edge.to).or_default().push(index);
        }

        Self { rules, seed, nodes, edges, entry_id, boss_id, node_index, outgoing, incoming }
    }

    pub fn rules(&self) -> &GenerationRules {
        &self.rules
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn total_floors(&self) -> usize {
        self.rules.total_floors
    }

    pub fn entry_id(&self) -> NodeId {
        self.entry_id
    }

    pub fn boss_id(&self) -> Option<NodeId> {
        self.boss_id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&DungeonNode> {
        self.node_index.get(&id).map(|&index| &self.nodes[index])
    }

    /// Rooms in ascending (floor, id) order for generated graphs; each call starts over.
    pub fn all_nodes(&self) -> impl Iterator<Item = &DungeonNode> {
        self.nodes.iter()
    }

    pub fn all_edges(&self) -> impl Iterator<Item = &DungeonEdge> {
        self.edges.iter()
    }

    pub fn nodes_on_floor(&self, floor: usize) -> impl Iterator<Item = &DungeonNode> {
        self.nodes.iter().filter(move |node| node.floor == floor)
    }

    pub fn outgoing_edges(&self, id: NodeId) -> impl Iterator<Item = &DungeonEdge> {
        self.edges_at(&self.outgoing, id)
    }

    pub fn incoming_edges(&self, id: NodeId) -> impl Iterator<Item = &DungeonEdge> {
        self.edges_at(&self.incoming, id)
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.outgoing.get(&id).map_or(0, Vec::len)
    }

    /// Rooms one passage away from `id`, skipping passages into unknown rooms.
    pub fn successors(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        self.outgoing_edges(id)
            .map(|edge| edge.to)
            .filter(move |to| self.node_index.contains_key(to))
    }

    /// Count of rooms per type; every type is present, possibly with zero.
    pub fn room_type_histogram(&self) -> BTreeMap<RoomType, usize> {
        let mut histogram: BTreeMap<RoomType, usize> =
            RoomType::ALL.iter().map(|&room_type| (room_type, 0)).collect();
        for node in &self.nodes {
            *histogram.entry(node.room_type).or_default() += 1;
        }
        histogram
    }

    /// Fewest-passages route from `from` to `to`, both ends included.
    ///
    /// Empty when either room is unknown or `to` cannot be reached; that is an ordinary
    /// answer, not an error.
    pub fn shortest_path(&self, from: NodeId, to: NodeId) -> Vec<&DungeonNode> {
        let (Some(start), Some(_)) = (self.node(from), self.node(to)) else {
            return Vec::new();
        };
        if from == to {
            return vec![start];
        }

        let mut came_from = BTreeMap::new();
        let mut open = VecDeque::from([from]);
        let mut seen = BTreeSet::from([from]);
        while let Some(current) = open.pop_front() {
            for next in self.successors(current) {
                if !seen.insert(next) {
                    continue;
                }
                came_from.insert(next, current);
                if next == to {
                    return self.reconstruct_path(&came_from, from, to);
                }
                open.push_back(next);
            }
        }
        Vec::new()
    }

    /// Passages on the shortest entry-to-boss route; `None` without a reachable boss.
    pub fn shortest_path_length(&self) -> Option<usize> {
        let boss_id = self.boss_id?;
        self.shortest_path(self.entry_id, boss_id).len().checked_sub(1)
    }

    /// Rooms with more than one outgoing passage.
    pub fn branch_point_count(&self) -> usize {
        self.nodes.iter().filter(|node| self.out_degree(node.id) > 1).count()
    }

    /// Every room reachable from `start` by following passages forward, `start` included.
    pub fn reachable_from(&self, start: NodeId) -> BTreeSet<NodeId> {
        let mut visited = BTreeSet::new();
        if !self.node_index.contains_key(&start) {
            return visited;
        }

        let mut queue = VecDeque::from([start]);
        visited.insert(start);
        while let Some(current) = queue.pop_front() {
            for next in self.successors(current) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        visited
    }

    /// Structural check against the graph's rules: `(true, [])` when every invariant holds,
    /// otherwise `false` and one human-readable line per violation.
    pub fn validate(&self) -> (bool, Vec<String>) {
        let violations = self.violations();
        (violations.is_empty(), violations.iter().map(ToString::to_string).collect())
    }

    pub fn violations(&self) -> Vec<Violation> {
        validate_graph(self)
    }

    fn edges_at<'a>(
        &'a self,
        index: &'a BTreeMap<NodeId, Vec<usize>>,
        id: NodeId,
    ) -> impl Iterator<Item = &'a DungeonEdge> {
        index.get(&id).into_iter().flatten().map(move |&edge_index| &self.edges[edge_index])
    }

    fn reconstruct_path(
        &self,
        came_from: &BTreeMap<NodeId, NodeId>,
        start: NodeId,
        goal: NodeId,
    ) -> Vec<&DungeonNode> {
        let mut id = goal;
        let mut ids = vec![id];
        while id != start {
            let Some(&previous) = came_from.get(&id) else {
                return Vec::new();
            };
            id = previous;
            ids.push(id);
        }
        ids.reverse();
        ids.into_iter().filter_map(|id| self.node(id)).collect()
    }
}

/// Flat serialized form of a [`DungeonGraph`]; lookup indexes are rebuilt on load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphRecord {
    pub seed: u64,
    pub rules: GenerationRules,
    pub entry_id: NodeId,
    pub boss_id: Option<NodeId>,
    pub nodes: Vec<DungeonNode>,
    pub edges: Vec<DungeonEdge>,
}

impl From<GraphRecord> for DungeonGraph {
    fn from(record: GraphRecord) -> Self {
        Self::from_parts(
            record.rules,
            record.seed,
            record.nodes,
            record.edges,
            record.entry_id,
            record.boss_id,
        )
    }
}

impl From<DungeonGraph> for GraphRecord {
    fn from(graph: DungeonGraph) -> Self {
        Self {
            seed: graph.seed,
            rules: graph.rules,
            entry_id: graph.entry_id,
            boss_id: graph.boss_id,
            nodes: graph.nodes,
            edges: graph.edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EdgeType;

    fn node(id: u32, room_type: RoomType, floor: usize) -> DungeonNode {
        DungeonNode { id: NodeId(id), room_type, floor }
    }

    fn edge(from: u32, to: u32) -> DungeonEdge {
        DungeonEdge { from: NodeId(from), to: NodeId(to), edge_type: EdgeType::Normal }
    }

    /// Diamond: entry fans out to two rooms that both lead to the boss, plus a dead end.
    fn diamond() -> DungeonGraph {
        let rules = GenerationRules {
            min_rooms: 1,
            max_rooms: 10,
            total_floors: 3,
            max_branches: 3,
            ..GenerationRules::default()
        };
        DungeonGraph::from_parts(
            rules,
            7,
            vec![
                node(0, RoomType::Start, 0),
                node(1, RoomType::Elite, 1),
                node(2, RoomType::Shop, 1),
                node(3, RoomType::Normal, 1),
                node(4, RoomType::Boss, 2),
            ],
            vec![edge(0, 1), edge(0, 2), edge(0, 3), edge(1, 4), edge(2, 4), edge(3, 4)],
            NodeId(0),
            Some(NodeId(4)),
        )
    }

    #[test]
    fn counts_and_enumeration_are_restartable() {
        let graph = diamond();
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.all_nodes().count(), 5);
        assert_eq!(graph.all_nodes().count(), 5);
        let first: Vec<_> = graph.all_edges().collect();
        let second: Vec<_> = graph.all_edges().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn shortest_path_runs_entry_to_boss() {
        let graph = diamond();
        let path: Vec<NodeId> =
            graph.shortest_path(NodeId(0), NodeId(4)).iter().map(|node| node.id).collect();
        assert_eq!(path, [NodeId(0), NodeId(1), NodeId(4)]);
        assert_eq!(graph.shortest_path_length(), Some(2));
    }

    #[test]
    fn shortest_path_is_empty_when_unreachable_or_unknown() {
        let graph = diamond();
        assert!(graph.shortest_path(NodeId(4), NodeId(0)).is_empty());
        assert!(graph.shortest_path(NodeId(1), NodeId(2)).is_empty());
        assert!(graph.shortest_path(NodeId(0), NodeId(99)).is_empty());
    }

    #[test]
    fn shortest_path_to_self_is_a_single_room() {
        let graph = diamond();
        let path = graph.shortest_path(NodeId(2), NodeId(2));
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].id, NodeId(2));
    }

    #[test]
    fn branch_points_and_degrees() {
        let graph = diamond();
        assert_eq!(graph.branch_point_count(), 1);
        assert_eq!(graph.out_degree(NodeId(0)), 3);
        assert_eq!(graph.out_degree(NodeId(4)), 0);
        assert_eq!(graph.incoming_edges(NodeId(4)).count(), 3);
        assert_eq!(graph.nodes_on_floor(1).count(), 3);
    }

    #[test]
    fn histogram_lists_every_room_type() {
        let histogram = diamond().room_type_histogram();
        assert_eq!(histogram.len(), RoomType::ALL.len());
        assert_eq!(histogram[&RoomType::Start], 1);
        assert_eq!(histogram[&RoomType::Boss], 1);
        assert_eq!(histogram[&RoomType::Elite], 1);
        assert_eq!(histogram[&RoomType::Rest], 0);
        assert_eq!(histogram.values().sum::<usize>(), 5);
    }

    #[test]
    fn missing_boss_means_no_path_length() {
        let graph = DungeonGraph::from_parts(
            GenerationRules { include_boss_room: false, ..GenerationRules::default() },
            1,
            vec![node(0, RoomType::Start, 0), node(1, RoomType::Normal, 1)],
            vec![edge(0, 1)],
            NodeId(0),
            None,
        );
        assert_eq!(graph.shortest_path_length(), None);
    }

    #[test]
    fn json_round_trip_rebuilds_indexes() {
        let graph = diamond();
        let json = serde_json::to_string(&graph).expect("graph should serialize");
        let restored: DungeonGraph = serde_json::from_str(&json).expect("graph should deserialize");
        assert_eq!(restored, graph);
        assert_eq!(restored.out_degree(NodeId(0)), 3);
        assert_eq!(restored.shortest_path_length(), Some(2));
    }
}
