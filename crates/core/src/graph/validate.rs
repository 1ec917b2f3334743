//! Structural invariants every dungeon graph must satisfy.
//! Findings are plain data for display and automated checks, never errors.

use std::collections::BTreeSet;
use std::fmt;

use crate::types::{DungeonNode, NodeId, RoomType};

use super::DungeonGraph;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    DuplicateNodeId(NodeId),
    FloorOutOfRange { node: NodeId, floor: usize, total_floors: usize },
    UnknownEntry(NodeId),
    EntryNotStart { entry: NodeId, room_type: RoomType },
    EntryNotOnFirstFloor { entry: NodeId, floor: usize },
    StartRoomCount(usize),
    MissingBoss,
    UnknownBoss(NodeId),
    BossNotBossRoom { boss: NodeId, room_type: RoomType },
    BossNotOnLastFloor { boss: NodeId, floor: usize, last_floor: usize },
    BossRoomCount(usize),
    UnexpectedBoss,
    DanglingEdge { from: NodeId, to: NodeId },
    NonAdjacentEdge { from: NodeId, to: NodeId, from_floor: usize, to_floor: usize },
    DuplicateEdge { from: NodeId, to: NodeId },
    MissingIncomingEdge { node: NodeId, floor: usize },
    MissingOutgoingEdge { node: NodeId, floor: usize },
    OutDegreeExceeded { node: NodeId, degree: usize, max: usize },
    Unreachable(NodeId),
    BossUnreachable(NodeId),
    NodeCountOutOfBounds { count: usize, min: usize, max: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNodeId(id) => write!(f, "room id {id} appears more than once"),
            Self::FloorOutOfRange { node, floor, total_floors } => {
                write!(f, "room {node} is on floor {floor}, past the last of {total_floors} floors")
            }
            Self::UnknownEntry(id) => write!(f, "entry room {id} does not exist"),
            Self::EntryNotStart { entry, room_type } => {
                write!(f, "entry room {entry} is {room_type:?}, expected Start")
            }
            Self::EntryNotOnFirstFloor { entry, floor } => {
                write!(f, "entry room {entry} is on floor {floor}, expected floor 0")
            }
            Self::StartRoomCount(count) => {
                write!(f, "expected exactly one Start room, found {count}")
            }
            Self::MissingBoss => write!(f, "rules require a boss room but none is designated"),
            Self::UnknownBoss(id) => write!(f, "boss room {id} does not exist"),
            Self::BossNotBossRoom { boss, room_type } => {
                write!(f, "boss room {boss} is {room_type:?}, expected Boss")
            }
            Self::BossNotOnLastFloor { boss, floor, last_floor } => {
                write!(f, "boss room {boss} is on floor {floor}, expected floor {last_floor}")
            }
            Self::BossRoomCount(count) => {
                write!(f, "expected exactly one Boss room, found {count}")
            }
            Self::UnexpectedBoss => write!(f, "rules exclude a boss room but the graph has one"),
            Self::DanglingEdge { from, to } => {
                write!(f, "passage {from} -> {to} references a missing room")
            }
            Self::NonAdjacentEdge { from, to, from_floor, to_floor } => write!(
                f,
                "passage {from} -> {to} skips from floor {from_floor} to floor {to_floor}"
            ),
            Self::DuplicateEdge { from, to } => {
                write!(f, "passage {from} -> {to} appears more than once")
            }
            Self::MissingIncomingEdge { node, floor } => {
                write!(f, "room {node} on floor {floor} has no passage from the floor above")
            }
            Self::MissingOutgoingEdge { node, floor } => {
                write!(f, "room {node} on floor {floor} has no passage onward")
            }
            Self::OutDegreeExceeded { node, degree, max } => {
                write!(f, "room {node} has {degree} outgoing passages, more than the cap of {max}")
            }
            Self::Unreachable(id) => write!(f, "room {id} cannot be reached from the entry"),
            Self::BossUnreachable(id) => {
                write!(f, "boss room {id} cannot be reached from the entry")
            }
            Self::NodeCountOutOfBounds { count, min, max } => {
                write!(f, "dungeon has {count} rooms, expected between {min} and {max}")
            }
        }
    }
}

/// Checks `graph` against its own rules and returns every violation found, in a stable order.
pub fn validate_graph(graph: &DungeonGraph) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_nodes(graph, &mut violations);
    check_entry(graph, &mut violations);
    check_boss(graph, &mut violations);
    check_edges(graph, &mut violations);
    check_degrees(graph, &mut violations);
    check_reachability(graph, &mut violations);
    check_room_count(graph, &mut violations);
    violations
}

fn check_nodes(graph: &DungeonGraph, violations: &mut Vec<Violation>) {
    let total_floors = graph.total_floors();
    let mut seen = BTreeSet::new();
    for node in graph.all_nodes() {
        if !seen.insert(node.id) {
            violations.push(Violation::DuplicateNodeId(node.id));
        }
        if node.floor >= total_floors {
            violations.push(Violation::FloorOutOfRange {
                node: node.id,
                floor: node.floor,
                total_floors,
            });
        }
    }
}

fn check_entry(graph: &DungeonGraph, violations: &mut Vec<Violation>) {
    let entry = graph.entry_id();
    match graph.node(entry) {
        None => violations.push(Violation::UnknownEntry(entry)),
        Some(node) => {
            if node.room_type != RoomType::Start {
                violations.push(Violation::EntryNotStart { entry, room_type: node.room_type });
            }
            if node.floor != 0 {
                violations.push(Violation::EntryNotOnFirstFloor { entry, floor: node.floor });
            }
        }
    }

    let starts = count_rooms(graph, RoomType::Start);
    if starts != 1 {
        violations.push(Violation::StartRoomCount(starts));
    }
}

fn check_boss(graph: &DungeonGraph, violations: &mut Vec<Violation>) {
    let bosses = count_rooms(graph, RoomType::Boss);
    if !graph.rules().include_boss_room {
        if graph.boss_id().is_some() || bosses > 0 {
            violations.push(Violation::UnexpectedBoss);
        }
        return;
    }

    let last_floor = graph.rules().last_floor();
    match graph.boss_id() {
        None => violations.push(Violation::MissingBoss),
        Some(boss) => match graph.node(boss) {
            None => violations.push(Violation::UnknownBoss(boss)),
            Some(node) => {
                if node.room_type != RoomType::Boss {
                    violations.push(Violation::BossNotBossRoom { boss, room_type: node.room_type });
                }
                if node.floor != last_floor {
                    violations.push(Violation::BossNotOnLastFloor {
                        boss,
                        floor: node.floor,
                        last_floor,
                    });
                }
            }
        },
    }
    if bosses != 1 {
        violations.push(Violation::BossRoomCount(bosses));
    }
}

fn check_edges(graph: &DungeonGraph, violations: &mut Vec<Violation>) {
    let mut seen = BTreeSet::new();
    for edge in graph.all_edges() {
        if !seen.insert((edge.from, edge.to)) {
            violations.push(Violation::DuplicateEdge { from: edge.from, to: edge.to });
        }

        let (Some(from), Some(to)) = (graph.node(edge.from), graph.node(edge.to)) else {
            violations.push(Violation::DanglingEdge { from: edge.from, to: edge.to });
            continue;
        };
        if to.floor != from.floor + 1 {
            violations.push(Violation::NonAdjacentEdge {
                from: edge.from,
                to: edge.to,
                from_floor: from.floor,
                to_floor: to.floor,
            });
        }
    }
}

fn check_degrees(graph: &DungeonGraph, violations: &mut Vec<Violation>) {
    let max_branches = graph.rules().max_branches;
    let last_floor = graph.rules().last_floor();
    for node in graph.all_nodes() {
        if node.floor > 0 && !has_edge_from_previous_floor(graph, node) {
            violations.push(Violation::MissingIncomingEdge { node: node.id, floor: node.floor });
        }

        let degree = graph.out_degree(node.id);
        if node.floor < last_floor && degree == 0 {
            violations.push(Violation::MissingOutgoingEdge { node: node.id, floor: node.floor });
        }
        if degree > max_branches {
            violations.push(Violation::OutDegreeExceeded {
                node: node.id,
                degree,
                max: max_branches,
            });
        }
    }
}

fn check_reachability(graph: &DungeonGraph, violations: &mut Vec<Violation>) {
    if graph.node(graph.entry_id()).is_none() {
        return;
    }
    let reachable = graph.reachable_from(graph.entry_id());
    let mut reported = BTreeSet::new();
    for node in graph.all_nodes() {
        if reachable.contains(&node.id) || !reported.insert(node.id) {
            continue;
        }
        if Some(node.id) == graph.boss_id() {
            violations.push(Violation::BossUnreachable(node.id));
        } else {
            violations.push(Violation::Unreachable(node.id));
        }
    }
}

fn check_room_count(graph: &DungeonGraph, violations: &mut Vec<Violation>) {
    let rules = graph.rules();
    let count = graph.node_count();
    if count < rules.min_rooms || count > rules.max_rooms {
        violations.push(Violation::NodeCountOutOfBounds {
            count,
            min: rules.min_rooms,
            max: rules.max_rooms,
        });
    }
}

fn has_edge_from_previous_floor(graph: &DungeonGraph, node: &DungeonNode) -> bool {
    graph
        .incoming_edges(node.id)
        .filter_map(|edge| graph.node(edge.from))
        .any(|from| from.floor + 1 == node.floor)
}

fn count_rooms(graph: &DungeonGraph, room_type: RoomType) -> usize {
    graph.all_nodes().filter(|node| node.room_type == room_type).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::GenerationRules;
    use crate::types::{DungeonEdge, EdgeType};

    fn node(id: u32, room_type: RoomType, floor: usize) -> DungeonNode {
        DungeonNode { id: NodeId(id), room_type, floor }
    }

    fn edge(from: u32, to: u32) -> DungeonEdge {
        DungeonEdge { from: NodeId(from), to: NodeId(to), edge_type: EdgeType::Normal }
    }

    fn rules() -> GenerationRules {
        GenerationRules {
            min_rooms: 3,
            max_rooms: 6,
            total_floors: 3,
            max_branches: 2,
            ..GenerationRules::default()
        }
    }

    fn graph(nodes: Vec<DungeonNode>, edges: Vec<DungeonEdge>) -> DungeonGraph {
        DungeonGraph::from_parts(rules(), 0, nodes, edges, NodeId(0), Some(NodeId(3)))
    }

    fn valid_nodes() -> Vec<DungeonNode> {
        vec![
            node(0, RoomType::Start, 0),
            node(1, RoomType::Normal, 1),
            node(2, RoomType::Rest, 1),
            node(3, RoomType::Boss, 2),
        ]
    }

    fn valid_edges() -> Vec<DungeonEdge> {
        vec![edge(0, 1), edge(0, 2), edge(1, 3), edge(2, 3)]
    }

    #[test]
    fn well_formed_graph_has_no_violations() {
        let graph = graph(valid_nodes(), valid_edges());
        assert_eq!(validate_graph(&graph), Vec::new());
        assert_eq!(graph.validate(), (true, Vec::new()));
    }

    #[test]
    fn missing_incoming_edge_is_reported_with_unreachability() {
        let graph = graph(valid_nodes(), vec![edge(0, 1), edge(1, 3), edge(2, 3)]);
        let violations = validate_graph(&graph);
        assert!(violations.contains(&Violation::MissingIncomingEdge { node: NodeId(2), floor: 1 }));
        assert!(violations.contains(&Violation::Unreachable(NodeId(2))));
        let (valid, messages) = graph.validate();
        assert!(!valid);
        assert_eq!(messages.len(), violations.len());
    }

    #[test]
    fn dead_end_before_last_floor_is_reported() {
        let graph = graph(valid_nodes(), vec![edge(0, 1), edge(0, 2), edge(1, 3)]);
        assert_eq!(
            validate_graph(&graph),
            vec![Violation::MissingOutgoingEdge { node: NodeId(2), floor: 1 }]
        );
    }

    #[test]
    fn over_branching_is_reported() {
        let mut nodes = valid_nodes();
        nodes.push(node(4, RoomType::Elite, 1));
        let edges = vec![edge(0, 1), edge(0, 2), edge(0, 4), edge(1, 3), edge(2, 3), edge(4, 3)];
        assert_eq!(
            validate_graph(&graph(nodes, edges)),
            vec![Violation::OutDegreeExceeded { node: NodeId(0), degree: 3, max: 2 }]
        );
    }

    #[test]
    fn duplicate_dangling_and_skipping_edges_are_reported() {
        let mut edges = valid_edges();
        edges.push(edge(1, 3));
        edges.push(edge(2, 9));
        edges.push(edge(0, 3));
        let violations = validate_graph(&graph(valid_nodes(), edges));
        assert!(violations.contains(&Violation::DuplicateEdge { from: NodeId(1), to: NodeId(3) }));
        assert!(violations.contains(&Violation::DanglingEdge { from: NodeId(2), to: NodeId(9) }));
        assert!(violations.contains(&Violation::NonAdjacentEdge {
            from: NodeId(0),
            to: NodeId(3),
            from_floor: 0,
            to_floor: 2,
        }));
    }

    #[test]
    fn misplaced_entry_and_boss_are_reported() {
        let nodes = vec![
            node(0, RoomType::Normal, 0),
            node(1, RoomType::Start, 1),
            node(2, RoomType::Boss, 1),
            node(3, RoomType::Rest, 2),
        ];
        let violations = validate_graph(&graph(nodes, valid_edges()));
        assert!(violations.contains(&Violation::EntryNotStart {
            entry: NodeId(0),
            room_type: RoomType::Normal
        }));
        assert!(violations.contains(&Violation::BossNotBossRoom {
            boss: NodeId(3),
            room_type: RoomType::Rest
        }));
        assert!(!violations.contains(&Violation::StartRoomCount(1)));
    }

    #[test]
    fn unknown_entry_skips_reachability() {
        let graph = DungeonGraph::from_parts(
            rules(),
            0,
            valid_nodes(),
            valid_edges(),
            NodeId(42),
            Some(NodeId(3)),
        );
        let violations = validate_graph(&graph);
        assert!(violations.contains(&Violation::UnknownEntry(NodeId(42))));
        assert!(!violations.iter().any(|violation| matches!(violation, Violation::Unreachable(_))));
    }

    #[test]
    fn boss_in_a_bossless_dungeon_is_reported() {
        let rules = GenerationRules { include_boss_room: false, ..rules() };
        let graph =
            DungeonGraph::from_parts(rules, 0, valid_nodes(), valid_edges(), NodeId(0), None);
        assert_eq!(validate_graph(&graph), vec![Violation::UnexpectedBoss]);
    }

    #[test]
    fn room_count_outside_bounds_is_reported() {
        let rules = GenerationRules { min_rooms: 5, ..rules() };
        let graph = DungeonGraph::from_parts(
            rules,
            0,
            valid_nodes(),
            valid_edges(),
            NodeId(0),
            Some(NodeId(3)),
        );
        assert_eq!(
            validate_graph(&graph),
            vec![Violation::NodeCountOutOfBounds { count: 4, min: 5, max: 6 }]
        );
    }

    #[test]
    fn violations_render_with_room_ids() {
        let message =
            Violation::OutDegreeExceeded { node: NodeId(4), degree: 3, max: 2 }.to_string();
        assert!(message.contains("n4"), "message should name the room: {message}");
    }
}
