use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a room node, unique within one graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Start,
    Normal,
    Elite,
    Boss,
    Shop,
    Rest,
    Treasure,
}

impl RoomType {
    pub const ALL: [RoomType; 7] = [
        RoomType::Start,
        RoomType::Normal,
        RoomType::Elite,
        RoomType::Boss,
        RoomType::Shop,
        RoomType::Rest,
        RoomType::Treasure,
    ];

    pub fn code(self) -> u8 {
        match self {
            Self::Start => 0,
            Self::Normal => 1,
            Self::Elite => 2,
            Self::Boss => 3,
            Self::Shop => 4,
            Self::Rest => 5,
            Self::Treasure => 6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    Normal,
    /// Hidden connection; still traversable once found.
    Secret,
    /// Reserved for gameplay gating. The generator never emits it.
    Locked,
}

impl EdgeType {
    pub fn code(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Secret => 1,
            Self::Locked => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonNode {
    pub id: NodeId,
    pub room_type: RoomType,
    pub floor: usize,
}

/// Directed connection from a room on floor `f` to a room on floor `f + 1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub edge_type: EdgeType,
}
