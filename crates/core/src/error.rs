//! Error types surfaced by rule checking, generation, and graph traversal.

use thiserror::Error;

use crate::types::NodeId;

/// A `GenerationRules` value that can never produce a graph.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RulesError {
    #[error("min_rooms must be at least 1")]
    ZeroMinRooms,
    #[error("min_rooms ({min}) exceeds max_rooms ({max})")]
    RoomBoundsInverted { min: usize, max: usize },
    #[error("total_floors must be at least 1")]
    NoFloors,
    #[error("a boss room needs at least two floors, got {total_floors}")]
    BossNeedsTwoFloors { total_floors: usize },
    #[error("min_nodes_per_floor must be at least 1")]
    ZeroNodesPerFloor,
    #[error("min_nodes_per_floor ({min}) exceeds max_nodes_per_floor ({max})")]
    NodesPerFloorInverted { min: usize, max: usize },
    #[error("max_branches must be at least 1")]
    ZeroMaxBranches,
    #[error("{name} must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error("room type ratios sum to {sum}, which exceeds 1")]
    RatiosExceedOne { sum: f64 },
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
    #[error("{name} is {value}, above the supported limit of {limit}")]
    TooLarge { name: &'static str, value: usize, limit: usize },
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum GenerationError {
    #[error("invalid generation rules: {0}")]
    InvalidRules(#[from] RulesError),
    /// Connectivity repair found every donor on `floor` already at `max_branches`.
    #[error("floor {floor} stayed disconnected under max_branches after {attempts} attempts")]
    Unsatisfiable { floor: usize, attempts: usize },
    #[error("no floor layout fits {min_rooms}..={max_rooms} rooms after {attempts} attempts")]
    BoundsUnsatisfiable { min_rooms: usize, max_rooms: usize, attempts: usize },
    /// The assembled graph failed its own structural check. Indicates a generator bug.
    #[error("generated graph failed validation: {}", .0.join("; "))]
    InternalViolation(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("room {0} does not exist in this dungeon")]
    UnknownNode(NodeId),
    #[error("no passage leads from {from} to {to}")]
    NotConnected { from: NodeId, to: NodeId },
}
