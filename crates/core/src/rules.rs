//! Structural bounds and room mix that drive dungeon generation.

use serde::{Deserialize, Serialize};

use crate::error::RulesError;

const RATIO_SUM_TOLERANCE: f64 = 1e-9;

/// Immutable description of the dungeon shape a caller wants.
///
/// Every field is part of the public contract, so rules are built with plain struct
/// syntax (usually `..GenerationRules::default()`) or deserialized from a config file.
/// Missing fields in a config file fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRules {
    /// Inclusive lower bound on total room count.
    pub min_rooms: usize,
    /// Inclusive upper bound on total room count.
    pub max_rooms: usize,
    pub total_floors: usize,
    pub min_nodes_per_floor: usize,
    pub max_nodes_per_floor: usize,
    /// Probability that a room gets more than one outgoing passage.
    pub branching_factor: f64,
    /// Hard cap on a room's out-degree.
    pub max_branches: usize,
    pub include_boss_room: bool,
    pub elite_room_ratio: f64,
    pub shop_room_ratio: f64,
    pub rest_room_ratio: f64,
    pub treasure_room_ratio: f64,
    /// Chance that a non-mandatory passage is hidden.
    pub secret_edge_ratio: f64,
    /// Layout attempts before generation gives up.
    pub max_attempts: usize,
}

impl Default for GenerationRules {
    fn default() -> Self {
        Self {
            min_rooms: 10,
            max_rooms: 20,
            total_floors: 6,
            min_nodes_per_floor: 1,
            max_nodes_per_floor: 3,
            branching_factor: 0.4,
            max_branches: 2,
            include_boss_room: true,
            elite_room_ratio: 0.15,
            shop_room_ratio: 0.1,
            rest_room_ratio: 0.1,
            treasure_room_ratio: 0.0,
            secret_edge_ratio: 0.1,
            max_attempts: 10,
        }
    }
}

impl GenerationRules {
    /// Upper bound on room counts and floor counts. Room ids are `u32`, and every bound stays
    /// well clear of `usize` overflow in the layout arithmetic.
    pub const ROOM_LIMIT: usize = 1 << 20;

    /// Rejects rules that no amount of retrying could satisfy. Consumes no randomness.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.min_rooms == 0 {
            return Err(RulesError::ZeroMinRooms);
        }
        if self.min_rooms > self.max_rooms {
            return Err(RulesError::RoomBoundsInverted { min: self.min_rooms, max: self.max_rooms });
        }
        if self.total_floors == 0 {
            return Err(RulesError::NoFloors);
        }
        if self.include_boss_room && self.total_floors < 2 {
            return Err(RulesError::BossNeedsTwoFloors { total_floors: self.total_floors });
        }
        if self.min_nodes_per_floor == 0 {
            return Err(RulesError::ZeroNodesPerFloor);
        }
        if self.min_nodes_per_floor > self.max_nodes_per_floor {
            return Err(RulesError::NodesPerFloorInverted {
                min: self.min_nodes_per_floor,
                max: self.max_nodes_per_floor,
            });
        }
        if self.max_branches == 0 {
            return Err(RulesError::ZeroMaxBranches);
        }
        if self.max_attempts == 0 {
            return Err(RulesError::ZeroAttempts);
        }
        for (name, value) in [
            ("max_rooms", self.max_rooms),
            ("total_floors", self.total_floors),
            ("max_nodes_per_floor", self.max_nodes_per_floor),
            ("max_branches", self.max_branches),
        ] {
            if value > Self::ROOM_LIMIT {
                return Err(RulesError::TooLarge { name, value, limit: Self::ROOM_LIMIT });
            }
        }

        for (name, value) in [
            ("branching_factor", self.branching_factor),
            ("elite_room_ratio", self.elite_room_ratio),
            ("shop_room_ratio", self.shop_room_ratio),
            ("rest_room_ratio", self.rest_room_ratio),
            ("treasure_room_ratio", self.treasure_room_ratio),
            ("secret_edge_ratio", self.secret_edge_ratio),
        ] {
            // NaN fails the range check as well.
            if !(0.0..=1.0).contains(&value) {
                return Err(RulesError::ProbabilityOutOfRange { name, value });
            }
        }

        let sum = self.special_room_ratio_sum();
        if sum > 1.0 + RATIO_SUM_TOLERANCE {
            return Err(RulesError::RatiosExceedOne { sum });
        }
        Ok(())
    }

    /// Share of assignable rooms that end up `Normal`.
    pub fn normal_room_ratio(&self) -> f64 {
        (1.0 - self.special_room_ratio_sum()).max(0.0)
    }

    /// Index of the final floor.
    pub fn last_floor(&self) -> usize {
        self.total_floors.saturating_sub(1)
    }

    fn special_room_ratio_sum(&self) -> f64 {
        self.elite_room_ratio
            + self.shop_room_ratio
            + self.rest_room_ratio
            + self.treasure_room_ratio
    }
}
