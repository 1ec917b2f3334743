//! Weighted room type selection for every room except the entry and the boss.

use crate::rules::GenerationRules;
use crate::types::{DungeonNode, NodeId, RoomType};

use super::builder::Topology;
use super::seed::SeedSource;

/// Classifies rooms into the closed set of room kinds from the configured ratios.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomTypeAssigner {
    weights: [(RoomType, f64); 5],
}

impl RoomTypeAssigner {
    pub fn new(rules: &GenerationRules) -> Self {
        Self {
            weights: [
                (RoomType::Elite, rules.elite_room_ratio),
                (RoomType::Shop, rules.shop_room_ratio),
                (RoomType::Rest, rules.rest_room_ratio),
                (RoomType::Treasure, rules.treasure_room_ratio),
                (RoomType::Normal, rules.normal_room_ratio()),
            ],
        }
    }

    /// One weighted draw. Falls back to `Normal` if every weight is zero.
    pub fn draw(&self, source: &mut SeedSource) -> RoomType {
        source.weighted_choice(&self.weights).unwrap_or(RoomType::Normal)
    }

    /// Builds the typed node list. Rooms are visited by ascending floor, then ascending id,
    /// so a fixed seed always consumes the stream in the same order.
    pub(super) fn assign(
        &self,
        topology: &Topology,
        entry_id: NodeId,
        boss_id: Option<NodeId>,
        source: &mut SeedSource,
    ) -> Vec<DungeonNode> {
        let mut nodes = Vec::with_capacity(topology.node_count());
        for (floor, ids) in topology.floors.iter().enumerate() {
            for &id in ids {
                let room_type = if id == entry_id {
                    RoomType::Start
                } else if Some(id) == boss_id {
                    RoomType::Boss
                } else {
                    self.draw(source)
                };
                nodes.push(DungeonNode { id, room_type, floor });
            }
        }
        nodes
    }
}
