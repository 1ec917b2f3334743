//! Procedural dungeon graph generation split into coherent submodules.

mod builder;
mod floors;
mod generator;
mod rooms;
mod seed;

pub use generator::DungeonGenerator;
pub use rooms::RoomTypeAssigner;
pub use seed::{SeedSource, generate_random_seed};

use crate::error::GenerationError;
use crate::graph::DungeonGraph;
use crate::rules::GenerationRules;

pub fn generate(rules: &GenerationRules, seed: u64) -> Result<DungeonGraph, GenerationError> {
    DungeonGenerator::new(rules.clone()).generate(seed)
}

#[cfg(test)]
mod tests {
    use super::{DungeonGenerator, GenerationRules};

    #[test]
    fn generate_matches_dungeon_generator_output() {
        let rules = GenerationRules::default();
        let seed = 123_u64;

        let from_helper = super::generate(&rules, seed);
        let from_generator = DungeonGenerator::new(rules).generate(seed);

        assert_eq!(from_helper, from_generator);
    }
}
