pub mod error;
pub mod graph;
pub mod mapgen;
pub mod rules;
pub mod run;
pub mod types;

pub use error::{GenerationError, RulesError, RunError};
pub use graph::validate::Violation;
pub use graph::{DungeonGraph, GraphRecord};
pub use mapgen::{DungeonGenerator, RoomTypeAssigner, SeedSource, generate, generate_random_seed};
pub use rules::GenerationRules;
pub use run::DungeonRun;
pub use types::*;
