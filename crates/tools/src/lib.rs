//! Shared plumbing for the dungeon command-line tools.

pub mod logging;
pub mod render;
pub mod rules_file;
pub mod stats;
