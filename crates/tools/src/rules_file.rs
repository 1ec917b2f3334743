//! TOML rules files. Every field is optional; missing fields take the library defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dungeon_core::GenerationRules;

/// Loads and checks rules from `path`, or returns the defaults when no path is given.
pub fn load_rules(path: Option<&Path>) -> Result<GenerationRules> {
    let Some(path) = path else {
        return Ok(GenerationRules::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file: {}", path.display()))?;
    parse_rules(&text).with_context(|| format!("invalid rules file: {}", path.display()))
}

pub fn parse_rules(text: &str) -> Result<GenerationRules> {
    let rules: GenerationRules = toml::from_str(text).context("failed to parse TOML")?;
    rules.validate()?;
    Ok(rules)
}
