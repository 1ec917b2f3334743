//! Aggregate statistics over many generated graphs.

use std::collections::BTreeMap;
use std::fmt;

use dungeon_core::{DungeonGraph, GenerationError, GenerationRules, RoomType};

/// Running totals for a batch of generation calls with one set of rules.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchReport {
    rules: GenerationRules,
    runs: usize,
    invalid: Vec<(u64, Vec<String>)>,
    failures: Vec<(u64, GenerationError)>,
    room_totals: BTreeMap<RoomType, usize>,
    path_length_sum: usize,
    path_length_samples: usize,
    branch_point_sum: usize,
}

impl BatchReport {
    pub fn new(rules: GenerationRules) -> Self {
        Self {
            rules,
            runs: 0,
            invalid: Vec::new(),
            failures: Vec::new(),
            room_totals: RoomType::ALL.iter().map(|&room_type| (room_type, 0)).collect(),
            path_length_sum: 0,
            path_length_samples: 0,
            branch_point_sum: 0,
        }
    }

    pub fn record(&mut self, seed: u64, outcome: Result<DungeonGraph, GenerationError>) {
        self.runs += 1;
        let graph = match outcome {
            Ok(graph) => graph,
            Err(err) => {
                log::warn!("seed {seed}: {err}");
                self.failures.push((seed, err));
                return;
            }
        };

        let (valid, violations) = graph.validate();
        if !valid {
            log::warn!("seed {seed}: {} violations", violations.len());
            self.invalid.push((seed, violations));
        }
        for (room_type, count) in graph.room_type_histogram() {
            *self.room_totals.entry(room_type).or_default() += count;
        }
        if let Some(length) = graph.shortest_path_length() {
            self.path_length_sum += length;
            self.path_length_samples += 1;
        }
        self.branch_point_sum += graph.branch_point_count();
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    /// True when every run produced a graph and every graph validated.
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty() && self.failures.is_empty()
    }

    /// Observed share of `room_type` among rooms that received a weighted type.
    pub fn observed_ratio(&self, room_type: RoomType) -> Option<f64> {
        let assignable = self.assignable_rooms();
        let count = self.room_totals.get(&room_type).copied().unwrap_or(0);
        (assignable > 0).then(|| count as f64 / assignable as f64)
    }

    pub fn mean_path_length(&self) -> Option<f64> {
        (self.path_length_samples > 0)
            .then(|| self.path_length_sum as f64 / self.path_length_samples as f64)
    }

    pub fn mean_branch_points(&self) -> Option<f64> {
        let generated = self.runs - self.failures.len();
        (generated > 0).then(|| self.branch_point_sum as f64 / generated as f64)
    }

    fn assignable_rooms(&self) -> usize {
        self.room_totals
            .iter()
            .filter(|(room_type, _)| !matches!(room_type, RoomType::Start | RoomType::Boss))
            .map(|(_, count)| count)
            .sum()
    }

    fn configured_ratio(&self, room_type: RoomType) -> Option<f64> {
        match room_type {
            RoomType::Elite => Some(self.rules.elite_room_ratio),
            RoomType::Shop => Some(self.rules.shop_room_ratio),
            RoomType::Rest => Some(self.rules.rest_room_ratio),
            RoomType::Treasure => Some(self.rules.treasure_room_ratio),
            RoomType::Normal => Some(self.rules.normal_room_ratio()),
            RoomType::Start | RoomType::Boss => None,
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "runs:      {}", self.runs)?;
        writeln!(f, "failed:    {}", self.failures.len())?;
        writeln!(f, "invalid:   {}", self.invalid.len())?;
        match self.mean_path_length() {
            Some(mean) => writeln!(f, "mean boss distance: {mean:.2}")?,
            None => writeln!(f, "mean boss distance: -")?,
        }
        match self.mean_branch_points() {
            Some(mean) => writeln!(f, "mean branch points: {mean:.2}")?,
            None => writeln!(f, "mean branch points: -")?,
        }

        writeln!(f, "room type      count  observed  configured")?;
        for (&room_type, &count) in &self.room_totals {
            let label = format!("{room_type:?}");
            match (self.observed_ratio(room_type), self.configured_ratio(room_type)) {
                (Some(observed), Some(configured)) => writeln!(
                    f,
                    "{label:<12} {count:>7}  {observed:>8.3}  {configured:>10.3}"
                )?,
                _ => writeln!(f, "{label:<12} {count:>7}")?,
            }
        }

        for (seed, err) in &self.failures {
            writeln!(f, "seed {seed} failed: {err}")?;
        }
        for (seed, violations) in &self.invalid {
            writeln!(f, "seed {seed} invalid:")?;
            for violation in violations {
                writeln!(f, "  {violation}")?;
            }
        }
        Ok(())
    }
}
