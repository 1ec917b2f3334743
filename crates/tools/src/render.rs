//! Text renderings of a generated graph for inspection.

use std::fmt;

use anyhow::{Context, Result};
use clap::ValueEnum;
use dungeon_core::{DungeonGraph, EdgeType, RoomType};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Counts, histogram, and entry-to-boss route.
    #[default]
    Summary,
    Json,
    /// Graphviz digraph with one rank per floor.
    Dot,
}

pub fn render(graph: &DungeonGraph, format: Format) -> Result<String> {
    match format {
        Format::Summary => Ok(summary(graph)),
        Format::Json => {
            serde_json::to_string_pretty(graph).context("failed to serialize graph to JSON")
        }
        Format::Dot => Ok(dot(graph)),
    }
}

pub fn summary(graph: &DungeonGraph) -> String {
    Summary(graph).to_string()
}

pub fn dot(graph: &DungeonGraph) -> String {
    Dot(graph).to_string()
}

struct Summary<'a>(&'a DungeonGraph);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.0;
        writeln!(f, "seed:          {}", graph.seed())?;
        writeln!(f, "fingerprint:   {:016x}", graph.fingerprint())?;
        writeln!(f, "floors:        {}", graph.total_floors())?;
        writeln!(f, "rooms:         {}", graph.node_count())?;
        writeln!(f, "passages:      {}", graph.edge_count())?;
        writeln!(f, "branch points: {}", graph.branch_point_count())?;
        match graph.shortest_path_length() {
            Some(length) => writeln!(f, "boss distance: {length}")?,
            None => writeln!(f, "boss distance: -")?,
        }

        writeln!(f, "room types:")?;
        for (room_type, count) in graph.room_type_histogram() {
            if count > 0 {
                writeln!(f, "  {room_type:?}: {count}")?;
            }
        }

        if let Some(boss) = graph.boss_id() {
            let route: Vec<String> = graph
                .shortest_path(graph.entry_id(), boss)
                .iter()
                .map(|node| format!("{}({:?})", node.id, node.room_type))
                .collect();
            writeln!(f, "route:         {}", route.join(" -> "))?;
        }
        Ok(())
    }
}

struct Dot<'a>(&'a DungeonGraph);

impl fmt::Display for Dot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.0;
        writeln!(f, "digraph dungeon {{")?;
        writeln!(f, "    rankdir=TB;")?;
        for floor in 0..graph.total_floors() {
            let ids: Vec<String> =
                graph.nodes_on_floor(floor).map(|node| node.id.to_string()).collect();
            if !ids.is_empty() {
                writeln!(f, "    {{ rank=same; {}; }}", ids.join("; "))?;
            }
        }
        for node in graph.all_nodes() {
            writeln!(
                f,
                "    {} [label=\"{} {:?}\", shape={}];",
                node.id,
                node.id,
                node.room_type,
                room_shape(node.room_type)
            )?;
        }
        for edge in graph.all_edges() {
            let style = match edge.edge_type {
                EdgeType::Normal => "solid",
                EdgeType::Secret => "dashed",
                EdgeType::Locked => "bold",
            };
            writeln!(f, "    {} -> {} [style={style}];", edge.from, edge.to)?;
        }
        writeln!(f, "}}")
    }
}

fn room_shape(room_type: RoomType) -> &'static str {
    match room_type {
        RoomType::Start => "house",
        RoomType::Boss => "doubleoctagon",
        RoomType::Elite => "diamond",
        RoomType::Shop => "box",
        RoomType::Rest => "ellipse",
        RoomType::Treasure => "star",
        RoomType::Normal => "circle",
    }
}
