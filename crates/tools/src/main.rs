use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dungeon_core::{DungeonGenerator, DungeonGraph, generate_random_seed};
use dungeon_tools::logging;
use dungeon_tools::render::{Format, render};
use dungeon_tools::rules_file::load_rules;
use dungeon_tools::stats::BatchReport;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log generation retries and summaries to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a single dungeon and print it
    Generate {
        /// Seed for the generator; a fresh random seed when omitted
        #[arg(short, long)]
        seed: Option<u64>,
        /// TOML rules file; library defaults when omitted
        #[arg(short, long)]
        rules: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = Format::Summary)]
        format: Format,
    },
    /// Generate many dungeons and report aggregate statistics
    Batch {
        #[arg(short = 'n', long, default_value_t = 100)]
        runs: u64,
        #[arg(short, long, default_value_t = 0)]
        base_seed: u64,
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },
    /// Check a JSON graph file and print every violation
    Validate {
        #[arg(short, long)]
        graph: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    logging::init(args.verbose)?;

    match args.command {
        Command::Generate { seed, rules, format } => {
            let rules = load_rules(rules.as_deref())?;
            let seed = seed.unwrap_or_else(generate_random_seed);
            let graph = DungeonGenerator::new(rules)
                .generate(seed)
                .with_context(|| format!("generation failed for seed {seed}"))?;
            print!("{}", render(&graph, format)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Batch { runs, base_seed, rules } => {
            let rules = load_rules(rules.as_deref())?;
            let generator = DungeonGenerator::new(rules.clone());
            let mut report = BatchReport::new(rules);
            for offset in 0..runs {
                let seed = base_seed.wrapping_add(offset);
                report.record(seed, generator.generate(seed));
            }
            print!("{report}");
            Ok(if report.is_clean() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Validate { graph } => {
            let data = fs::read_to_string(&graph)
                .with_context(|| format!("failed to read graph file: {}", graph.display()))?;
            let graph: DungeonGraph =
                serde_json::from_str(&data).context("failed to deserialize graph JSON")?;

            let (valid, violations) = graph.validate();
            if valid {
                println!("valid: {} rooms, {} passages", graph.node_count(), graph.edge_count());
                return Ok(ExitCode::SUCCESS);
            }
            println!("invalid: {} violations", violations.len());
            for violation in &violations {
                println!("  {violation}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
