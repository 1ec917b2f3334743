use anyhow::{Result, bail};
use clap::Parser;
use dungeon_core::{DungeonGenerator, GenerationError, GenerationRules};
use dungeon_tools::logging;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    cases: u32,
    #[arg(short, long)]
    verbose: bool,
}

fn pick(rng: &mut ChaCha8Rng, min: usize, max_inclusive: usize) -> usize {
    min + (rng.next_u64() % (max_inclusive - min + 1) as u64) as usize
}

fn ratio(rng: &mut ChaCha8Rng, max: f64) -> f64 {
    (rng.next_u64() >> 11) as f64 / (1_u64 << 53) as f64 * max
}

/// Random rules that usually, but not always, pass validation.
fn random_rules(rng: &mut ChaCha8Rng) -> GenerationRules {
    let total_floors = pick(rng, 1, 12);
    let min_nodes_per_floor = pick(rng, 1, 4);
    let min_rooms = pick(rng, 1, total_floors * min_nodes_per_floor + 2);
    GenerationRules {
        min_rooms,
        max_rooms: min_rooms + pick(rng, 0, 25),
        total_floors,
        min_nodes_per_floor,
        max_nodes_per_floor: min_nodes_per_floor + pick(rng, 0, 3),
        branching_factor: ratio(rng, 1.0),
        max_branches: pick(rng, 1, 4),
        include_boss_room: rng.next_u64() % 4 != 0,
        elite_room_ratio: ratio(rng, 0.4),
        shop_room_ratio: ratio(rng, 0.4),
        rest_room_ratio: ratio(rng, 0.4),
        treasure_room_ratio: ratio(rng, 0.2),
        secret_edge_ratio: ratio(rng, 0.5),
        max_attempts: pick(rng, 1, 10),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose)?;

    println!("Starting fuzz harness on seed {} for {} cases...", args.seed, args.cases);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let (mut generated, mut rejected, mut exhausted) = (0_u32, 0_u32, 0_u32);

    for case in 0..args.cases {
        let rules = random_rules(&mut rng);
        let seed = rng.next_u64();
        match DungeonGenerator::new(rules.clone()).generate(seed) {
            Ok(graph) => {
                let (valid, violations) = graph.validate();
                if !valid {
                    bail!("case {case}: seed {seed} produced an invalid graph: {violations:?}");
                }
                generated += 1;
            }
            Err(GenerationError::InvalidRules(err)) => {
                if rules.validate().is_ok() {
                    bail!("case {case}: accepted rules reported invalid: {err}");
                }
                rejected += 1;
            }
            Err(
                err @ (GenerationError::Unsatisfiable { .. }
                | GenerationError::BoundsUnsatisfiable { .. }),
            ) => {
                log::debug!("case {case}: {err} with {rules:?}");
                exhausted += 1;
            }
            Err(err @ GenerationError::InternalViolation(_)) => {
                bail!("case {case}: seed {seed} with {rules:?}: {err}");
            }
        }
    }

    println!("Fuzzing completed: {generated} generated, {rejected} rejected, {exhausted} gave up.");
    Ok(())
}
