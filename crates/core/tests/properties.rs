use dungeon_core::{DungeonGenerator, EdgeType, GenerationError, GenerationRules, RoomType};
use proptest::prelude::*;

fn valid_rules() -> impl Strategy<Value = GenerationRules> {
    (
        2_usize..10,
        1_usize..4,
        0_usize..3,
        0.0_f64..=1.0,
        1_usize..4,
        any::<bool>(),
        (0.0_f64..0.3, 0.0_f64..0.3, 0.0_f64..0.3),
        0_usize..20,
    )
        .prop_map(
            |(
                total_floors,
                min_nodes,
                extra_nodes,
                branching_factor,
                max_branches,
                include_boss_room,
                (elite, shop, rest),
                slack,
            )| {
                let max_nodes = min_nodes + extra_nodes;
                let min_rooms = total_floors;
                GenerationRules {
                    min_rooms,
                    max_rooms: min_rooms + slack,
                    total_floors,
                    min_nodes_per_floor: min_nodes,
                    max_nodes_per_floor: max_nodes,
                    branching_factor,
                    max_branches,
                    include_boss_room,
                    elite_room_ratio: elite,
                    shop_room_ratio: shop,
                    rest_room_ratio: rest,
                    ..GenerationRules::default()
                }
            },
        )
}

/// Rules whose every floor can be reached from the one above, with room bounds wide enough
/// that any floor plan fits. These must always produce a graph.
fn feasible_rules() -> impl Strategy<Value = GenerationRules> {
    (2_usize..12, 1_usize..4, 0_usize..3, 0.0_f64..=1.0, 0_usize..3, any::<bool>()).prop_map(
        |(total_floors, min_nodes, extra_nodes, branching_factor, extra_branches, boss)| {
            let max_nodes = min_nodes + extra_nodes;
            GenerationRules {
                min_rooms: 1,
                max_rooms: total_floors * max_nodes,
                total_floors,
                min_nodes_per_floor: min_nodes,
                max_nodes_per_floor: max_nodes,
                branching_factor,
                max_branches: min_nodes.max(2) + extra_branches,
                include_boss_room: boss,
                ..GenerationRules::default()
            }
        },
    )
}

#[test]
fn fully_branching_ten_floor_dungeons_always_generate() {
    let rules = GenerationRules {
        min_rooms: 1,
        max_rooms: 200,
        total_floors: 10,
        min_nodes_per_floor: 2,
        max_nodes_per_floor: 4,
        branching_factor: 1.0,
        max_branches: 2,
        include_boss_room: true,
        ..GenerationRules::default()
    };
    let generator = DungeonGenerator::new(rules);
    for seed in 0..2_000 {
        if let Err(err) = generator.generate(seed) {
            panic!("seed={seed}: {err}");
        }
    }
}

#[test]
fn two_wide_floors_with_two_branches_always_generate() {
    let rules = GenerationRules {
        min_rooms: 1,
        max_rooms: 100,
        total_floors: 8,
        min_nodes_per_floor: 2,
        max_nodes_per_floor: 2,
        max_branches: 2,
        max_attempts: 1,
        ..GenerationRules::default()
    };
    let generator = DungeonGenerator::new(rules);
    for seed in 0..500 {
        let graph = generator.generate(seed).unwrap_or_else(|err| panic!("seed={seed}: {err}"));
        assert_eq!(graph.node_count(), 14, "seed={seed}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn feasible_rules_never_report_failure(rules in feasible_rules(), seed in any::<u64>()) {
        prop_assert_eq!(rules.validate(), Ok(()));
        let outcome = DungeonGenerator::new(rules.clone()).generate(seed);
        prop_assert!(outcome.is_ok(), "seed={} rules={:?} outcome={:?}", seed, rules, outcome);
    }

    #[test]
    fn successful_generation_always_honors_the_rules(
        rules in valid_rules(),
        seed in any::<u64>(),
    ) {
        prop_assert_eq!(rules.validate(), Ok(()));
        let generator = DungeonGenerator::new(rules.clone());
        match generator.generate(seed) {
            Ok(graph) => {
                let (valid, violations) = graph.validate();
                prop_assert!(valid, "seed={} violations={:?}", seed, violations);
                prop_assert!((rules.min_rooms..=rules.max_rooms).contains(&graph.node_count()));
                for node in graph.all_nodes() {
                    prop_assert!(graph.out_degree(node.id) <= rules.max_branches);
                }
                prop_assert!(graph.all_edges().all(|edge| edge.edge_type != EdgeType::Locked));
                prop_assert_eq!(
                    graph.room_type_histogram()[&RoomType::Boss],
                    usize::from(rules.include_boss_room)
                );
                prop_assert_eq!(graph.reachable_from(graph.entry_id()).len(), graph.node_count());

                let again = generator.generate(seed).map(|graph| graph.fingerprint());
                prop_assert_eq!(again, Ok(graph.fingerprint()));
            }
            Err(GenerationError::Unsatisfiable { attempts, .. })
            | Err(GenerationError::BoundsUnsatisfiable { attempts, .. }) => {
                prop_assert_eq!(attempts, rules.max_attempts);
            }
            Err(other) => {
                return Err(TestCaseError::fail(format!("seed={seed}: unexpected {other}")));
            }
        }
    }
}
