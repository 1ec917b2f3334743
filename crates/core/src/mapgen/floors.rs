//! Per-floor room counts, steered into the total room bounds.

use crate::rules::GenerationRules;

use super::seed::SeedSource;

/// Draws a room count for every floor and nudges the counts until the total lies in
/// `min_rooms..=max_rooms`.
///
/// Floor 0 always holds the single entry room and, with a boss room, the last floor holds
/// only the boss. A floor never gets more rooms than its predecessor can reach with
/// `max_branches` passages each, unless even `min_nodes_per_floor` exceeds that reach; such
/// layouts are left for connectivity repair to reject. Returns `None` when no floor can be
/// adjusted any further.
pub(super) fn plan_floor_sizes(
    rules: &GenerationRules,
    source: &mut SeedSource,
) -> Option<Vec<usize>> {
    let mut sizes: Vec<usize> = Vec::with_capacity(rules.total_floors);
    for floor in 0..rules.total_floors {
        let size = if is_fixed_floor(rules, floor) {
            1
        } else {
            let reach = sizes[floor - 1].saturating_mul(rules.max_branches);
            let upper = if reach >= rules.min_nodes_per_floor {
                rules.max_nodes_per_floor.min(reach)
            } else {
                rules.max_nodes_per_floor
            };
            source.next_int(rules.min_nodes_per_floor, upper + 1)
        };
        sizes.push(size);
    }

    loop {
        let total: usize = sizes.iter().sum();
        let candidates: Vec<usize> = if total > rules.max_rooms {
            (0..sizes.len()).filter(|&floor| can_shrink(rules, &sizes, floor)).collect()
        } else if total < rules.min_rooms {
            (0..sizes.len()).filter(|&floor| can_grow(rules, &sizes, floor)).collect()
        } else {
            return Some(sizes);
        };

        if candidates.is_empty() {
            return None;
        }
        let floor = candidates[source.next_int(0, candidates.len())];
        if total > rules.max_rooms {
            sizes[floor] -= 1;
        } else {
            sizes[floor] += 1;
        }
    }
}

pub(super) fn is_fixed_floor(rules: &GenerationRules, floor: usize) -> bool {
    floor == 0 || (rules.include_boss_room && floor == rules.last_floor())
}

fn can_shrink(rules: &GenerationRules, sizes: &[usize], floor: usize) -> bool {
    if is_fixed_floor(rules, floor) || sizes[floor] <= rules.min_nodes_per_floor {
        return false;
    }
    sizes
        .get(floor + 1)
        .is_none_or(|&next| (sizes[floor] - 1).saturating_mul(rules.max_branches) >= next)
}

fn can_grow(rules: &GenerationRules, sizes: &[usize], floor: usize) -> bool {
    if is_fixed_floor(rules, floor) || sizes[floor] >= rules.max_nodes_per_floor {
        return false;
    }
    sizes[floor] < sizes[floor - 1].saturating_mul(rules.max_branches)
}
