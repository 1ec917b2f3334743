//! Deterministic random stream and seed helpers for graph generation.

use std::cell::RefCell;
use std::process;
use std::ptr;
use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

/// Reproducible pseudo-random stream built from a single seed.
///
/// Two sources created from the same seed and driven with the same sequence of calls
/// yield identical values.
#[derive(Clone, Debug)]
pub struct SeedSource {
    rng: ChaCha8Rng,
}

impl SeedSource {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(mix_seed(seed)) }
    }

    /// Uniform integer in `min..max_exclusive`. An empty or single-value range yields `min`.
    pub fn next_int(&mut self, min: usize, max_exclusive: usize) -> usize {
        if max_exclusive <= min + 1 {
            return min;
        }
        let span = (max_exclusive - min) as u64;
        // Lemire's widening multiply with rejection keeps the draw unbiased.
        let threshold = span.wrapping_neg() % span;
        loop {
            let wide = u128::from(self.rng.next_u64()) * u128::from(span);
            if (wide as u64) >= threshold {
                return min + (wide >> 64) as usize;
            }
        }
    }

    /// Uniform float in `[0, 1)` with 53 bits of precision.
    pub fn next_float01(&mut self) -> f64 {
        (self.rng.next_u64() >> 11) as f64 * (1.0 / (1_u64 << 53) as f64)
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_float01() < p
    }

    /// Picks a value with probability proportional to its weight.
    ///
    /// Entries whose weight is not a positive finite number (zero, negative, NaN, infinite)
    /// can never be picked. Returns `None` when no entry is eligible. Always consumes exactly
    /// one draw otherwise.
    pub fn weighted_choice<T: Copy>(&mut self, weights: &[(T, f64)]) -> Option<T> {
        let total: f64 =
            weights.iter().map(|&(_, weight)| weight).filter(|&w| is_eligible_weight(w)).sum();
        if total <= 0.0 || !total.is_finite() {
            return None;
        }

        let roll = self.next_float01() * total;
        let mut cumulative = 0.0;
        let mut last_eligible = None;
        for &(value, weight) in weights {
            if !is_eligible_weight(weight) {
                continue;
            }
            cumulative += weight;
            if roll < cumulative {
                return Some(value);
            }
            last_eligible = Some(value);
        }
        // Rounding can leave `roll` a hair above the final cumulative sum.
        last_eligible
    }

    /// Independent child stream; advances this source by one draw.
    pub fn fork(&mut self) -> Self {
        Self::new(self.rng.next_u64())
    }
}

thread_local! {
    static RUNTIME_RNG: RefCell<ChaCha8Rng> =
        RefCell::new(ChaCha8Rng::seed_from_u64(mix_seed(runtime_entropy())));
}

/// Fresh seed for callers that do not need reproducibility. Draws from a per-thread ChaCha8
/// stream keyed once from the clock, the process id, and the thread's stack address.
pub fn generate_random_seed() -> u64 {
    RUNTIME_RNG.with_borrow_mut(|rng| rng.next_u64())
}

fn runtime_entropy() -> u64 {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |since| since.as_nanos());
    let marker = 0_u8;
    let stack = ptr::from_ref(&marker).addr() as u64;
    (nanos as u64) ^ ((nanos >> 64) as u64) ^ (u64::from(process::id()) << 32) ^ stack
}

fn is_eligible_weight(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}

/// Splitmix64 finalizer, so nearby seeds start far apart.
pub(super) fn mix_seed(mut value: u64) -> u64 {
    value ^= 0x9E37_79B9_7F4A_7C15;
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}
