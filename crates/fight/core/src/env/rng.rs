//! RNG oracle for fight randomness.
//!
//! Effect rolls, critical hits and critical failures all draw from an
//! injected [`RngOracle`], so tests can script every outcome and replays can
//! reuse a seed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of randomness consumed by the fight rules.
pub trait RngOracle: Send + Sync {
    /// Random integer in `[min, max]` (inclusive). Returns `min` when `max <= min`.
    fn int_in_range(&self, min: i32, max: i32) -> i32;

    /// Returns true with a probability of `percent` / 100.
    ///
    /// Values at or below 0 never succeed, values at or above 100 always do.
    fn percentage_chance(&self, percent: i32) -> bool {
        if percent <= 0 {
            return false;
        }
        if percent >= 100 {
            return true;
        }
        self.int_in_range(1, 100) <= percent
    }
}

/// Seeded PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// The state is advanced atomically so the generator can sit behind a shared
/// reference inside the environment.
#[derive(Debug)]
pub struct PcgRng {
    state: AtomicU64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self {
            state: AtomicU64::new(Self::pcg_step(seed)),
        }
    }

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    fn next_u32(&self) -> u32 {
        let previous = self
            .state
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |state| {
                Some(Self::pcg_step(state))
            })
            .unwrap_or_else(|state| state);
        Self::pcg_output(previous)
    }
}

impl RngOracle for PcgRng {
    fn int_in_range(&self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (i64::from(max) - i64::from(min) + 1) as u64;
        let offset = u64::from(self.next_u32()) % span;
        (i64::from(min) + offset as i64) as i32
    }
}
