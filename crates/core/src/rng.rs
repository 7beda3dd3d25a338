//! RNG module - deterministic gem generation
//!
//! Gem kinds for the initial fill and for refills are drawn from a simple LCG so
//! that a battle seeded with the same value produces the same boards.
//! Draws can exclude kinds that would immediately complete a run.

use arrayvec::ArrayVec;

use crate::types::{GemType, GEM_KIND_COUNT};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // High bits of an LCG are far better distributed than the low ones.
        ((u64::from(self.next_u32()) * u64::from(max)) >> 32) as u32
    }

    /// Draw a gem kind, avoiding `excluded` when at least one other kind remains
    pub fn draw_kind(&mut self, excluded: &[GemType]) -> GemType {
        let allowed: ArrayVec<GemType, GEM_KIND_COUNT> = GemType::ALL
            .iter()
            .copied()
            .filter(|kind| !excluded.contains(kind))
            .collect();

        if allowed.is_empty() {
            return GemType::ALL[self.next_range(GEM_KIND_COUNT as u32) as usize];
        }
        allowed[self.next_range(allowed.len() as u32) as usize]
    }

    /// Current RNG state (for restarting a battle with the same sequence)
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
