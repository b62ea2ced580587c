//! Injectable suspense update policies.
//!
//! The suspense trajectory has no single correct formula; it is a design
//! target, not an invariant. The policy seam lets tests pin deterministic
//! increments while production runs keep the stochastic drift.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Decides how each plot point moves the suspense level.
pub trait SuspensePolicy: Send + Sync {
    /// Level after a collision (defused or not).
    fn on_collision(&mut self, current: u8) -> u8;

    /// Level after routine investigative progress.
    fn on_progress(&mut self, current: u8) -> u8;

    /// Level after a mundane obstacle.
    fn on_obstacle(&mut self, current: u8) -> u8;

    /// Level the resolution plot point carries.
    fn resolution_level(&self) -> u8;
}

/// Default monotonically-biased policy.
///
/// Collisions and near-misses trend suspense upward; routine progress
/// may hold steady or nudge up; obstacles hold. The curve is clamped to
/// `[1, max_level]` and the resolution pegs the ceiling.
pub struct RisingTensionPolicy {
    max_level: u8,
    rng: StdRng,
}

impl RisingTensionPolicy {
    /// Creates the policy with the configured ceiling and RNG seed.
    pub fn new(max_level: u8, seed: u64) -> Self {
        Self {
            max_level: max_level.max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn clamp(&self, level: u8) -> u8 {
        level.clamp(1, self.max_level)
    }
}

impl SuspensePolicy for RisingTensionPolicy {
    fn on_collision(&mut self, current: u8) -> u8 {
        let bump = self.rng.gen_range(1..=2);
        self.clamp(current.saturating_add(bump))
    }

    fn on_progress(&mut self, current: u8) -> u8 {
        let bump = self.rng.gen_range(0..=1);
        self.clamp(current.saturating_add(bump))
    }

    fn on_obstacle(&mut self, current: u8) -> u8 {
        self.clamp(current)
    }

    fn resolution_level(&self) -> u8 {
        self.max_level
    }
}
