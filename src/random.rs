//! Injectable randomness for every snowfall draw.
//!
//! Sizes, spawn points, group assignment, lifetimes and wind delays all come
//! from one [`SnowRng`] owned by the view. Seed it for reproducible runs:
//!
//! ```ignore
//! let view = SnowView::with_rng(bounds, canvas, SnowConfig::default(), SnowRng::seeded(42))?;
//! ```

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use std::ops::Range;
use std::time::Duration;

use crate::config::MAX_TIMER_SECS;
use crate::particle::GroupId;

/// Random source used by the simulation.
///
/// Wraps any [`RngCore`], so tests can plug in a mock generator.
pub struct SnowRng {
    rng: Box<dyn RngCore + Send>,
}

impl SnowRng {
    /// Deterministic generator from a seed.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    /// Generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::from_rng(SmallRng::from_entropy())
    }

    /// Wrap an arbitrary generator.
    pub fn from_rng<R: RngCore + Send + 'static>(rng: R) -> Self {
        Self { rng: Box::new(rng) }
    }

    /// Uniform integer size in `[min, max]`.
    pub fn size_in(&mut self, min: u32, max: u32) -> u32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.rng.gen_range(lo..=hi)
    }

    /// Spawn point above the viewport.
    ///
    /// `x` is a whole point in `[1, width]`; `y` lies in `[-height, 0)`.
    pub fn spawn_point(&mut self, viewport: Vec2, height: f32) -> Vec2 {
        let width = viewport.x.max(0.0) as u32;
        let x = if width == 0 {
            1
        } else {
            self.rng.gen_range(0..width) + 1
        };
        let y = if height > 0.0 {
            self.rng.gen_range(0.0..height) - height
        } else {
            0.0
        };
        Vec2::new(x as f32, y)
    }

    /// Fair coin between the two force groups.
    pub fn group(&mut self) -> GroupId {
        if self.rng.gen_bool(0.5) {
            GroupId::A
        } else {
            GroupId::B
        }
    }

    /// Uniform duration in `range` seconds.
    ///
    /// Empty or non-finite ranges collapse to their start. The result is
    /// clamped to `[0, MAX_TIMER_SECS]`; NaN becomes zero.
    pub fn seconds_in(&mut self, range: &Range<f32>) -> Duration {
        let finite = range.start.is_finite() && range.end.is_finite();
        let secs = if finite && range.start < range.end {
            self.rng.gen_range(range.clone())
        } else {
            range.start
        };
        Duration::try_from_secs_f32(secs.clamp(0.0, MAX_TIMER_SECS)).unwrap_or(Duration::ZERO)
    }
}

impl std::fmt::Debug for SnowRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowRng").finish_non_exhaustive()
    }
}

impl Default for SnowRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
