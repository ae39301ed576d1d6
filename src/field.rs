//! The particle field: live flakes, spawning and expiry.
//!
//! A [`ParticleField`] owns every live [`Snowflake`] in spawn order and
//! enforces the population rules:
//!
//! - Nothing spawns while the field is stopped or at capacity.
//! - Each flake joins exactly one force group, chosen by coin flip.
//! - Each flake schedules its own expiry; an expiring flake is replaced
//!   immediately while the field is running.
//! - Stopping cancels every pending expiry and clears the display.
//!
//! The field does not own the groups, timers, random source or canvas. Those
//! are borrowed through a [`FieldContext`] for the duration of each call, so
//! every mutation completes before the next timer callback runs.

use glam::Vec2;
use log::{debug, trace, warn};
use std::collections::HashMap;
use std::ops::Range;

use crate::canvas::FlakeCanvas;
use crate::config::{
    SnowConfig, DEFAULT_CAPACITY, DEFAULT_MAX_SIZE, DEFAULT_MIN_SIZE, DEFAULT_SPAWN_HEIGHT,
};
use crate::force::ForceGroups;
use crate::particle::{FlakeId, Snowflake};
use crate::random::SnowRng;
use crate::scheduler::{SnowEvent, SnowTimers, TimerHandle};
use crate::wind::WindScheduler;

/// Everything a field operation needs besides the field itself.
pub struct FieldContext<'a, C: FlakeCanvas> {
    pub groups: &'a mut ForceGroups,
    pub timers: &'a mut SnowTimers,
    pub rng: &'a mut SnowRng,
    pub canvas: &'a mut C,
    /// Current viewport size in points.
    pub viewport: Vec2,
}

/// Owner of all live flakes and their spawn/expire policy.
#[derive(Debug)]
pub struct ParticleField {
    flakes: Vec<Snowflake>,
    capacity: usize,
    min_size: u32,
    max_size: u32,
    spawn_height: f32,
    lifetime: Range<f32>,
    running: bool,
    next_id: u64,
    expiries: HashMap<FlakeId, TimerHandle>,
}

impl ParticleField {
    /// Create a stopped, empty field.
    pub fn new(capacity: usize) -> Self {
        Self {
            flakes: Vec::with_capacity(capacity),
            capacity,
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            spawn_height: DEFAULT_SPAWN_HEIGHT,
            lifetime: 5.0..6.0,
            running: false,
            next_id: 0,
            expiries: HashMap::new(),
        }
    }

    /// Create a stopped, empty field from a configuration.
    pub fn from_config(config: &SnowConfig) -> Self {
        let mut field = Self::new(config.capacity);
        field.spawn_height = config.spawn_height;
        field.lifetime = config.lifetime.clone();
        field.configure(config.min_size, config.max_size);
        field
    }

    /// Set the size range for future spawns.
    ///
    /// Live flakes keep their size. Inverted bounds are swapped.
    pub fn configure(&mut self, min_size: u32, max_size: u32) {
        let (min, max) = if min_size > max_size {
            warn!(
                "Flake size range {}..={} is inverted, using {}..={}",
                min_size, max_size, max_size, min_size
            );
            (max_size, min_size)
        } else {
            (min_size, max_size)
        };
        self.min_size = min;
        self.max_size = max;
        debug!("Flake size range set to {}..={}", min, max);
    }

    /// Start spawning. Returns `false` if already running.
    pub fn start<C: FlakeCanvas>(
        &mut self,
        wind: &mut WindScheduler,
        ctx: &mut FieldContext<'_, C>,
    ) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        wind.arm(None, ctx.timers, ctx.rng);
        debug!("Snowfall started (capacity {})", self.capacity);
        true
    }

    /// Stop spawning and clear every flake. Returns `false` if already stopped.
    ///
    /// Safe from any state; the cleanup runs either way.
    pub fn stop<C: FlakeCanvas>(
        &mut self,
        wind: &mut WindScheduler,
        ctx: &mut FieldContext<'_, C>,
    ) -> bool {
        let was_running = self.running;
        self.running = false;
        wind.cancel(ctx.timers);

        for (_, handle) in self.expiries.drain() {
            ctx.timers.cancel(handle);
        }
        for flake in self.flakes.drain(..) {
            ctx.groups.remove_everywhere(flake.id);
            ctx.canvas.remove_flake(flake.id);
        }

        if was_running {
            debug!("Snowfall stopped");
        }
        was_running
    }

    /// Spawn one flake above the viewport.
    ///
    /// Does nothing while stopped or at capacity.
    pub fn spawn<C: FlakeCanvas>(&mut self, ctx: &mut FieldContext<'_, C>) -> Option<FlakeId> {
        if !self.running || self.flakes.len() >= self.capacity {
            return None;
        }

        let id = FlakeId(self.next_id);
        self.next_id += 1;

        let position = ctx.rng.spawn_point(ctx.viewport, self.spawn_height);
        let group = ctx.rng.group();
        let lifetime = ctx.rng.seconds_in(&self.lifetime);
        let expires_at = ctx.timers.now() + lifetime;
        let flake = Snowflake::new(
            id,
            position,
            self.min_size,
            self.max_size,
            group,
            expires_at,
            ctx.rng,
        );

        ctx.canvas.add_flake(&flake);
        ctx.groups.get_mut(group).add(id);
        let handle = ctx.timers.schedule(lifetime, SnowEvent::Expire(id));
        self.expiries.insert(id, handle);

        trace!(
            "Spawned {} at ({:.0}, {:.0}) size {} in group {:?}, lives {:.2}s",
            id,
            flake.position.x,
            flake.position.y,
            flake.size,
            group,
            lifetime.as_secs_f32()
        );
        self.flakes.push(flake);
        Some(id)
    }

    /// Remove a flake and, while running, spawn its replacement.
    ///
    /// Unknown ids (already expired, or cleared by `stop`) are ignored.
    pub fn expire<C: FlakeCanvas>(&mut self, id: FlakeId, ctx: &mut FieldContext<'_, C>) -> bool {
        let Some(index) = self.flakes.iter().position(|f| f.id == id) else {
            return false;
        };

        if let Some(handle) = self.expiries.remove(&id) {
            ctx.timers.cancel(handle);
        }
        ctx.groups.remove_everywhere(id);
        ctx.canvas.remove_flake(id);
        self.flakes.remove(index);
        trace!("Expired {}", id);

        if self.running {
            self.spawn(ctx);
        }
        true
    }

    /// Whether the groups' member sets exactly partition the live flakes.
    pub fn is_partitioned(&self, groups: &ForceGroups) -> bool {
        groups.total_members() == self.flakes.len()
            && self.flakes.iter().all(|flake| {
                let owners = groups.iter().filter(|g| g.contains(flake.id)).count();
                owners == 1 && groups.get(flake.group).contains(flake.id)
            })
    }

    pub fn get(&self, id: FlakeId) -> Option<&Snowflake> {
        self.flakes.iter().find(|f| f.id == id)
    }

    /// Live flakes in spawn order.
    #[inline]
    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }

    #[inline]
    pub(crate) fn flakes_mut(&mut self) -> &mut [Snowflake] {
        &mut self.flakes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.flakes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flakes.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current `(min, max)` size range for new flakes.
    #[inline]
    pub fn size_range(&self) -> (u32, u32) {
        (self.min_size, self.max_size)
    }

    /// Number of flakes still waiting to expire.
    #[inline]
    pub fn pending_expiries(&self) -> usize {
        self.expiries.len()
    }
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
