//! Wind gusts.
//!
//! The [`WindScheduler`] keeps a single pending timer. Each time it fires it
//! pushes both force groups sideways (the push reverses every fire), asks the
//! field for one more flake, and re-arms itself with a fresh random delay.
//!
//! Once the field is stopped the scheduler goes quiet: a fire that finds the
//! field stopped neither gusts nor re-arms.

use log::trace;
use std::ops::Range;
use std::time::Duration;

use crate::canvas::FlakeCanvas;
use crate::config::SnowConfig;
use crate::field::{FieldContext, ParticleField};
use crate::particle::GroupId;
use crate::random::SnowRng;
use crate::scheduler::{SnowEvent, SnowTimers, TimerHandle};

/// Timer-driven gust controller.
#[derive(Debug, Clone)]
pub struct WindScheduler {
    pending: Option<TimerHandle>,
    pull_right: bool,
    delay: Range<f32>,
    gust_a: f32,
    gust_b: f32,
    fires: u64,
}

impl WindScheduler {
    /// Create an unarmed scheduler.
    ///
    /// `gust_a` and `gust_b` are the horizontal pushes for each group;
    /// `delay` is the re-arm delay range in seconds.
    pub fn new(gust_a: f32, gust_b: f32, delay: Range<f32>) -> Self {
        Self {
            pending: None,
            pull_right: false,
            delay,
            gust_a,
            gust_b,
            fires: 0,
        }
    }

    pub fn from_config(config: &SnowConfig) -> Self {
        Self::new(config.group_a.gust, config.group_b.gust, config.gust_delay.clone())
    }

    /// Schedule the next fire, replacing any pending one.
    ///
    /// Without an explicit delay one is drawn from the delay range.
    pub fn arm(
        &mut self,
        initial_delay: Option<Duration>,
        timers: &mut SnowTimers,
        rng: &mut SnowRng,
    ) -> TimerHandle {
        self.cancel(timers);
        let delay = initial_delay.unwrap_or_else(|| rng.seconds_in(&self.delay));
        let handle = timers.schedule(delay, SnowEvent::Gust);
        self.pending = Some(handle);
        handle
    }

    /// Drop the pending fire. Returns `false` if nothing was armed.
    pub fn cancel(&mut self, timers: &mut SnowTimers) -> bool {
        match self.pending.take() {
            Some(handle) => timers.cancel(handle),
            None => false,
        }
    }

    /// Handle a fire of `handle`.
    ///
    /// Fires from a replaced or cancelled arm are ignored.
    pub fn fire<C: FlakeCanvas>(
        &mut self,
        handle: TimerHandle,
        field: &mut ParticleField,
        ctx: &mut FieldContext<'_, C>,
    ) {
        if self.pending != Some(handle) {
            return;
        }
        self.pending = None;

        if !field.is_running() {
            return;
        }

        let sign = if self.pull_right { 1.0 } else { -1.0 };
        ctx.groups.get_mut(GroupId::A).adjust_direction(sign * self.gust_a, 0.0);
        ctx.groups.get_mut(GroupId::B).adjust_direction(sign * self.gust_b, 0.0);
        self.pull_right = !self.pull_right;
        self.fires += 1;
        trace!(
            "Gust #{}: A dx {:.2}, B dx {:.2}",
            self.fires,
            ctx.groups.get(GroupId::A).direction().x,
            ctx.groups.get(GroupId::B).direction().x
        );

        if field.len() < field.capacity() {
            field.spawn(ctx);
        }

        self.arm(None, ctx.timers, ctx.rng);
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle of the pending fire, if any.
    #[inline]
    pub fn pending(&self) -> Option<TimerHandle> {
        self.pending
    }

    /// Whether the next gust pushes right.
    #[inline]
    pub fn pulls_right(&self) -> bool {
        self.pull_right
    }

    /// Gusts fired so far.
    #[inline]
    pub fn fires(&self) -> u64 {
        self.fires
    }
}

impl Default for WindScheduler {
    fn default() -> Self {
        Self::from_config(&SnowConfig::default())
    }
}
