//! The snow view: composition root.
//!
//! [`SnowView`] owns one [`ParticleField`], both [`ForceGroup`]s, the
//! [`WindScheduler`], the timer queue, the random source and the canvas. The
//! host drives it once per rendered frame; everything else (gusts, spawns,
//! expiries) happens inside that call, one timer callback at a time.
//!
//! ```ignore
//! let mut view = SnowView::new(Vec2::new(375.0, 667.0), MemoryCanvas::new());
//! loop {
//!     view.update();
//!     upload(view.canvas().instance_bytes());
//! }
//! ```
//!
//! [`ForceGroup`]: crate::force::ForceGroup

use glam::Vec2;
use log::debug;
use std::time::Duration;

use crate::canvas::FlakeCanvas;
use crate::config::SnowConfig;
use crate::error::ConfigError;
use crate::field::{FieldContext, ParticleField};
use crate::force::{ForceGroup, ForceGroups};
use crate::particle::{FlakeId, GroupId, Snowflake};
use crate::random::SnowRng;
use crate::scheduler::{SnowEvent, SnowTimers, TimerQueue};
use crate::time::Time;
use crate::wind::WindScheduler;

/// What a hit test resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// The view's own background.
    Container,
    /// A flake.
    Flake(FlakeId),
}

/// A self-contained snowfall inside a rectangular viewport.
pub struct SnowView<C: FlakeCanvas> {
    field: ParticleField,
    groups: ForceGroups,
    wind: WindScheduler,
    timers: SnowTimers,
    rng: SnowRng,
    time: Time,
    canvas: C,
    bounds: Vec2,
    gravity_scale: f32,
    flakes_hittable: bool,
}

impl<C: FlakeCanvas> SnowView<C> {
    /// Create a view with the default configuration.
    ///
    /// The default configuration starts snowing immediately.
    pub fn new(bounds: Vec2, canvas: C) -> Self {
        Self::build(bounds, canvas, SnowConfig::default(), SnowRng::from_entropy())
    }

    /// Create a view from a validated configuration.
    pub fn with_config(bounds: Vec2, canvas: C, config: SnowConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(bounds, canvas, config, SnowRng::from_entropy()))
    }

    /// Create a view with an explicit random source.
    pub fn with_rng(
        bounds: Vec2,
        canvas: C,
        config: SnowConfig,
        rng: SnowRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(bounds, canvas, config, rng))
    }

    fn build(bounds: Vec2, canvas: C, config: SnowConfig, rng: SnowRng) -> Self {
        let groups = ForceGroups::new(
            ForceGroup::from_config(GroupId::A, &config.group_a, config.max_drift),
            ForceGroup::from_config(GroupId::B, &config.group_b, config.max_drift),
        );
        let mut view = Self {
            field: ParticleField::from_config(&config),
            groups,
            wind: WindScheduler::from_config(&config),
            timers: TimerQueue::new(),
            rng,
            time: Time::new(),
            canvas,
            bounds: bounds.max(Vec2::ZERO),
            gravity_scale: config.gravity_scale,
            flakes_hittable: config.flakes_hittable,
        };
        if config.autostart {
            view.start();
        }
        view
    }

    /// Borrow the field and its collaborators at once.
    fn parts(&mut self) -> (&mut ParticleField, &mut WindScheduler, FieldContext<'_, C>) {
        let Self {
            field,
            groups,
            wind,
            timers,
            rng,
            canvas,
            bounds,
            ..
        } = self;
        let ctx = FieldContext {
            groups,
            timers,
            rng,
            canvas,
            viewport: *bounds,
        };
        (field, wind, ctx)
    }

    /// Set the flake size range for future spawns.
    pub fn configure(&mut self, min_size: u32, max_size: u32) {
        self.field.configure(min_size, max_size);
    }

    /// Start snowing. Does nothing if already running.
    pub fn start(&mut self) {
        let (field, wind, mut ctx) = self.parts();
        field.start(wind, &mut ctx);
    }

    /// Stop snowing and remove every flake. Safe to call repeatedly.
    pub fn stop(&mut self) {
        let (field, wind, mut ctx) = self.parts();
        field.stop(wind, &mut ctx);
    }

    /// Advance exactly `dt` seconds of simulated time.
    ///
    /// Timers due within the frame fire first, in deadline order, then every
    /// flake moves under its group's force and the canvas is told where it went.
    pub fn step(&mut self, dt: f32) {
        let frame = Duration::try_from_secs_f32(dt.max(0.0)).unwrap_or(Duration::ZERO);
        self.step_by(frame);
    }

    fn step_by(&mut self, frame: Duration) {
        let target = self.timers.now() + frame;
        self.fire_due(target);
        self.timers.advance_to(target);

        self.groups.step(self.field.flakes_mut(), frame.as_secs_f32(), self.gravity_scale);
        for flake in self.field.flakes() {
            self.canvas.move_flake(flake.id, flake.position);
        }
    }

    /// Advance one frame of `raw_delta` seconds through the view's clock
    /// (time scale, pause and fixed delta apply).
    pub fn advance(&mut self, raw_delta: f32) {
        let dt = self.time.advance(raw_delta);
        self.step(dt);
    }

    /// Advance one frame measured on the wall clock.
    pub fn update(&mut self) {
        let dt = self.time.update();
        self.step(dt);
    }

    /// Step repeatedly in `frame`-second increments until `total` has passed.
    ///
    /// The last frame is shortened so the clock lands exactly on the end.
    pub fn run_for(&mut self, total: Duration, frame: f32) {
        let frame = Duration::try_from_secs_f32(frame.max(0.0)).unwrap_or(Duration::ZERO);
        if frame.is_zero() {
            return;
        }
        let end = self.timers.now() + total;
        while self.timers.now() < end {
            self.step_by(frame.min(end - self.timers.now()));
        }
    }

    /// Dispatch timers due by `until`. Anything they schedule waits for the
    /// next frame even when it is already due.
    fn fire_due(&mut self, until: Duration) {
        let mark = self.timers.mark();
        while let Some((handle, event)) = self.timers.pop_due_before(until, mark) {
            let (field, wind, mut ctx) = self.parts();
            match event {
                SnowEvent::Gust => wind.fire(handle, field, &mut ctx),
                SnowEvent::Expire(id) => {
                    field.expire(id, &mut ctx);
                }
            }
        }
    }

    /// Resize the viewport. Only future spawn positions are affected.
    pub fn resize(&mut self, bounds: Vec2) {
        self.bounds = bounds.max(Vec2::ZERO);
        debug!("Snow view resized to {}x{}", self.bounds.x, self.bounds.y);
    }

    /// Hit test that lets touches fall through the view.
    ///
    /// Returns `None` wherever the plain test would land on the view itself,
    /// so only flakes (when hittable) can ever be targets.
    pub fn hit_test(&self, point: Vec2) -> Option<HitTarget> {
        match self.raw_hit_test(point) {
            Some(HitTarget::Container) | None => None,
            hit => hit,
        }
    }

    /// Plain hit test: the topmost flake under `point`, else the view itself
    /// if `point` is inside the bounds.
    pub fn raw_hit_test(&self, point: Vec2) -> Option<HitTarget> {
        let inside = point.x >= 0.0
            && point.y >= 0.0
            && point.x < self.bounds.x
            && point.y < self.bounds.y;
        if !inside {
            return None;
        }
        if self.flakes_hittable {
            // Later spawns draw on top
            if let Some(flake) = self.field.flakes().iter().rev().find(|f| f.contains(point)) {
                return Some(HitTarget::Flake(flake.id));
            }
        }
        Some(HitTarget::Container)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.field.is_running()
    }

    /// Number of live flakes.
    #[inline]
    pub fn population(&self) -> usize {
        self.field.len()
    }

    #[inline]
    pub fn flakes(&self) -> &[Snowflake] {
        self.field.flakes()
    }

    #[inline]
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    #[inline]
    pub fn group(&self, id: GroupId) -> &ForceGroup {
        self.groups.get(id)
    }

    #[inline]
    pub fn groups(&self) -> &ForceGroups {
        &self.groups
    }

    /// Mutable access to a group, e.g. to retune its force.
    #[inline]
    pub fn group_mut(&mut self, id: GroupId) -> &mut ForceGroup {
        self.groups.get_mut(id)
    }

    #[inline]
    pub fn wind(&self) -> &WindScheduler {
        &self.wind
    }

    #[inline]
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    #[inline]
    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    #[inline]
    pub fn time(&self) -> &Time {
        &self.time
    }

    #[inline]
    pub fn time_mut(&mut self) -> &mut Time {
        &mut self.time
    }

    #[inline]
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Current simulated time.
    #[inline]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Timers still waiting to fire (wind plus expiries).
    #[inline]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether the two groups exactly partition the live flakes.
    pub fn is_partitioned(&self) -> bool {
        self.field.is_partitioned(&self.groups)
    }
}

impl<C: FlakeCanvas> Drop for SnowView<C> {
    fn drop(&mut self) {
        self.stop();
    }
}
