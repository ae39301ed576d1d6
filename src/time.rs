//! Frame timing.
//!
//! [`Time`] turns the host's frame callbacks into simulation deltas. Hosts
//! with a real display loop call [`Time::update`], which measures wall-clock
//! time; tests and offline renders call [`Time::advance`] with an explicit
//! delta. Either way the result is scaled, paused and optionally fixed the
//! same way.
//!
//! ```ignore
//! let mut time = Time::new();
//! time.set_fixed_delta(Some(1.0 / 60.0));
//!
//! // once per frame
//! let dt = time.update();
//! view.step(dt);
//! ```

use std::time::{Duration, Instant};

/// Per-frame clock.
#[derive(Debug)]
pub struct Time {
    /// Wall-clock instant of the last `update`.
    last_frame: Option<Instant>,
    /// Simulated time in seconds.
    elapsed: Duration,
    /// Most recent scaled delta in seconds.
    delta_secs: f32,
    frame_count: u64,
    paused: bool,
    /// Fixed delta for deterministic stepping.
    fixed_delta: Option<f32>,
    time_scale: f32,
    /// Largest delta handed out, so a stalled host does not teleport flakes.
    max_delta: f32,
}

impl Time {
    /// Default cap on a single frame's delta.
    pub const DEFAULT_MAX_DELTA: f32 = 0.25;

    pub fn new() -> Self {
        Self {
            last_frame: None,
            elapsed: Duration::ZERO,
            delta_secs: 0.0,
            frame_count: 0,
            paused: false,
            fixed_delta: None,
            time_scale: 1.0,
            max_delta: Self::DEFAULT_MAX_DELTA,
        }
    }

    /// Measure wall-clock time since the previous call and record a frame.
    ///
    /// The first call yields a zero delta. Returns the scaled delta.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let raw = self
            .last_frame
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        self.advance(raw)
    }

    /// Record a frame of `raw_delta` seconds. Returns the scaled delta.
    pub fn advance(&mut self, raw_delta: f32) -> f32 {
        if self.paused {
            self.delta_secs = 0.0;
            return 0.0;
        }

        let raw = self.fixed_delta.unwrap_or(raw_delta).max(0.0);
        self.delta_secs = raw.min(self.max_delta) * self.time_scale;
        self.elapsed += Duration::try_from_secs_f32(self.delta_secs).unwrap_or(Duration::ZERO);
        self.frame_count += 1;
        self.delta_secs
    }

    /// Simulated time since creation (or the last reset).
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Scaled delta of the most recent frame in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Freeze time. Frames keep arriving but deltas are zero.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after [`pause`](Self::pause).
    ///
    /// The wall-clock gap spent paused is not replayed.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.last_frame = None;
        }
    }

    /// Use a constant delta regardless of the measured one.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Speed multiplier; negative values clamp to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Cap on a single raw delta in seconds.
    pub fn set_max_delta(&mut self, max_delta: f32) {
        self.max_delta = max_delta.max(0.0);
    }

    pub fn reset(&mut self) {
        *self = Self {
            fixed_delta: self.fixed_delta,
            time_scale: self.time_scale,
            max_delta: self.max_delta,
            ..Self::new()
        };
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
