//! # snowfall
//!
//! A decorative field of falling snowflakes with wind gusts, as a plain
//! simulation engine. snowfall decides where flakes are, when they appear and
//! when they go; your renderer decides what they look like.
//!
//! ## Quick Start
//!
//! ```ignore
//! use snowfall::prelude::*;
//!
//! let mut view = SnowView::new(Vec2::new(375.0, 667.0), MemoryCanvas::new());
//! view.configure(2, 4);
//!
//! // In your frame callback:
//! view.update();
//! for instance in view.canvas().instances() {
//!     draw_flake(instance.position, instance.size);
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Flakes
//!
//! A [`Snowflake`] has a position, an integer size, a lifetime and belongs to
//! exactly one of two force groups. Flakes spawn just above the viewport and
//! live for five to six seconds; a flake that expires while snow is falling is
//! replaced immediately.
//!
//! ### Force groups
//!
//! Each [`ForceGroup`] is a constant gravity-like vector shared by its
//! members. The two default groups fall at different speeds, which gives the
//! field depth.
//!
//! ### Wind
//!
//! The [`WindScheduler`] fires at random intervals under a second. Every fire
//! pushes both groups sideways (alternating left and right) and adds one flake
//! until the field reaches capacity.
//!
//! ### Time
//!
//! Nothing runs on its own. Gusts and expiries are entries in a virtual-time
//! [`TimerQueue`] that the view drains once per frame, so a seeded run is
//! fully reproducible:
//!
//! ```ignore
//! let config = SnowConfig::default();
//! let mut view = SnowView::with_rng(bounds, NullCanvas, config, SnowRng::seeded(7))?;
//! view.run_for(Duration::from_secs(60), 1.0 / 60.0);
//! ```
//!
//! ## Feature Overview
//!
//! | Concern | Types |
//! |---------|-------|
//! | Composition | [`SnowView`], [`HitTarget`] |
//! | Population | [`ParticleField`], [`Snowflake`] |
//! | Forces | [`ForceGroup`], [`ForceGroups`], [`WindScheduler`] |
//! | Scheduling | [`TimerQueue`], [`Time`] |
//! | Rendering | [`FlakeCanvas`], [`MemoryCanvas`], [`SnowflakeInstance`] |
//! | Setup | [`SnowConfig`], [`SnowRng`], [`ConfigError`] |

pub mod canvas;
pub mod config;
pub mod error;
pub mod field;
pub mod force;
pub mod particle;
pub mod random;
pub mod scheduler;
pub mod time;
mod view;
pub mod wind;

pub use bytemuck;
pub use canvas::{FlakeCanvas, MemoryCanvas, NullCanvas, SnowflakeInstance};
pub use config::{GroupConfig, SnowConfig};
pub use error::ConfigError;
pub use field::{FieldContext, ParticleField};
pub use force::{ForceGroup, ForceGroups};
pub use glam::Vec2;
pub use particle::{FlakeId, GroupId, Snowflake};
pub use random::SnowRng;
pub use scheduler::{SnowEvent, TimerHandle, TimerMark, TimerQueue};
pub use time::Time;
pub use view::{HitTarget, SnowView};
pub use wind::WindScheduler;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use snowfall::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::{FlakeCanvas, MemoryCanvas, NullCanvas, SnowflakeInstance};
    pub use crate::config::{GroupConfig, SnowConfig};
    pub use crate::error::ConfigError;
    pub use crate::particle::{FlakeId, GroupId, Snowflake};
    pub use crate::random::SnowRng;
    pub use crate::time::Time;
    pub use crate::view::{HitTarget, SnowView};
    pub use crate::Vec2;
    pub use std::time::Duration;
}
