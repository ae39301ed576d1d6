//! Snowfall configuration.
//!
//! [`SnowConfig`] collects every tunable of a [`SnowView`](crate::SnowView).
//! It can be serialized to JSON and loaded back; missing fields fall back to
//! their defaults, so partial files are fine.
//!
//! ```ignore
//! let config = SnowConfig::load("snow.json")?;
//! let view = SnowView::with_config(Vec2::new(375.0, 667.0), MemoryCanvas::new(), config)?;
//! ```

use crate::error::ConfigError;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::Range;
use std::path::Path;

/// Default maximum number of live flakes.
pub const DEFAULT_CAPACITY: usize = 150;
/// Default smallest flake size in points.
pub const DEFAULT_MIN_SIZE: u32 = 2;
/// Default largest flake size in points.
pub const DEFAULT_MAX_SIZE: u32 = 4;
/// Flakes spawn up to this many points above the top edge.
pub const DEFAULT_SPAWN_HEIGHT: f32 = 200.0;
/// Points per second squared for a force of magnitude 1.0.
pub const DEFAULT_GRAVITY_SCALE: f32 = 1000.0;
/// Shortest usable upper bound of a timer range in seconds.
///
/// Draws below a millisecond would reschedule at the instant they fire.
pub const MIN_TIMER_SECS: f32 = 0.001;
/// Longest timer delay in seconds (one day).
pub const MAX_TIMER_SECS: f32 = 86_400.0;

/// Force settings for one of the two groups.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct GroupConfig {
    /// Force strength. 1.0 accelerates by `gravity_scale` points/s².
    pub magnitude: f32,
    /// Force direction. Not normalized.
    pub direction: Vec2,
    /// Horizontal perturbation added or subtracted on every wind gust.
    pub gust: f32,
}

impl GroupConfig {
    /// The slower, lighter group.
    pub fn light() -> Self {
        Self {
            magnitude: 0.10,
            direction: Vec2::new(0.25, 1.0),
            gust: 0.4,
        }
    }

    /// The faster, heavier group.
    pub fn heavy() -> Self {
        Self {
            magnitude: 0.20,
            direction: Vec2::new(0.25, 1.0),
            gust: 0.5,
        }
    }
}

/// Complete snowfall configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SnowConfig {
    /// Maximum simultaneous live flakes.
    pub capacity: usize,
    /// Smallest flake size (inclusive).
    pub min_size: u32,
    /// Largest flake size (inclusive).
    pub max_size: u32,
    /// Flakes spawn in `[-spawn_height, 0)` above the viewport.
    pub spawn_height: f32,
    /// Flake lifetime in seconds.
    pub lifetime: Range<f32>,
    /// Delay between wind gusts in seconds, redrawn every cycle.
    pub gust_delay: Range<f32>,
    /// Settings for group A.
    pub group_a: GroupConfig,
    /// Settings for group B.
    pub group_b: GroupConfig,
    /// Optional clamp on the horizontal direction component.
    ///
    /// `None` keeps the additive gust drift unbounded.
    pub max_drift: Option<f32>,
    /// Acceleration in points/s² per unit of force magnitude.
    pub gravity_scale: f32,
    /// Whether flakes themselves respond to hit tests.
    pub flakes_hittable: bool,
    /// Start snowing as soon as the view is created.
    pub autostart: bool,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            spawn_height: DEFAULT_SPAWN_HEIGHT,
            lifetime: 5.0..6.0,
            gust_delay: 0.0..1.0,
            group_a: GroupConfig::light(),
            group_b: GroupConfig::heavy(),
            max_drift: None,
            gravity_scale: DEFAULT_GRAVITY_SCALE,
            flakes_hittable: true,
            autostart: true,
        }
    }
}

impl SnowConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the flake size range.
    pub fn with_size_range(mut self, min: u32, max: u32) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    /// Enable or disable starting on construction.
    pub fn with_autostart(mut self, autostart: bool) -> Self {
        self.autostart = autostart;
        self
    }

    /// Clamp the horizontal drift of both groups.
    pub fn with_max_drift(mut self, max_drift: f32) -> Self {
        self.max_drift = Some(max_drift.abs());
        self
    }

    /// Check that all ranges, magnitudes and scalars are usable.
    ///
    /// Inverted size bounds are not an error; they are swapped when applied.
    /// Timer ranges must end between [`MIN_TIMER_SECS`] and [`MAX_TIMER_SECS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("lifetime", &self.lifetime)?;
        check_range("gust_delay", &self.gust_delay)?;
        check_value("spawn_height", self.spawn_height)?;
        check_value("gravity_scale", self.gravity_scale)?;
        check_magnitude("group_a", self.group_a.magnitude)?;
        check_magnitude("group_b", self.group_b.magnitude)?;
        Ok(())
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

fn check_range(field: &'static str, range: &Range<f32>) -> Result<(), ConfigError> {
    // NaN bounds fail every comparison and land here too
    let usable = range.start >= 0.0
        && range.start < range.end
        && range.end >= MIN_TIMER_SECS
        && range.end <= MAX_TIMER_SECS;
    if !usable {
        return Err(ConfigError::InvalidRange {
            field,
            start: range.start,
            end: range.end,
        });
    }
    Ok(())
}

fn check_value(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(ConfigError::InvalidValue { field, value });
    }
    Ok(())
}

fn check_magnitude(group: &'static str, magnitude: f32) -> Result<(), ConfigError> {
    if !(magnitude >= 0.0) {
        return Err(ConfigError::NegativeMagnitude { group, magnitude });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SnowConfig::default();
        assert_eq!(config.capacity, 150);
        assert_eq!((config.min_size, config.max_size), (2, 4));
        assert_eq!(config.lifetime, 5.0..6.0);
        assert_eq!(config.gust_delay, 0.0..1.0);
        assert_eq!(config.max_drift, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SnowConfig::from_json(r#"{ "capacity": 40, "max_drift": 1.5 }"#).unwrap();
        assert_eq!(config.capacity, 40);
        assert_eq!(config.max_drift, Some(1.5));
        assert_eq!(config.group_b, GroupConfig::heavy());
    }

    #[test]
    fn test_json_round_trip() {
        let config = SnowConfig::new()
            .with_capacity(12)
            .with_size_range(3, 9)
            .with_autostart(false);
        let json = config.to_json().unwrap();
        assert_eq!(SnowConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_empty_lifetime() {
        let mut config = SnowConfig::default();
        config.lifetime = 6.0..5.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { field: "lifetime", .. })
        ));
    }

    #[test]
    fn test_rejects_negative_gust_delay() {
        let mut config = SnowConfig::default();
        config.gust_delay = -1.0..1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { field: "gust_delay", .. })
        ));
    }

    #[test]
    fn test_rejects_negative_magnitude() {
        let mut config = SnowConfig::default();
        config.group_a.magnitude = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeMagnitude { group: "group_a", .. })
        ));
    }

    #[test]
    fn test_rejects_unbounded_lifetime() {
        let mut config = SnowConfig::default();
        config.lifetime = 1.0e20..2.0e20;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { field: "lifetime", .. })
        ));

        config.lifetime = 5.0..f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_instant_gust_delay() {
        let mut config = SnowConfig::default();
        config.gust_delay = 0.0..1.0e-12;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { field: "gust_delay", .. })
        ));

        config.gust_delay = 0.0..MIN_TIMER_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_scalars() {
        let mut config = SnowConfig::default();
        config.gravity_scale = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "gravity_scale", .. })
        ));

        let mut config = SnowConfig::default();
        config.spawn_height = -10.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "spawn_height", .. })
        ));

        let mut config = SnowConfig::default();
        config.spawn_height = 0.0;
        config.gravity_scale = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SnowConfig::from_json("{ capacity: }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            SnowConfig::load("/definitely/not/here/snow.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
