//! Error types for snowfall.
//!
//! The simulation itself never fails: double starts, stale expiries and
//! inverted size ranges all degrade silently. The only fallible surface is
//! loading and validating a [`SnowConfig`](crate::config::SnowConfig).

use std::fmt;

/// Errors that can occur while loading or validating a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the configuration file.
    Io(std::io::Error),
    /// The file is not valid configuration JSON.
    Parse(serde_json::Error),
    /// A seconds range is empty, negative, too short or too long.
    InvalidRange {
        /// Name of the offending field.
        field: &'static str,
        /// Range start in seconds.
        start: f32,
        /// Range end in seconds.
        end: f32,
    },
    /// A force group was configured with a negative magnitude.
    NegativeMagnitude {
        /// Which group ("group_a" or "group_b").
        group: &'static str,
        /// The rejected magnitude.
        magnitude: f32,
    },
    /// A scalar setting is negative or not finite.
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::InvalidRange { field, start, end } => write!(
                f,
                "Invalid range for `{}`: {}..{} (must be non-empty and within timer limits)",
                field, start, end
            ),
            ConfigError::NegativeMagnitude { group, magnitude } => write!(
                f,
                "Force magnitude for `{}` must not be negative, got {}",
                group, magnitude
            ),
            ConfigError::InvalidValue { field, value } => write!(
                f,
                "`{}` must be finite and not negative, got {}",
                field, value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
