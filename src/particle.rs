//! Snowflake state.

use glam::Vec2;
use std::fmt;
use std::time::Duration;

use crate::random::SnowRng;

/// Unique identity of a flake within one view.
///
/// Ids are never reused, so a stale id can never alias a newer flake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlakeId(pub(crate) u64);

impl FlakeId {
    /// Raw numeric id.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flake#{}", self.0)
    }
}

/// Which of the two force groups a flake falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupId {
    A,
    B,
}

impl GroupId {
    /// Both groups, in order.
    pub const ALL: [GroupId; 2] = [GroupId::A, GroupId::B];

    /// Numeric index, used for GPU instance data.
    #[inline]
    pub fn index(self) -> u32 {
        match self {
            GroupId::A => 0,
            GroupId::B => 1,
        }
    }
}

/// A single falling flake.
///
/// `position` is the top-left corner of the flake's square, in view points.
#[derive(Debug, Clone, PartialEq)]
pub struct Snowflake {
    pub id: FlakeId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: u32,
    pub group: GroupId,
    /// Virtual time at which the flake is removed.
    pub expires_at: Duration,
}

impl Snowflake {
    /// Create a resting flake with a random size in `[min_size, max_size]`.
    pub fn new(
        id: FlakeId,
        position: Vec2,
        min_size: u32,
        max_size: u32,
        group: GroupId,
        expires_at: Duration,
        rng: &mut SnowRng,
    ) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            size: rng.size_in(min_size, max_size),
            group,
            expires_at,
        }
    }

    /// Whether `point` lies inside the flake's square.
    pub fn contains(&self, point: Vec2) -> bool {
        let far = self.position + Vec2::splat(self.size as f32);
        point.x >= self.position.x
            && point.y >= self.position.y
            && point.x < far.x
            && point.y < far.y
    }
}
