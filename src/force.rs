//! Force groups.
//!
//! Every flake falls under exactly one of two [`ForceGroup`]s. A group is a
//! constant gravity-like acceleration (`direction * magnitude`) shared by all
//! of its members; wind gusts nudge the direction sideways.
//!
//! Directions are not normalized, so the horizontal component can exceed 1.
//! Gust perturbations are additive and unclamped unless a `max_drift` is set.

use glam::Vec2;
use std::collections::HashSet;

use crate::config::GroupConfig;
use crate::particle::{FlakeId, GroupId, Snowflake};

/// A force vector plus the set of flakes it applies to.
#[derive(Debug, Clone)]
pub struct ForceGroup {
    id: GroupId,
    magnitude: f32,
    direction: Vec2,
    max_drift: Option<f32>,
    members: HashSet<FlakeId>,
}

impl ForceGroup {
    /// Create an empty group with the default downward force.
    pub fn new(id: GroupId) -> Self {
        Self {
            id,
            magnitude: 1.0,
            direction: Vec2::Y,
            max_drift: None,
            members: HashSet::new(),
        }
    }

    /// Create an empty group from its configuration.
    pub fn from_config(id: GroupId, config: &GroupConfig, max_drift: Option<f32>) -> Self {
        let mut group = Self::new(id);
        group.max_drift = max_drift.map(f32::abs);
        group.set_force(config.magnitude, config.direction);
        group
    }

    #[inline]
    pub fn id(&self) -> GroupId {
        self.id
    }

    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Acceleration applied to members, in force units.
    #[inline]
    pub fn force(&self) -> Vec2 {
        self.direction * self.magnitude
    }

    /// Replace the force vector. Negative magnitudes clamp to zero.
    pub fn set_force(&mut self, magnitude: f32, direction: Vec2) {
        self.magnitude = magnitude.max(0.0);
        self.direction = direction;
        self.clamp_drift();
    }

    /// Nudge the direction, as a wind gust does.
    pub fn adjust_direction(&mut self, dx: f32, dy: f32) {
        self.direction += Vec2::new(dx, dy);
        self.clamp_drift();
    }

    /// Limit the horizontal component to `[-limit, limit]`, or lift the limit.
    pub fn set_max_drift(&mut self, limit: Option<f32>) {
        self.max_drift = limit.map(f32::abs);
        self.clamp_drift();
    }

    fn clamp_drift(&mut self) {
        if let Some(limit) = self.max_drift {
            self.direction.x = self.direction.x.clamp(-limit, limit);
        }
    }

    pub fn add(&mut self, id: FlakeId) {
        self.members.insert(id);
    }

    /// Remove a member. Returns `false` if it was not one.
    pub fn remove(&mut self, id: FlakeId) -> bool {
        self.members.remove(&id)
    }

    #[inline]
    pub fn contains(&self, id: FlakeId) -> bool {
        self.members.contains(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> impl Iterator<Item = FlakeId> + '_ {
        self.members.iter().copied()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Integrate one frame of motion for every member in `flakes`.
    ///
    /// Semi-implicit Euler: velocity first, then position. `gravity_scale`
    /// converts force units into points/s².
    pub fn step(&self, flakes: &mut [Snowflake], dt: f32, gravity_scale: f32) {
        if dt <= 0.0 || self.members.is_empty() {
            return;
        }
        let accel = self.force() * gravity_scale;
        for flake in flakes.iter_mut().filter(|f| self.members.contains(&f.id)) {
            flake.velocity += accel * dt;
            flake.position += flake.velocity * dt;
        }
    }
}

/// The two force groups of a view.
#[derive(Debug, Clone)]
pub struct ForceGroups {
    a: ForceGroup,
    b: ForceGroup,
}

impl ForceGroups {
    pub fn new(a: ForceGroup, b: ForceGroup) -> Self {
        Self { a, b }
    }

    pub fn get(&self, id: GroupId) -> &ForceGroup {
        match id {
            GroupId::A => &self.a,
            GroupId::B => &self.b,
        }
    }

    pub fn get_mut(&mut self, id: GroupId) -> &mut ForceGroup {
        match id {
            GroupId::A => &mut self.a,
            GroupId::B => &mut self.b,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ForceGroup> {
        [&self.a, &self.b].into_iter()
    }

    /// Remove `id` from both groups. Returns whether either held it.
    pub fn remove_everywhere(&mut self, id: FlakeId) -> bool {
        let in_a = self.a.remove(id);
        let in_b = self.b.remove(id);
        in_a || in_b
    }

    /// The group currently holding `id`, if any.
    pub fn owner_of(&self, id: FlakeId) -> Option<GroupId> {
        self.iter().find(|g| g.contains(id)).map(|g| g.id())
    }

    /// Total members across both groups.
    pub fn total_members(&self) -> usize {
        self.a.len() + self.b.len()
    }

    pub fn clear(&mut self) {
        self.a.clear();
        self.b.clear();
    }

    pub fn step(&self, flakes: &mut [Snowflake], dt: f32, gravity_scale: f32) {
        self.a.step(flakes, dt, gravity_scale);
        self.b.step(flakes, dt, gravity_scale);
    }
}

impl Default for ForceGroups {
    fn default() -> Self {
        Self::new(
            ForceGroup::from_config(GroupId::A, &GroupConfig::light(), None),
            ForceGroup::from_config(GroupId::B, &GroupConfig::heavy(), None),
        )
    }
}
