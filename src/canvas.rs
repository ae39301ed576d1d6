//! Rendering collaborator.
//!
//! The engine never draws. It tells a [`FlakeCanvas`] when a flake appears,
//! moves, or goes away, and the host turns that into whatever visual it likes
//! (a sprite, a view, a GPU instance).
//!
//! [`MemoryCanvas`] keeps the visuals in memory and can hand them to a GPU as
//! a tightly packed [`SnowflakeInstance`] buffer:
//!
//! ```ignore
//! let bytes = view.canvas().instance_bytes();
//! queue.write_buffer(&instance_buffer, 0, &bytes);
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use std::collections::BTreeMap;

use crate::particle::{FlakeId, Snowflake};

/// Receives visual updates for flakes.
pub trait FlakeCanvas {
    /// A new flake needs a visual.
    fn add_flake(&mut self, flake: &Snowflake);

    /// A flake moved during a frame step.
    fn move_flake(&mut self, id: FlakeId, position: Vec2) {
        let _ = (id, position);
    }

    /// A flake's visual must be removed from the display.
    fn remove_flake(&mut self, id: FlakeId);
}

/// Canvas that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCanvas;

impl FlakeCanvas for NullCanvas {
    fn add_flake(&mut self, _flake: &Snowflake) {}

    fn remove_flake(&mut self, _id: FlakeId) {}
}

/// Per-flake instance data, laid out for a vertex buffer.
///
/// 16 bytes: `position` (2 × f32), `size` (f32), `group` (u32).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SnowflakeInstance {
    pub position: [f32; 2],
    pub size: f32,
    pub group: u32,
}

impl From<&Snowflake> for SnowflakeInstance {
    fn from(flake: &Snowflake) -> Self {
        Self {
            position: flake.position.to_array(),
            size: flake.size as f32,
            group: flake.group.index(),
        }
    }
}

/// Canvas that keeps every displayed flake in memory, ordered by id.
#[derive(Debug, Default, Clone)]
pub struct MemoryCanvas {
    visuals: BTreeMap<FlakeId, SnowflakeInstance>,
    added: u64,
    removed: u64,
}

impl MemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of flakes currently displayed.
    #[inline]
    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    pub fn contains(&self, id: FlakeId) -> bool {
        self.visuals.contains_key(&id)
    }

    pub fn get(&self, id: FlakeId) -> Option<&SnowflakeInstance> {
        self.visuals.get(&id)
    }

    /// Total visuals ever added.
    pub fn added(&self) -> u64 {
        self.added
    }

    /// Total visuals ever removed.
    pub fn removed(&self) -> u64 {
        self.removed
    }

    /// Snapshot of all instances in id (spawn) order.
    pub fn instances(&self) -> Vec<SnowflakeInstance> {
        self.visuals.values().copied().collect()
    }

    /// Instance data as raw bytes, ready for upload.
    pub fn instance_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.instances()).to_vec()
    }
}

impl FlakeCanvas for MemoryCanvas {
    fn add_flake(&mut self, flake: &Snowflake) {
        self.visuals.insert(flake.id, SnowflakeInstance::from(flake));
        self.added += 1;
    }

    fn move_flake(&mut self, id: FlakeId, position: Vec2) {
        if let Some(visual) = self.visuals.get_mut(&id) {
            visual.position = position.to_array();
        }
    }

    fn remove_flake(&mut self, id: FlakeId) {
        if self.visuals.remove(&id).is_some() {
            self.removed += 1;
        }
    }
}
