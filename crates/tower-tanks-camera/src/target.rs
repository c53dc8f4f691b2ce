//! Tracked entity adapter.
//!
//! Regions never own the entities they frame. They hold a `TargetId` and ask a
//! `TargetProvider` for a fresh `TargetSnapshot` every tick; a missing snapshot
//! means the entity is gone.

use std::collections::HashMap;

use bevy::ecs::entity::Entity;
use bevy::math::Vec2;

use crate::geometry::{Extents, WorldBounds, project_extents};

/// Non-owning handle to a gameplay entity tracked by the camera director.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

impl From<Entity> for TargetId {
    fn from(entity: Entity) -> Self {
        Self(entity.to_bits())
    }
}

/// Read-only view of a tracked entity's geometry.
pub trait TrackedEntity {
    /// World position the extents are measured from.
    fn anchor(&self) -> Vec2;

    /// Rotation in radians (counter-clockwise).
    fn rotation(&self) -> f32;

    /// Distances from the anchor to the entity's bounds, in the entity's local frame.
    fn extents(&self) -> Extents;

    /// Point the camera should follow instead of the anchor, if any.
    fn center_override(&self) -> Option<Vec2> {
        None
    }

    /// The point framing offsets are measured from.
    fn follow_anchor(&self) -> Vec2 {
        self.center_override().unwrap_or_else(|| self.anchor())
    }

    /// Rotation-aware world bounds of the entity.
    fn world_bounds(&self) -> WorldBounds {
        project_extents(self.anchor(), self.rotation(), &self.extents())
    }
}

/// Geometry of a tracked entity captured for a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TargetSnapshot {
    pub anchor: Vec2,
    pub rotation: f32,
    pub extents: Extents,
    pub center: Option<Vec2>,
}

impl TargetSnapshot {
    pub fn new(anchor: Vec2, extents: Extents) -> Self {
        Self {
            anchor,
            rotation: 0.0,
            extents,
            center: None,
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_center(mut self, center: Vec2) -> Self {
        self.center = Some(center);
        self
    }
}

impl TrackedEntity for TargetSnapshot {
    fn anchor(&self) -> Vec2 {
        self.anchor
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }

    fn extents(&self) -> Extents {
        self.extents
    }

    fn center_override(&self) -> Option<Vec2> {
        self.center
    }
}

/// Source of per-tick target geometry.
pub trait TargetProvider {
    /// Returns the current geometry of `id`, or `None` if the entity no longer exists.
    fn snapshot(&self, id: TargetId) -> Option<TargetSnapshot>;
}

impl TargetProvider for HashMap<TargetId, TargetSnapshot> {
    fn snapshot(&self, id: TargetId) -> Option<TargetSnapshot> {
        self.get(&id).copied()
    }
}
