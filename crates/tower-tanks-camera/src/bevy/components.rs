//! ECS components for camera tracking.

use bevy::prelude::*;

use crate::geometry::Extents;
use crate::region::SlotId;
use crate::target::TargetSnapshot;

/// Marks a gameplay entity (tank) that the camera director should frame.
///
/// Position and rotation are read from the entity's `GlobalTransform`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CamTarget {
    /// Distances from the transform origin to the entity's bounds, in local space.
    pub extents: Extents,
    /// Local-space point to follow instead of the transform origin.
    pub center_offset: Option<Vec2>,
    /// The player entity. Exactly one target should set this.
    pub primary: bool,
}

impl CamTarget {
    pub fn new(extents: Extents) -> Self {
        Self {
            extents,
            center_offset: None,
            primary: false,
        }
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn with_center_offset(mut self, offset: Vec2) -> Self {
        self.center_offset = Some(offset);
        self
    }

    /// Captures this target's geometry from its world transform.
    pub fn snapshot(&self, transform: &GlobalTransform) -> TargetSnapshot {
        let (_, rotation, translation) = transform.to_scale_rotation_translation();
        let angle = rotation.to_euler(EulerRot::ZYX).0;
        let anchor = translation.truncate();

        let snapshot = TargetSnapshot::new(anchor, self.extents).with_rotation(angle);
        match self.center_offset {
            Some(offset) => snapshot.with_center(anchor + Vec2::from_angle(angle).rotate(offset)),
            None => snapshot,
        }
    }
}

/// Camera entity rendering one region slot.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionCamera {
    pub slot: SlotId,
}
