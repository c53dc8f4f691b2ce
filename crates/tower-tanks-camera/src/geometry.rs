//! Screen-space and world-space geometry for camera regions.
//!
//! Normalized rectangles describe where a region renders on screen, extents
//! describe how far a tracked entity reaches from its anchor, and world
//! bounds/frames describe what a region has to keep visible.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

/// Rectangle in normalized screen space (0..1 on both axes, origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for NormRect {
    fn default() -> Self {
        Self::FULL
    }
}

impl NormRect {
    /// Rectangle covering the whole screen.
    pub const FULL: NormRect = NormRect::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge (x + width).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge (y + height).
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Returns true if every edge lies within [0, 1] and the size is non-negative.
    pub fn is_normalized(&self) -> bool {
        let in_unit = |v: f32| v.is_finite() && (0.0..=1.0).contains(&v);
        self.width >= 0.0
            && self.height >= 0.0
            && in_unit(self.x)
            && in_unit(self.y)
            && in_unit(self.right())
            && in_unit(self.top())
    }

    /// Aspect ratio (width / height) of this rectangle on a screen with the given aspect.
    ///
    /// Returns 0.0 for a collapsed rectangle so callers can treat it as degenerate.
    pub fn aspect(&self, screen_aspect: f32) -> f32 {
        if self.height <= 0.0 {
            return 0.0;
        }
        screen_aspect * self.width / self.height
    }
}

/// Per-direction distances from an entity's anchor to its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extents {
    pub up: f32,
    pub right: f32,
    pub down: f32,
    pub left: f32,
}

impl Extents {
    /// Creates extents, clamping negative or NaN distances to zero.
    pub fn new(up: f32, right: f32, down: f32, left: f32) -> Self {
        let clean = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            up: clean(up),
            right: clean(right),
            down: clean(down),
            left: clean(left),
        }
    }

    /// Symmetric extents with the given half width and half height.
    pub fn symmetric(half_width: f32, half_height: f32) -> Self {
        Self::new(half_height, half_width, half_height, half_width)
    }

    /// Total vertical span (up + down).
    pub fn height(&self) -> f32 {
        self.up + self.down
    }

    /// Total horizontal span (left + right).
    pub fn width(&self) -> f32 {
        self.left + self.right
    }

    /// Returns true if the entity has no size on either axis.
    pub fn is_degenerate(&self) -> bool {
        self.height() <= 0.0 && self.width() <= 0.0
    }
}

/// Axis-aligned world-space bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldBounds {
    pub fn from_point(point: Vec2) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Grows these bounds to also cover `other`.
    pub fn encapsulate(&mut self, other: &WorldBounds) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Projects an entity's rotated box into world-space bounds.
///
/// All four local corners are rotated by `rotation` (radians, counter-clockwise)
/// around the anchor and the true min/max is taken, so the result is continuous
/// in the rotation angle.
pub fn project_extents(anchor: Vec2, rotation: f32, extents: &Extents) -> WorldBounds {
    let corners = [
        Vec2::new(-extents.left, -extents.down),
        Vec2::new(extents.right, -extents.down),
        Vec2::new(extents.right, extents.up),
        Vec2::new(-extents.left, extents.up),
    ];
    let basis = Vec2::from_angle(rotation);

    let mut bounds = WorldBounds::from_point(anchor + basis.rotate(corners[0]));
    for corner in &corners[1..] {
        bounds.encapsulate(&WorldBounds::from_point(anchor + basis.rotate(*corner)));
    }
    bounds
}

/// World-space rectangle visible through a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldFrame {
    pub center: Vec2,
    /// Half width and half height (zoom * aspect, zoom).
    pub half_size: Vec2,
}

impl WorldFrame {
    pub fn new(center: Vec2, zoom: f32, aspect: f32) -> Self {
        Self {
            center,
            half_size: Vec2::new(zoom * aspect.max(0.0), zoom),
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_size
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_size
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Closest point on (or inside) the frame to `point`.
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min(), self.max())
    }

    /// Shrinks the frame uniformly, e.g. to keep UI with rounded corners clear of edges.
    pub fn shrink(&self, edge_radius: f32) -> Self {
        Self {
            center: self.center,
            half_size: (self.half_size - Vec2::splat(edge_radius)).max(Vec2::ZERO),
        }
    }
}
