//! Edge-of-screen indicators for tracked entities outside a region's frame.

use bevy::math::Vec2;

use crate::geometry::WorldFrame;

/// Where to draw an indicator pointing at an offscreen entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffscreenIndicator {
    /// World point just inside the frame edge, closest to the entity.
    pub edge_point: Vec2,
    /// Unit vector from `edge_point` toward the entity.
    pub direction: Vec2,
    /// Signed angle of `direction` from +Y, in radians (counter-clockwise positive).
    pub angle: f32,
}

/// Returns the indicator for `point`, or `None` if it is visible inside `frame`.
///
/// The edge point is kept `edge_distance` world units inside the frame.
pub fn indicator(frame: &WorldFrame, point: Vec2, edge_distance: f32) -> Option<OffscreenIndicator> {
    if frame.contains(point) {
        return None;
    }

    let edge_point = frame.shrink(edge_distance.max(0.0)).closest_point(point);
    let direction = (point - edge_point).normalize_or_zero();
    if direction == Vec2::ZERO {
        return None;
    }

    Some(OffscreenIndicator {
        edge_point,
        direction,
        angle: Vec2::Y.angle_to(direction),
    })
}
