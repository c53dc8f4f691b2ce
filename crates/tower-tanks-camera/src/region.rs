//! Viewport regions and their framing.
//!
//! A region is one independently rendered camera. Every tick it turns the
//! geometry of its tracked entities into a zoom (orthographic half-height) and
//! a follow target:
//! - `Primary` / `Secondary` with one entity: follow the entity with an offset
//! - `Primary` / `Secondary` with several entities: follow a synthetic point
//! - `Radar`: fixed world range, entity pinned near the left edge

use bevy::math::Vec2;

use crate::config::{Buffers, CameraConfig, RadarConfig};
use crate::engagement::EngagementState;
use crate::geometry::{NormRect, WorldBounds, WorldFrame};
use crate::shake::ShakeState;
use crate::target::{TargetId, TargetSnapshot, TrackedEntity};

/// Stable index of a region slot. Slots are reused after a region is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

/// What a region is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// Full-screen view of the player entity. Always enabled.
    Primary,
    /// Opponent view sharing the engagement zone.
    Secondary,
    /// Fixed-range view of the player entity.
    Radar,
}

/// The point a region's rendering surface centers on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FollowTarget {
    /// Follow an entity's follow anchor, shifted by `offset` (in the entity's rotated frame).
    Target { id: TargetId, offset: Vec2 },
    /// Follow a synthetic world point that already encodes the framing.
    Point(Vec2),
}

/// Result of a framing pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    pub zoom: f32,
    /// Offset from the follow anchor in world space.
    pub world_offset: Vec2,
}

/// Forces a zoom into the valid range (finite and at least `minimum_zoom`).
pub fn sanitize_zoom(zoom: f32, minimum_zoom: f32) -> f32 {
    if zoom.is_finite() { zoom.max(minimum_zoom) } else { minimum_zoom }
}

/// Zoom needed to show `half_width` world units on each side at the given aspect.
///
/// Degenerate aspect ratios contribute nothing so the height term decides.
fn width_zoom(half_width: f32, aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        half_width / aspect
    } else {
        0.0
    }
}

/// Frames a single entity.
///
/// Height zoom covers both vertical extents plus the top/bottom buffers. Width
/// zoom is taken per side because a rotated or laterally offset entity is not
/// centered on its own anchor. The follow offset centers the entity's world
/// bounds horizontally and pins their bottom onto the bottom buffer line.
pub fn frame_single(
    target: &TargetSnapshot,
    buffers: &Buffers,
    aspect: f32,
    minimum_zoom: f32,
) -> Framing {
    let extents = target.extents();
    let height_zoom = (extents.height() + buffers.top + buffers.bottom) / 2.0;
    let left_half = width_zoom(extents.left + buffers.side, aspect);
    let right_half = width_zoom(extents.right + buffers.side, aspect);
    let zoom = sanitize_zoom(height_zoom.max(left_half.max(right_half)), minimum_zoom);

    let bounds = target.world_bounds();
    let follow = target.follow_anchor();
    let world_offset = Vec2::new(
        bounds.center().x - follow.x,
        (zoom - (follow.y - bounds.min.y)) - buffers.bottom,
    );

    Framing { zoom, world_offset }
}

/// Frames several entities at once and returns the zoom and the synthetic follow point.
pub fn frame_multi(
    targets: &[TargetSnapshot],
    buffers: &Buffers,
    aspect: f32,
    minimum_zoom: f32,
) -> Option<(f32, Vec2)> {
    let (first, rest) = targets.split_first()?;
    let mut bounds: WorldBounds = first.world_bounds();
    for target in rest {
        bounds.encapsulate(&target.world_bounds());
    }

    let size = bounds.size();
    let height_zoom = (size.y + buffers.top + buffers.bottom) / 2.0;
    let half_width = width_zoom(size.x / 2.0 + buffers.side, aspect);
    let zoom = sanitize_zoom(height_zoom.max(half_width), minimum_zoom);

    let point = Vec2::new(bounds.center().x, bounds.min.y - buffers.bottom + zoom);
    Some((zoom, point))
}

/// Frames the radar: exactly `range` world units of width, entity pinned to the left edge.
pub fn frame_radar(radar: &RadarConfig, aspect: f32, minimum_zoom: f32) -> Framing {
    let zoom = sanitize_zoom(width_zoom(radar.range / 2.0, aspect), minimum_zoom);
    let half_frame_width = zoom * aspect.max(0.0);
    let world_offset = Vec2::new(half_frame_width - radar.edge_buffer_x, zoom - radar.edge_buffer_y);
    Framing { zoom, world_offset }
}

/// Snapshot of a region's output for the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionView {
    pub slot: SlotId,
    pub kind: RegionKind,
    /// Whether the region should render this frame.
    pub enabled: bool,
    pub rect: NormRect,
    pub zoom: f32,
    pub follow: FollowTarget,
    /// World point the camera centers on (follow target resolved, shake applied).
    pub focus: Vec2,
}

impl RegionView {
    /// World area visible through this region on a screen with the given aspect.
    pub fn world_frame(&self, screen_aspect: f32) -> WorldFrame {
        WorldFrame::new(self.focus, self.zoom, self.rect.aspect(screen_aspect))
    }
}

/// One camera region.
#[derive(Debug, Clone)]
pub struct ViewportRegion {
    slot: SlotId,
    kind: RegionKind,
    /// Entity this region was created for.
    home: TargetId,
    /// Entities currently framed, in insertion order.
    targets: Vec<TargetId>,
    pub(crate) engagement: EngagementState,
    pub(crate) ever_engaged: bool,
    zoom: f32,
    rect: NormRect,
    smoothed_offset: Vec2,
    follow: FollowTarget,
    focus: Vec2,
    pub(crate) shake: Option<ShakeState>,
    pub(crate) shake_offset: Vec2,
}

impl ViewportRegion {
    pub fn new(slot: SlotId, kind: RegionKind, home: TargetId, rect: NormRect, zoom: f32) -> Self {
        let engagement = match kind {
            RegionKind::Secondary => EngagementState::Disabled,
            RegionKind::Primary | RegionKind::Radar => EngagementState::Active,
        };
        Self {
            slot,
            kind,
            home,
            targets: vec![home],
            engagement,
            ever_engaged: false,
            zoom,
            rect,
            smoothed_offset: Vec2::ZERO,
            follow: FollowTarget::Target {
                id: home,
                offset: Vec2::ZERO,
            },
            focus: Vec2::ZERO,
            shake: None,
            shake_offset: Vec2::ZERO,
        }
    }

    pub fn slot(&self) -> SlotId {
        self.slot
    }

    pub fn kind(&self) -> RegionKind {
        self.kind
    }

    pub fn home(&self) -> TargetId {
        self.home
    }

    pub fn targets(&self) -> &[TargetId] {
        &self.targets
    }

    pub fn tracks(&self, id: TargetId) -> bool {
        self.targets.contains(&id)
    }

    pub fn engagement(&self) -> EngagementState {
        self.engagement
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn rect(&self) -> NormRect {
        self.rect
    }

    pub fn follow(&self) -> FollowTarget {
        self.follow
    }

    pub fn focus(&self) -> Vec2 {
        self.focus
    }

    pub fn is_merged(&self) -> bool {
        self.engagement == EngagementState::Merged
    }

    /// Whether the region renders this frame.
    pub fn is_enabled(&self) -> bool {
        match self.kind {
            RegionKind::Primary | RegionKind::Radar => true,
            RegionKind::Secondary => self.engagement == EngagementState::Active,
        }
    }

    /// Whether the region currently follows a synthetic multi-entity point.
    pub fn has_follow_point(&self) -> bool {
        matches!(self.follow, FollowTarget::Point(_))
    }

    pub(crate) fn set_rect(&mut self, rect: NormRect) {
        self.rect = rect;
    }

    /// Adds a target. Returns false if it was already tracked.
    pub(crate) fn add_target(&mut self, id: TargetId) -> bool {
        if self.tracks(id) {
            return false;
        }
        self.targets.push(id);
        self.on_target_count_changed();
        true
    }

    /// Removes a target. Returns false if it was not tracked.
    pub(crate) fn remove_target(&mut self, id: TargetId) -> bool {
        let Some(index) = self.targets.iter().position(|t| *t == id) else {
            return false;
        };
        self.targets.remove(index);
        self.on_target_count_changed();
        true
    }

    /// Creates or destroys the synthetic follow point when crossing 1 <-> 2+ targets.
    fn on_target_count_changed(&mut self) {
        match (self.targets.len(), self.follow) {
            (2.., FollowTarget::Target { .. }) => {
                self.follow = FollowTarget::Point(self.focus);
            }
            (1, FollowTarget::Point(_)) => {
                self.smoothed_offset = Vec2::ZERO;
                self.follow = FollowTarget::Target {
                    id: self.targets[0],
                    offset: Vec2::ZERO,
                };
            }
            _ => {}
        }
    }

    /// Recomputes zoom and follow target from the current target geometry.
    ///
    /// `snapshots` must be in the same order as `targets()`.
    pub fn frame(
        &mut self,
        snapshots: &[TargetSnapshot],
        config: &CameraConfig,
        screen_aspect: f32,
        delta_seconds: f32,
    ) {
        let aspect = self.rect.aspect(screen_aspect);

        match self.kind {
            RegionKind::Radar => {
                let (Some(radar), Some(target)) = (&config.radar, snapshots.first()) else {
                    return;
                };
                let framing = frame_radar(radar, aspect, config.minimum_zoom);
                self.zoom = framing.zoom;
                self.apply_target_offset(target, framing.world_offset);
            }
            RegionKind::Primary | RegionKind::Secondary => match snapshots {
                [] => {}
                [target] => {
                    let framing =
                        frame_single(target, &config.buffers, aspect, config.minimum_zoom);
                    self.zoom = framing.zoom;

                    // Offsets live in the target's rotated frame.
                    let raw = Vec2::from_angle(-target.rotation()).rotate(framing.world_offset);
                    let t = (config.horizontal_offset_smoothing * delta_seconds).clamp(0.0, 1.0);
                    self.smoothed_offset = Vec2::new(
                        self.smoothed_offset.x + (raw.x - self.smoothed_offset.x) * t,
                        raw.y,
                    );
                    let local = self.smoothed_offset;
                    self.follow = FollowTarget::Target {
                        id: self.targets.first().copied().unwrap_or(self.home),
                        offset: local,
                    };
                    self.focus =
                        target.follow_anchor() + Vec2::from_angle(target.rotation()).rotate(local);
                }
                many => {
                    if let Some((zoom, point)) =
                        frame_multi(many, &config.buffers, aspect, config.minimum_zoom)
                    {
                        self.zoom = zoom;
                        self.follow = FollowTarget::Point(point);
                        self.focus = point;
                    }
                }
            },
        }
    }

    fn apply_target_offset(&mut self, target: &TargetSnapshot, world_offset: Vec2) {
        let local = Vec2::from_angle(-target.rotation()).rotate(world_offset);
        self.follow = FollowTarget::Target {
            id: self.home,
            offset: local,
        };
        self.focus = target.follow_anchor() + world_offset;
    }

    /// Current output of this region.
    pub fn view(&self) -> RegionView {
        RegionView {
            slot: self.slot,
            kind: self.kind,
            enabled: self.is_enabled(),
            rect: self.rect,
            zoom: self.zoom,
            follow: self.follow,
            focus: self.focus + self.shake_offset,
        }
    }
}
