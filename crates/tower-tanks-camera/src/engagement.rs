//! Engagement state machine for opponent regions.
//!
//! An opponent region is DISABLED while its entity is far from the player,
//! ACTIVE (rendered in the engagement zone) once it is within
//! `engagement_distance`, and MERGED (folded into the primary region) once it
//! is within `share_distance`. Distances are horizontal only.

use crate::config::CameraConfig;

/// Engagement state of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngagementState {
    #[default]
    Disabled,
    Active,
    Merged,
}

impl EngagementState {
    /// Whether the region counts toward the "in combat" state.
    pub fn is_engaged(self) -> bool {
        matches!(self, Self::Active | Self::Merged)
    }
}

/// Distance thresholds driving the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub engagement: f32,
    pub share: f32,
}

impl From<&CameraConfig> for Thresholds {
    fn from(config: &CameraConfig) -> Self {
        Self {
            engagement: config.engagement_distance,
            share: config.share_distance,
        }
    }
}

/// Side effects the manager must perform for a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// DISABLED -> ACTIVE.
    Engage,
    /// ACTIVE -> DISABLED.
    Disengage,
    /// DISABLED/ACTIVE -> MERGED.
    Merge,
    /// MERGED -> ACTIVE.
    Split,
    /// MERGED -> DISABLED (split, then immediately out of range).
    SplitAndDisengage,
}

/// Horizontal distance between two follow anchors.
pub fn horizontal_distance(a: f32, b: f32) -> f32 {
    (a - b).abs()
}

/// Computes the next state for the given horizontal distance.
///
/// A region leaving MERGED is re-checked against `engagement` in the same step.
/// NaN distances never change the state.
pub fn next_state(
    current: EngagementState,
    distance: f32,
    thresholds: &Thresholds,
) -> EngagementState {
    match current {
        EngagementState::Merged => {
            if distance > thresholds.engagement {
                EngagementState::Disabled
            } else if distance > thresholds.share {
                EngagementState::Active
            } else {
                EngagementState::Merged
            }
        }
        EngagementState::Disabled | EngagementState::Active if distance < thresholds.share => {
            EngagementState::Merged
        }
        EngagementState::Disabled if distance < thresholds.engagement => EngagementState::Active,
        EngagementState::Active if distance > thresholds.engagement => EngagementState::Disabled,
        other => other,
    }
}

/// Classifies a state change into the side effects it requires.
pub fn transition(from: EngagementState, to: EngagementState) -> Option<Transition> {
    use EngagementState::{Active, Disabled, Merged};

    match (from, to) {
        (Disabled, Active) => Some(Transition::Engage),
        (Active, Disabled) => Some(Transition::Disengage),
        (Disabled | Active, Merged) => Some(Transition::Merge),
        (Merged, Active) => Some(Transition::Split),
        (Merged, Disabled) => Some(Transition::SplitAndDisengage),
        _ => None,
    }
}
