//! Error types for the camera director.

use crate::region::SlotId;
use crate::target::TargetId;

/// Configuration rejected at startup validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a finite, non-negative number (got {value})")]
    NegativeValue { name: &'static str, value: f32 },
    #[error("{name} must be a finite number greater than zero (got {value})")]
    NotPositive { name: &'static str, value: f32 },
    #[error(
        "share_distance ({share}) must be strictly less than engagement_distance ({engagement})"
    )]
    NoHysteresis { share: f32, engagement: f32 },
    #[error("{name} must lie within normalized screen space")]
    ZoneOutOfBounds { name: &'static str },
    #[error("max_concurrent_regions must be at least 1")]
    NoRegionSlots,
    #[error("invalid camera config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Recoverable refusal of a region operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegionError {
    #[error("all {capacity} region slots are occupied")]
    CapacityExceeded { capacity: usize },
    #[error("a primary region already exists for {0:?}")]
    PrimaryExists(TargetId),
    #[error("target {0:?} is already tracked")]
    AlreadyTracked(TargetId),
    #[error("target {0:?} is not tracked by any region")]
    UnknownTarget(TargetId),
    #[error("no region occupies slot {0:?}")]
    NoSuchRegion(SlotId),
    #[error("region in slot {0:?} does not support screen shake")]
    ShakeUnsupported(SlotId),
}
