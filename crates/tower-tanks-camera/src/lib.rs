//! Tower Tanks camera director.
//!
//! Dynamic multi-viewport camera allocation for a 2D tank combat game. The
//! director decides every frame how many screen regions exist, which tanks
//! each region frames, how far each region zooms, and when opponent regions
//! merge into or split from the player's view.
//!
//! The engine core (`manager`, `region`, `partition`, `engagement`) is plain
//! Rust and runs without an ECS. The `bevy` module wires it into a Bevy app.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod config;
pub mod engagement;
pub mod error;
pub mod geometry;
pub mod manager;
pub mod offscreen;
pub mod partition;
pub mod region;
pub mod shake;
pub mod target;

// Bevy integration
pub mod bevy;

pub use config::{Buffers, CameraConfig, RadarConfig, ShakeConfig};
pub use engagement::{EngagementState, Thresholds, Transition};
pub use error::{ConfigError, RegionError};
pub use geometry::{Extents, NormRect, WorldBounds, WorldFrame, project_extents};
pub use manager::{CameraEvent, CameraManager};
pub use offscreen::OffscreenIndicator;
pub use partition::partition;
pub use region::{FollowTarget, Framing, RegionKind, RegionView, SlotId, ViewportRegion};
pub use shake::ShakeState;
pub use target::{TargetId, TargetProvider, TargetSnapshot, TrackedEntity};
