//! Outbound camera messages.
//!
//! Written once per frame from the director's event buffer. UI and audio
//! systems read them with `MessageReader`.

use bevy::prelude::*;

use crate::region::{RegionKind, SlotId};

/// Message fired the first time an opponent region engages.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct RegionEngagedEvent {
    pub slot: SlotId,
    /// The opponent entity that came into range.
    pub entity: Entity,
}

/// Message fired when the "in combat" state flips.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatStateChangedEvent {
    pub in_combat: bool,
}

/// What happened to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionChange {
    Created,
    Removed,
    /// The region's entity moved into the primary region.
    Merged,
    /// The region's entity moved back out of the primary region.
    Split,
}

/// Message fired on region structure changes.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionLifecycleEvent {
    pub slot: SlotId,
    pub kind: RegionKind,
    pub change: RegionChange,
}
