//! Command processing system.
//!
//! Applies commands pushed through `CameraCommandQueue` by UI or debug tooling.

use bevy::prelude::*;

use crate::bevy::{CameraCommand, CameraCommandQueue, CameraDirector};

/// System to apply all queued camera commands before the director advances.
pub fn process_camera_commands(
    command_queue: Res<CameraCommandQueue>,
    director: Option<ResMut<CameraDirector>>,
) {
    let Some(mut director) = director else {
        return;
    };

    for command in command_queue.drain() {
        match command {
            CameraCommand::Shake {
                slot,
                intensity,
                duration,
            } => {
                tracing::info!("[command] Shake region {} ({}, {}s)", slot.0, intensity, duration);
                if let Err(err) = director.manager_mut().shake(slot, intensity, duration) {
                    tracing::warn!("[command] Shake failed: {}", err);
                }
            }
            CameraCommand::ShakeEntity {
                entity,
                intensity,
                duration,
            } => {
                let Some(slot) = director.slot_of(entity) else {
                    tracing::warn!("[command] ShakeEntity: {:?} is not framed by any region", entity);
                    continue;
                };
                tracing::info!("[command] ShakeEntity {:?} -> region {}", entity, slot.0);
                if let Err(err) = director.manager_mut().shake(slot, intensity, duration) {
                    tracing::warn!("[command] Shake failed: {}", err);
                }
            }
            CameraCommand::SetEngagementZone(zone) => {
                tracing::info!("[command] SetEngagementZone {:?}", zone);
                if let Err(err) = director.manager_mut().set_engagement_zone(zone) {
                    tracing::warn!("[command] SetEngagementZone rejected: {}", err);
                }
            }
            CameraCommand::Clear => {
                tracing::info!(
                    "[command] Clear (had {} regions)",
                    director.manager().region_count()
                );
                director.manager_mut().clear();
            }
        }
    }
}
