//! Systems driving the camera director from ECS state.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::bevy::{
    CamTarget, CameraDirector, CombatStateChangedEvent, RegionChange, RegionEngagedEvent,
    RegionLifecycleEvent, ScreenAspect,
};
use crate::error::RegionError;
use crate::manager::CameraEvent;
use crate::region::RegionKind;
use crate::target::{TargetId, TargetSnapshot};

/// Registers newly added `CamTarget`s with the director.
pub fn register_cam_targets(
    targets: Query<(Entity, &CamTarget), Added<CamTarget>>,
    director: Option<ResMut<CameraDirector>>,
) {
    let Some(mut director) = director else {
        return;
    };

    for (entity, target) in targets.iter() {
        let id = director.remember(entity);
        match director.manager_mut().on_target_spawned(id, target.primary) {
            Ok(slot) => {
                tracing::info!("[camera] {:?} tracked in region {}", entity, slot.0);
            }
            // Already logged and queued by the manager.
            Err(RegionError::CapacityExceeded { .. }) => {}
            Err(err) => {
                tracing::warn!("[camera] Could not track {:?}: {}", entity, err);
            }
        }
    }
}

/// Releases targets whose `CamTarget` was removed or whose entity was despawned.
pub fn unregister_cam_targets(
    mut removed: RemovedComponents<CamTarget>,
    director: Option<ResMut<CameraDirector>>,
) {
    let Some(mut director) = director else {
        removed.clear();
        return;
    };

    for entity in removed.read() {
        let id = director.forget(entity);
        if let Err(err) = director.manager_mut().on_target_destroyed(id) {
            tracing::debug!("[camera] Ignoring removal of {:?}: {}", entity, err);
        }
    }
}

/// Captures every target's geometry and runs one director tick.
pub fn advance_camera_director(
    time: Res<Time>,
    aspect: Res<ScreenAspect>,
    targets: Query<(Entity, &CamTarget, &GlobalTransform)>,
    director: Option<ResMut<CameraDirector>>,
) {
    let Some(mut director) = director else {
        return;
    };

    let snapshots: HashMap<TargetId, TargetSnapshot> = targets
        .iter()
        .map(|(entity, target, transform)| (TargetId::from(entity), target.snapshot(transform)))
        .collect();

    let manager = director.manager_mut();
    manager.set_screen_aspect(aspect.0);
    manager.advance(time.delta_secs(), &snapshots);
}

/// Turns the director's event buffer into ECS messages.
pub fn forward_camera_events(
    director: Option<ResMut<CameraDirector>>,
    mut engaged: MessageWriter<RegionEngagedEvent>,
    mut combat: MessageWriter<CombatStateChangedEvent>,
    mut lifecycle: MessageWriter<RegionLifecycleEvent>,
) {
    let Some(mut director) = director else {
        return;
    };

    for event in director.manager_mut().drain_events() {
        match event {
            CameraEvent::RegionCreated { slot, kind, .. } => {
                lifecycle.write(RegionLifecycleEvent {
                    slot,
                    kind,
                    change: RegionChange::Created,
                });
            }
            CameraEvent::RegionRemoved { slot, kind } => {
                lifecycle.write(RegionLifecycleEvent {
                    slot,
                    kind,
                    change: RegionChange::Removed,
                });
            }
            CameraEvent::Merged { slot, .. } => {
                lifecycle.write(RegionLifecycleEvent {
                    slot,
                    kind: RegionKind::Secondary,
                    change: RegionChange::Merged,
                });
            }
            CameraEvent::Split { slot, .. } => {
                lifecycle.write(RegionLifecycleEvent {
                    slot,
                    kind: RegionKind::Secondary,
                    change: RegionChange::Split,
                });
            }
            CameraEvent::NewlyEngaged { slot, target } => {
                if let Some(entity) = director.entity(target) {
                    engaged.write(RegionEngagedEvent { slot, entity });
                }
            }
            CameraEvent::EngagementStarted => {
                combat.write(CombatStateChangedEvent { in_combat: true });
            }
            CameraEvent::EngagementCleared => {
                combat.write(CombatStateChangedEvent { in_combat: false });
            }
            CameraEvent::CapacityRefused { .. } => {}
        }
    }
}
