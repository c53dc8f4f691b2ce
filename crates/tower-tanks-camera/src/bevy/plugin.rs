//! Bevy plugins for the camera director.
//!
//! Provides:
//! - `TankCameraHeadlessPlugin`: Director logic only (no window or camera dependencies) for headless testing
//! - `TankCameraPlugin`: `TankCameraHeadlessPlugin` + window aspect tracking and per-region cameras

use bevy::prelude::*;

use crate::bevy::events::*;
use crate::bevy::resources::*;
use crate::bevy::systems;
use crate::config::CameraConfig;
use crate::manager::CameraManager;

/// Systems that register targets, advance the director and forward its messages.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CameraDirectorSet;

// ============================================================================
// Headless Plugin (logic only, no rendering/window dependencies)
// ============================================================================

/// Headless plugin containing the camera director without window or camera dependencies.
///
/// Use this plugin in tests with `MinimalPlugins`.
///
/// Excluded systems (rendering-dependent):
/// - Window-dependent systems (update_screen_aspect)
/// - Camera2d spawning and viewport sync (sync_region_cameras)
#[derive(Default)]
pub struct TankCameraHeadlessPlugin {
    pub config: CameraConfig,
    pub command_queue: Option<CameraCommandQueue>,
}

impl Plugin for TankCameraHeadlessPlugin {
    fn build(&self, app: &mut App) {
        // ====================================================================
        // Resources
        // ====================================================================

        match CameraManager::new(self.config.clone()) {
            Ok(manager) => {
                app.insert_resource(CameraDirector::new(manager));
            }
            Err(err) => {
                // Systems no-op without a director.
                tracing::error!("[camera] Invalid camera config, director disabled: {}", err);
            }
        }
        app.insert_resource(self.command_queue.clone().unwrap_or_default())
            .init_resource::<ScreenAspect>();

        // ====================================================================
        // Messages
        // ====================================================================

        app.add_message::<RegionEngagedEvent>()
            .add_message::<CombatStateChangedEvent>()
            .add_message::<RegionLifecycleEvent>();

        // ====================================================================
        // Director systems
        // ====================================================================

        app.add_systems(
            Update,
            (
                systems::process_camera_commands,
                systems::register_cam_targets,
                systems::unregister_cam_targets,
                systems::advance_camera_director,
                systems::forward_camera_events,
            )
                .chain()
                .in_set(CameraDirectorSet),
        );
    }
}

// ============================================================================
// Rendering Plugin (headless + cameras)
// ============================================================================

/// Full plugin: director logic plus one `Camera2d` per region.
#[derive(Default)]
pub struct TankCameraPlugin {
    pub config: CameraConfig,
    pub command_queue: Option<CameraCommandQueue>,
}

impl Plugin for TankCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(TankCameraHeadlessPlugin {
            config: self.config.clone(),
            command_queue: self.command_queue.clone(),
        });

        app.add_systems(
            Update,
            systems::update_screen_aspect.before(CameraDirectorSet),
        );
        app.add_systems(
            PostUpdate,
            systems::sync_region_cameras.before(bevy::transform::TransformSystems::Propagate),
        );
    }
}
