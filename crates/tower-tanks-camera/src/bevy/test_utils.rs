//! Test utilities for headless Bevy integration tests.
//!
//! Provides `TestApp`, a wrapper around `bevy::app::App` that uses
//! `MinimalPlugins` + `TankCameraHeadlessPlugin` for testing the director
//! without a rendering or windowing backend.

use bevy::prelude::*;

use crate::bevy::plugin::{CameraDirectorSet, TankCameraHeadlessPlugin};
use crate::bevy::{
    CamTarget, CameraDirector, CombatStateChangedEvent, RegionEngagedEvent, RegionLifecycleEvent,
};
use crate::config::CameraConfig;
use crate::geometry::Extents;
use crate::manager::CameraManager;

/// Messages observed since the app was created.
#[derive(Resource, Default)]
pub(crate) struct Collected {
    pub engaged: Vec<RegionEngagedEvent>,
    pub combat: Vec<bool>,
    pub lifecycle: Vec<RegionLifecycleEvent>,
}

fn collect_messages(
    mut engaged: MessageReader<RegionEngagedEvent>,
    mut combat: MessageReader<CombatStateChangedEvent>,
    mut lifecycle: MessageReader<RegionLifecycleEvent>,
    mut collected: ResMut<Collected>,
) {
    collected.engaged.extend(engaged.read().copied());
    collected.combat.extend(combat.read().map(|e| e.in_combat));
    collected.lifecycle.extend(lifecycle.read().copied());
}

/// A headless Bevy app wrapper for testing.
pub(crate) struct TestApp {
    pub app: App,
}

impl TestApp {
    /// Create a new test app with the given director config.
    pub fn with_config(config: CameraConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(TankCameraHeadlessPlugin {
            config,
            command_queue: None,
        });
        app.init_resource::<Collected>();
        app.add_systems(Update, collect_messages.after(CameraDirectorSet));
        // Pause virtual time so frames advance only through explicit updates.
        app.world_mut()
            .resource_mut::<Time<Virtual>>()
            .pause();
        // Run one update to initialize all resources
        app.update();
        Self { app }
    }

    /// Run a single frame update.
    pub fn update(&mut self) {
        self.app.update();
    }

    /// Spawn a tank-sized target at `(x, 0)`.
    pub fn spawn_target(&mut self, x: f32, primary: bool) -> Entity {
        let target = CamTarget::new(Extents::symmetric(2.0, 1.0));
        let target = if primary { target.primary() } else { target };
        self.app
            .world_mut()
            .spawn((target, GlobalTransform::from_translation(Vec3::new(x, 0.0, 0.0))))
            .id()
    }

    /// Teleport a target horizontally.
    pub fn move_target(&mut self, entity: Entity, x: f32) {
        self.app
            .world_mut()
            .entity_mut(entity)
            .insert(GlobalTransform::from_translation(Vec3::new(x, 0.0, 0.0)));
    }

    pub fn director(&self) -> &CameraDirector {
        self.app.world().resource::<CameraDirector>()
    }

    pub fn manager(&self) -> &CameraManager {
        self.director().manager()
    }

    pub fn collected(&self) -> &Collected {
        self.app.world().resource::<Collected>()
    }

    /// Get a mutable reference to the World.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
