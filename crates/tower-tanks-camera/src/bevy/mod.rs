//! Bevy integration for the camera director.
//!
//! Gameplay entities carry a `CamTarget`; the plugins register them with a
//! `CameraDirector`, advance it every frame and publish its notifications
//! as messages. The rendering plugin additionally drives one `Camera2d`
//! per region.

pub mod components;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_utils;

pub use components::*;
pub use events::*;
pub use plugin::{CameraDirectorSet, TankCameraHeadlessPlugin, TankCameraPlugin};
pub use resources::*;
