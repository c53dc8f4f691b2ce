//! Render-side camera systems.
//!
//! One `Camera2d` exists per region slot. Cameras are spawned on demand and
//! deactivated (never despawned) when their region goes away, so the render
//! target is reused when the slot is filled again.

use bevy::camera::{ScalingMode, Viewport};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::bevy::{CameraDirector, RegionCamera, ScreenAspect};
use crate::geometry::NormRect;
use crate::region::RegionView;

/// Keeps `ScreenAspect` in step with the primary window.
pub fn update_screen_aspect(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut aspect: ResMut<ScreenAspect>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    if window.height() > 0.0 {
        let current = window.width() / window.height();
        if (aspect.0 - current).abs() > f32::EPSILON {
            aspect.0 = current;
        }
    }
}

/// Pixel position (top-left origin) and size of a normalized rectangle on a window.
pub fn physical_viewport(rect: NormRect, window_size: UVec2) -> (UVec2, UVec2) {
    let size = window_size.as_vec2();
    let position = Vec2::new(rect.x * size.x, (1.0 - rect.top()) * size.y);
    let extent = Vec2::new(rect.width * size.x, rect.height * size.y).max(Vec2::ONE);
    (position.round().as_uvec2(), extent.round().as_uvec2())
}

fn region_projection(zoom: f32) -> Projection {
    Projection::Orthographic(OrthographicProjection {
        scaling_mode: ScalingMode::FixedVertical {
            viewport_height: zoom * 2.0,
        },
        ..OrthographicProjection::default_2d()
    })
}

/// Pushes every region's rectangle, zoom and focus onto its camera.
pub fn sync_region_cameras(
    mut commands: Commands,
    director: Option<Res<CameraDirector>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cameras: Query<(&RegionCamera, &mut Camera, &mut Projection, &mut Transform)>,
) {
    let Some(director) = director else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let window_size = UVec2::new(window.physical_width(), window.physical_height());
    let views: Vec<RegionView> = director.manager().views();

    for (region_camera, mut camera, mut projection, mut transform) in cameras.iter_mut() {
        let Some(view) = views.iter().find(|v| v.slot == region_camera.slot) else {
            camera.is_active = false;
            continue;
        };

        let (position, size) = physical_viewport(view.rect, window_size);
        camera.viewport = Some(Viewport {
            physical_position: position,
            physical_size: size,
            ..default()
        });
        camera.is_active = view.enabled;
        *projection = region_projection(view.zoom);
        transform.translation.x = view.focus.x;
        transform.translation.y = view.focus.y;
    }

    for view in &views {
        if cameras.iter().any(|(rc, ..)| rc.slot == view.slot) {
            continue;
        }
        tracing::info!("[camera] Spawning camera for region {}", view.slot.0);
        commands.spawn((
            Camera2d,
            Camera {
                order: view.slot.0 as isize,
                is_active: false,
                ..default()
            },
            region_projection(view.zoom),
            Transform::from_xyz(view.focus.x, view.focus.y, 0.0),
            RegionCamera { slot: view.slot },
        ));
    }
}
