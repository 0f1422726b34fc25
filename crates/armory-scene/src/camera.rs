//! Camera controls and orbit navigation

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

/// Camera controller settings
#[derive(Debug, Clone, Resource)]
pub struct CameraSettings {
    pub distance: f32,
    pub target_distance: f32, // For smooth zoom
    pub azimuth: f32,
    pub elevation: f32,
    pub target: Vec3,
    pub target_focus: Vec3, // For smooth re-centering
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pub smooth_factor: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: 2.6,
            target_distance: 2.6,
            azimuth: 0.0,
            elevation: 0.31, // Matches the startup pose (0, 0.8, 2.5)
            target: Vec3::ZERO,
            target_focus: Vec3::ZERO,
            sensitivity: 0.005,
            zoom_speed: 0.1,
            smooth_factor: 0.15,
        }
    }
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Spherical orbit position around `target`, Y-up.
pub fn orbit_position(target: Vec3, distance: f32, azimuth: f32, elevation: f32) -> Vec3 {
    let x = distance * elevation.cos() * azimuth.sin();
    let y = distance * elevation.sin();
    let z = distance * elevation.cos() * azimuth.cos();
    target + Vec3::new(x, y, z)
}

/// Plugin for camera controls
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>()
            .add_systems(Update, update_camera);
    }
}

fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut settings: ResMut<CameraSettings>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut mouse_wheel: EventReader<MouseWheel>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut contexts: bevy_egui::EguiContexts,
) {
    // Don't process camera controls while egui wants the mouse
    let egui_wants_pointer = contexts.ctx_mut().wants_pointer_input();

    // Collect mouse motion delta
    let mut total_motion = Vec2::ZERO;
    for motion in mouse_motion.read() {
        total_motion += motion.delta;
    }

    // Orbit with left mouse drag
    if mouse_button.pressed(MouseButton::Left) && !egui_wants_pointer {
        settings.azimuth -= total_motion.x * settings.sensitivity;
        settings.elevation = (settings.elevation - total_motion.y * settings.sensitivity)
            .clamp(-1.5, 1.5);
    }

    // Pan with right mouse drag (vertical plane: camera right and world up)
    if mouse_button.pressed(MouseButton::Right) && !egui_wants_pointer {
        let right = Vec3::new(settings.azimuth.cos(), 0.0, -settings.azimuth.sin());
        let pan_speed = settings.distance * 0.002;
        settings.target_focus -= right * total_motion.x * pan_speed;
        settings.target_focus += Vec3::Y * total_motion.y * pan_speed;
    }

    // Zoom with scroll - smooth zoom using target_distance
    if !egui_wants_pointer {
        for scroll in mouse_wheel.read() {
            let zoom_factor = 1.0 - scroll.y * settings.zoom_speed * 0.3;
            settings.target_distance = (settings.target_distance * zoom_factor).clamp(0.5, 10.0);
        }
    } else {
        // Drain the scroll events even if we're not using them
        for _ in mouse_wheel.read() {}
    }

    // Smooth interpolation for zoom and target
    let dt = time.delta_secs();
    let lerp_factor = 1.0 - (-settings.smooth_factor * 60.0 * dt).exp();
    settings.distance =
        settings.distance + (settings.target_distance - settings.distance) * lerp_factor;
    settings.target = settings.target + (settings.target_focus - settings.target) * lerp_factor;

    if let Ok(mut transform) = camera_query.single_mut() {
        transform.translation =
            orbit_position(settings.target, settings.distance, settings.azimuth, settings.elevation);
        transform.look_at(settings.target, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn orbit_at_zero_angles_sits_on_positive_z() {
        let pos = orbit_position(Vec3::ZERO, 2.5, 0.0, 0.0);
        assert_close(pos, Vec3::new(0.0, 0.0, 2.5));
    }

    #[test]
    fn orbit_at_full_elevation_sits_above_target() {
        let pos = orbit_position(Vec3::ZERO, 3.0, 1.2, std::f32::consts::FRAC_PI_2);
        assert_close(pos, Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn orbit_is_relative_to_target() {
        let target = Vec3::new(1.0, 2.0, 3.0);
        let pos = orbit_position(target, 2.0, 0.0, 0.0);
        assert_close(pos, target + Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn orbit_keeps_distance() {
        let pos = orbit_position(Vec3::ZERO, 2.6, 0.8, 0.31);
        assert!((pos.length() - 2.6).abs() < 1e-5);
    }
}
