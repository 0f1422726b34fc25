//! Muzzle-flash surface and its fade animation
//!
//! The flash is a single additive quad parented to the gun rig. Each shot
//! restarts the same animation state: opacity fades 1 -> 0 and scale grows
//! 1x -> 2x over [`FLASH_DURATION`], after which the quad hides again. The
//! animation is an elapsed-time state machine ticked every frame, so
//! overlapping shots simply reset it and there is only ever one flash state.

use bevy::prelude::*;
use std::time::Duration;

use crate::scene::GunRig;

/// How long one flash lasts.
pub const FLASH_DURATION: Duration = Duration::from_millis(100);

const FLASH_WIDTH: f32 = 0.4;
const FLASH_HEIGHT: f32 = 0.2;
const FLASH_BASE_SCALE: f32 = 1.0;

/// One trigger pull. Written by the fire controller, consumed here for the
/// visual and by the audio side for the sound instance.
#[derive(Event, Debug)]
pub struct ShotFired;

/// Animation state for the flash quad.
#[derive(Component)]
pub struct MuzzleFlash {
    timer: Timer,
    active: bool,
}

impl Default for MuzzleFlash {
    fn default() -> Self {
        Self {
            timer: Timer::new(FLASH_DURATION, TimerMode::Once),
            active: false,
        }
    }
}

/// Opacity and scale at a given animation progress in `0.0..=1.0`.
pub fn flash_curve(progress: f32) -> (f32, f32) {
    let p = progress.clamp(0.0, 1.0);
    (1.0 - p, FLASH_BASE_SCALE * (1.0 + p))
}

fn flash_color(alpha: f32) -> Color {
    // Warm muzzle-flash tint (#ffd27f)
    Color::srgba(1.0, 0.824, 0.498, alpha)
}

/// Plugin for the muzzle-flash surface
pub struct FlashPlugin;

impl Plugin for FlashPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ShotFired>()
            .add_systems(Startup, spawn_flash.after(crate::scene::setup_scene))
            .add_systems(Update, (trigger_flash, animate_flash).chain());
    }
}

fn spawn_flash(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    rig: Query<Entity, With<GunRig>>,
) {
    let Ok(rig) = rig.single() else {
        tracing::warn!("Gun rig missing, muzzle flash not spawned");
        return;
    };

    let flash = commands
        .spawn((
            Mesh3d(meshes.add(Rectangle::new(FLASH_WIDTH, FLASH_HEIGHT))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: flash_color(0.0),
                unlit: true,
                alpha_mode: AlphaMode::Add,
                ..default()
            })),
            Transform::default(),
            Visibility::Hidden,
            MuzzleFlash::default(),
        ))
        .id();
    commands.entity(rig).add_child(flash);
}

/// Restart the flash animation on every shot. Runs before [`animate_flash`]
/// so a shot landing mid-animation resets opacity and scale the same frame.
fn trigger_flash(
    mut shots: EventReader<ShotFired>,
    mut flash_query: Query<(
        &mut MuzzleFlash,
        &mut Visibility,
        &mut Transform,
        &MeshMaterial3d<StandardMaterial>,
    )>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if shots.is_empty() {
        return;
    }
    shots.clear();

    if let Ok((mut flash, mut visibility, mut transform, material)) = flash_query.single_mut() {
        flash.timer.reset();
        flash.active = true;
        *visibility = Visibility::Visible;
        transform.scale = Vec3::splat(FLASH_BASE_SCALE);
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = flash_color(1.0);
        }
    }
}

fn animate_flash(
    time: Res<Time>,
    mut flash_query: Query<(
        &mut MuzzleFlash,
        &mut Visibility,
        &mut Transform,
        &MeshMaterial3d<StandardMaterial>,
    )>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (mut flash, mut visibility, mut transform, material) in &mut flash_query {
        if !flash.active {
            continue;
        }

        flash.timer.tick(time.delta());
        if flash.timer.finished() {
            flash.active = false;
            *visibility = Visibility::Hidden;
            continue;
        }

        let (alpha, scale) = flash_curve(flash.timer.fraction());
        transform.scale = Vec3::splat(scale);
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = flash_color(alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_starts_opaque_at_base_scale() {
        let (alpha, scale) = flash_curve(0.0);
        assert_eq!(alpha, 1.0);
        assert_eq!(scale, 1.0);
    }

    #[test]
    fn flash_fades_and_grows_linearly() {
        let (alpha, scale) = flash_curve(0.5);
        assert!((alpha - 0.5).abs() < 1e-6);
        assert!((scale - 1.5).abs() < 1e-6);
    }

    #[test]
    fn flash_ends_transparent_at_double_scale() {
        let (alpha, scale) = flash_curve(1.0);
        assert_eq!(alpha, 0.0);
        assert_eq!(scale, 2.0);
    }

    #[test]
    fn progress_past_the_end_is_clamped() {
        assert_eq!(flash_curve(1.7), flash_curve(1.0));
        assert_eq!(flash_curve(-0.3), flash_curve(0.0));
    }
}
