//! Scene setup - camera, lights, and the gun rig group

use bevy::prelude::*;

use crate::camera::MainCamera;

/// Group entity that holds the active gun model and the muzzle-flash
/// surface. The flash hangs off the rig rather than the model itself, so it
/// survives model swaps and inherits whatever transform the rig carries.
#[derive(Component)]
pub struct GunRig;

/// Plugin for scene setup
pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene);
    }
}

pub fn setup_scene(mut commands: Commands) {
    // Camera starts slightly above the rig, looking down at the origin
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 50f32.to_radians(),
            near: 0.1,
            far: 100.0,
            ..default()
        }),
        Transform::from_xyz(0.0, 0.8, 2.5).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));

    // Soft white ambient fill
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.95, 0.95, 1.0),
        brightness: 300.0,
        ..default()
    });

    // Key light from above and behind the camera
    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 7.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Warm fill so the dark side of the model is not pitch black
    commands.spawn((
        PointLight {
            intensity: 100000.0,
            shadows_enabled: false,
            color: Color::srgb(1.0, 0.95, 0.9),
            ..default()
        },
        Transform::from_xyz(-2.0, 1.0, -2.0),
    ));

    commands.spawn((Transform::default(), Visibility::default(), GunRig));
}
