//! Armory Scene - shared 3D rendering components
//!
//! This crate provides the scene pieces the viewer application builds on:
//! the orbit camera, lighting, the gun rig group that holds the active
//! model, and the muzzle-flash surface with its fade animation.

pub mod bounds;
pub mod camera;
pub mod flash;
pub mod scene;

use bevy::prelude::*;

/// Plugin that sets up the shared 3D scene components
pub struct ArmoryScenePlugin;

impl Plugin for ArmoryScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(flash::FlashPlugin);
    }
}

// Re-export commonly used types
pub use camera::CameraSettings;
pub use flash::ShotFired;
pub use scene::GunRig;
