//! Bevy application setup

use bevy::asset::AssetMetaCheck;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use armory_scene::ArmoryScenePlugin;

use crate::fire::FirePlugin;
use crate::models::ModelsPlugin;
use crate::ui::UiPlugin;

/// Run the Bevy application
pub fn run() {
    App::new()
        // Near-black background behind the model
        .insert_resource(ClearColor(Color::srgb(0.043, 0.043, 0.043)))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Armory Gun Viewer".to_string(),
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    // Don't look for .meta files next to the assets
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                })
                // The binary entry installs its own tracing subscriber
                .disable::<LogPlugin>(),
        )
        .add_plugins(EguiPlugin {
            enable_multipass_for_primary_context: true,
        })
        .add_plugins(ArmoryScenePlugin)
        .add_plugins(ModelsPlugin)
        .add_plugins(FirePlugin)
        .add_plugins(UiPlugin)
        .run();
}
