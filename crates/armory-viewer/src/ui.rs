//! Control panel and trigger input wiring using bevy_egui

use bevy::prelude::*;
use bevy_egui::{egui, EguiContextPass, EguiContexts};

use armory_scene::{CameraSettings, ShotFired};

use crate::catalog::{GunCatalog, SelectedGun};
use crate::fire::{FireControl, FireSettings};
use crate::models::LoadRequest;

/// Whether the on-screen fire button was held last frame, for edge
/// detection. The pointer leaving the button counts as a release.
#[derive(Resource, Default)]
pub struct TriggerHeld(pub bool);

/// Plugin for the control panel
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TriggerHeld>()
            .add_systems(EguiContextPass, control_panel)
            .add_systems(Update, keyboard_fire);
    }
}

fn control_panel(
    mut contexts: EguiContexts,
    catalog: Res<GunCatalog>,
    mut selected: ResMut<SelectedGun>,
    mut settings: ResMut<FireSettings>,
    mut control: ResMut<FireControl>,
    mut trigger_held: ResMut<TriggerHeld>,
    mut camera_settings: ResMut<CameraSettings>,
    mut load_requests: EventWriter<LoadRequest>,
    mut shots: EventWriter<ShotFired>,
) {
    let ctx = contexts.ctx_mut();

    egui::SidePanel::left("controls_panel")
        .default_width(230.0)
        .show(ctx, |ui| {
            ui.heading("Armory");
            ui.separator();

            let current = catalog
                .entries
                .get(selected.0)
                .map(|entry| entry.label.as_str())
                .unwrap_or("-");
            egui::ComboBox::from_label("Gun")
                .selected_text(current)
                .show_ui(ui, |ui| {
                    for (index, entry) in catalog.entries.iter().enumerate() {
                        ui.selectable_value(&mut selected.0, index, &entry.label);
                    }
                });
            if ui.button("Load").clicked() {
                load_requests.write(LoadRequest(selected.0));
            }

            ui.separator();
            ui.add(egui::Slider::new(&mut settings.volume, 0.0..=1.0).text("Volume"));
            ui.add(egui::Slider::new(&mut settings.rate, 1.0..=30.0).text("Fire rate"));
            ui.label(format!("{:.0} shots/s", settings.rate));

            let was_hold = settings.hold_to_fire;
            ui.checkbox(&mut settings.hold_to_fire, "Hold to fire");
            if was_hold && !settings.hold_to_fire {
                // Switching modes releases the trigger
                control.stop();
            }

            ui.horizontal(|ui| {
                let response = ui.add_sized([120.0, 32.0], egui::Button::new("FIRE"));
                let held = response.is_pointer_button_down_on();
                if held && !trigger_held.0 {
                    pull_trigger(&settings, &mut *control, &mut shots);
                } else if !held && trigger_held.0 && settings.hold_to_fire {
                    control.stop();
                }
                trigger_held.0 = held;

                let led = if control.is_firing() {
                    egui::Color32::GREEN
                } else {
                    egui::Color32::DARK_GRAY
                };
                ui.colored_label(led, "●");
            });
            if settings.hold_to_fire {
                ui.small("Hold the button or Space to auto-fire");
            }

            ui.separator();
            if ui.button("Reset view").clicked() {
                *camera_settings = CameraSettings::default();
            }
        });
}

/// Shared press behavior for the fire button and the spacebar: hold mode
/// starts auto-fire with its immediate first shot, otherwise one shot.
fn pull_trigger(
    settings: &FireSettings,
    control: &mut FireControl,
    shots: &mut EventWriter<ShotFired>,
) {
    if settings.hold_to_fire {
        if control.start(settings.rate) {
            shots.write(ShotFired);
        }
    } else {
        shots.write(ShotFired);
    }
}

/// Spacebar mirrors the fire button while hold mode is enabled.
fn keyboard_fire(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<FireSettings>,
    mut control: ResMut<FireControl>,
    mut shots: EventWriter<ShotFired>,
) {
    if !settings.hold_to_fire {
        return;
    }
    if keys.just_pressed(KeyCode::Space) {
        pull_trigger(&settings, &mut *control, &mut shots);
    }
    if keys.just_released(KeyCode::Space) {
        control.stop();
    }
}
