//! Fire control: single shots, auto-fire scheduling, and shot audio
//!
//! A trigger pull is a [`ShotFired`] event. Auto-fire is a repeating timer
//! owned by [`FireControl`]; while it exists the state is `firing`, and
//! dropping it is the only cancellation. Stopping never touches shots that
//! are already in flight: their audio entities and the flash animation run
//! to natural completion.

use bevy::audio::{PlaybackMode, Volume};
use bevy::prelude::*;
use bevy::window::WindowFocused;
use std::time::Duration;

use armory_scene::ShotFired;

use crate::models::ShotSound;

/// Lowest accepted auto-fire rate. Keeps the repeat interval finite when the
/// configured rate is zero or negative.
pub const MIN_FIRE_RATE: f32 = 0.1;

/// Live-read firing configuration, mutated directly by the UI sliders.
/// Volume is read at fire time, rate at auto-fire start.
#[derive(Debug, Clone, Resource)]
pub struct FireSettings {
    /// Playback gain for each shot, 0.0..=1.0.
    pub volume: f32,
    /// Auto-fire rate in shots per second.
    pub rate: f32,
    /// Whether holding the trigger repeats shots.
    pub hold_to_fire: bool,
}

impl Default for FireSettings {
    fn default() -> Self {
        Self {
            volume: 0.8,
            rate: 5.0,
            hold_to_fire: false,
        }
    }
}

/// Auto-fire state: `firing` while the repeat timer exists, `idle` otherwise.
#[derive(Resource, Default)]
pub struct FireControl {
    auto: Option<Timer>,
}

impl FireControl {
    pub fn is_firing(&self) -> bool {
        self.auto.is_some()
    }

    /// Repeat interval for a given rate, clamped to a finite period.
    pub fn interval(shots_per_second: f32) -> Duration {
        Duration::from_secs_f32(1.0 / shots_per_second.max(MIN_FIRE_RATE))
    }

    /// Begin auto-fire. Returns `true` if this call started it, in which
    /// case the caller fires the immediate first shot. No-op while already
    /// firing.
    pub fn start(&mut self, shots_per_second: f32) -> bool {
        if self.auto.is_some() {
            return false;
        }
        self.auto = Some(Timer::new(
            Self::interval(shots_per_second),
            TimerMode::Repeating,
        ));
        true
    }

    /// Stop auto-fire. Idempotent.
    pub fn stop(&mut self) {
        self.auto = None;
    }

    /// Number of scheduled repeats that elapsed during `delta`.
    pub fn shots_due(&mut self, delta: Duration) -> u32 {
        match &mut self.auto {
            Some(timer) => {
                timer.tick(delta);
                timer.times_finished_this_tick()
            }
            None => 0,
        }
    }
}

/// Plugin for the fire controller
pub struct FirePlugin;

impl Plugin for FirePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FireSettings>()
            .init_resource::<FireControl>()
            .add_systems(Update, (tick_auto_fire, stop_on_focus_loss, play_shot_audio));
    }
}

fn tick_auto_fire(
    mut control: ResMut<FireControl>,
    time: Res<Time>,
    mut shots: EventWriter<ShotFired>,
) {
    for _ in 0..control.shots_due(time.delta()) {
        shots.write(ShotFired);
    }
}

/// Losing window focus releases the trigger.
fn stop_on_focus_loss(
    mut focus_events: EventReader<WindowFocused>,
    mut control: ResMut<FireControl>,
) {
    for event in focus_events.read() {
        if !event.focused {
            control.stop();
        }
    }
}

/// Each shot spawns its own audio entity so overlapping shots mix freely;
/// `PlaybackMode::Despawn` releases the entity when playback ends.
fn play_shot_audio(
    mut commands: Commands,
    mut shots: EventReader<ShotFired>,
    sound: Res<ShotSound>,
    settings: Res<FireSettings>,
) {
    for _ in shots.read() {
        let Some(handle) = &sound.0 else {
            continue;
        };
        commands.spawn((
            AudioPlayer::new(handle.clone()),
            PlaybackSettings {
                mode: PlaybackMode::Despawn,
                volume: Volume::Linear(settings.volume),
                ..default()
            },
        ));
    }
}
