//! Armory Viewer - 3D gun model viewer with fire simulation
//!
//! Loads a selectable gun model, normalizes it into the shared rig from
//! `armory-scene`, and wires the control panel to the fire controller:
//! single shots, hold-to-fire auto-fire, shot sounds, and the muzzle flash.

pub mod app;
pub mod catalog;
pub mod fire;
pub mod models;
pub mod ui;

pub use app::run;
