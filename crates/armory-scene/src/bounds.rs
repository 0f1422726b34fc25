//! Model-fit math: normalizing a loaded model into the rig

use bevy::prelude::*;

/// Every loaded model is scaled so its bounding-box diagonal has this length.
pub const TARGET_DIAGONAL: f32 = 1.2;

/// Transform that re-centers an axis-aligned bounding box at the origin and
/// uniformly scales it so its diagonal equals `target_diagonal`.
///
/// The translation is `-center * scale`, so the box center lands exactly at
/// the origin after scaling. A degenerate (zero-size) box keeps unit scale.
pub fn fit_transform(min: Vec3, max: Vec3, target_diagonal: f32) -> Transform {
    let center = (min + max) * 0.5;
    let diagonal = (max - min).length();
    let scale = if diagonal <= f32::EPSILON {
        1.0
    } else {
        target_diagonal / diagonal
    };
    Transform::from_translation(-center * scale).with_scale(Vec3::splat(scale))
}
