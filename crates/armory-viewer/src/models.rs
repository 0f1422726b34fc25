//! Gun model loading, normalization, and swap
//!
//! Loading runs in three stages, all asynchronous from the viewer's point of
//! view: the glTF fetch, the scene spawn (meshes appear a frame or two after
//! the root entity), and the normalize-and-swap that replaces the previous
//! model. The sound for a selection loads independently of its model.

use bevy::asset::LoadState;
use bevy::audio::AudioSource;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use bevy::render::mesh::MeshAabb;

use armory_scene::bounds::{fit_transform, TARGET_DIAGONAL};
use armory_scene::GunRig;

use crate::catalog::{GunCatalog, SelectedGun};

/// Request to load the catalog entry at the given index.
#[derive(Event, Debug)]
pub struct LoadRequest(pub usize);

/// Marker for the currently displayed, normalized gun model.
#[derive(Component)]
pub struct ActiveModel;

/// Marker for a freshly spawned model still hidden and waiting for its
/// meshes to instance.
#[derive(Component)]
pub struct PendingModel;

/// In-flight asset handles for the most recent load request.
#[derive(Resource, Default)]
pub struct ModelLoader {
    model: Option<(String, Handle<Gltf>)>,
    sound: Option<(String, Handle<AudioSource>)>,
}

/// Decoded shot sound for the active selection. `None` means firing is
/// silent: the selection had no sound, or its sound failed to load.
#[derive(Resource, Default)]
pub struct ShotSound(pub Option<Handle<AudioSource>>);

/// Plugin for model loading
pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GunCatalog>()
            .init_resource::<SelectedGun>()
            .init_resource::<ModelLoader>()
            .init_resource::<ShotSound>()
            .add_event::<LoadRequest>()
            .add_systems(Startup, request_initial_model)
            .add_systems(
                Update,
                (
                    handle_load_requests,
                    poll_model_load.after(handle_load_requests),
                    poll_sound_load.after(handle_load_requests),
                    // Must observe poll_model_load's commands: when a newer
                    // request despawns a superseded pending model, finalize
                    // would otherwise still see it this frame and promote an
                    // entity that is already doomed, leaving the rig empty.
                    finalize_pending_model.after(poll_model_load),
                ),
            );
    }
}

/// The viewer starts with the first catalog entry loading, like the
/// reference page does on load.
fn request_initial_model(mut requests: EventWriter<LoadRequest>, selected: Res<SelectedGun>) {
    requests.write(LoadRequest(selected.0));
}

fn handle_load_requests(
    mut requests: EventReader<LoadRequest>,
    catalog: Res<GunCatalog>,
    asset_server: Res<AssetServer>,
    mut loader: ResMut<ModelLoader>,
    mut shot_sound: ResMut<ShotSound>,
) {
    for request in requests.read() {
        let Some(entry) = catalog.entries.get(request.0) else {
            tracing::warn!("Load request for unknown catalog index {}", request.0);
            continue;
        };

        tracing::info!("Loading model: {}", entry.model);
        let handle: Handle<Gltf> = asset_server.load(entry.model.clone());
        loader.model = Some((entry.model.clone(), handle));

        match &entry.sound {
            Some(path) => {
                let handle: Handle<AudioSource> = asset_server.load(path.clone());
                loader.sound = Some((path.clone(), handle));
            }
            None => {
                // Selection without a sound: firing becomes a silent no-op
                loader.sound = None;
                shot_sound.0 = None;
            }
        }
    }
}

/// Check loading state and spawn the scene once the glTF is in.
fn poll_model_load(
    mut commands: Commands,
    mut loader: ResMut<ModelLoader>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    rig: Query<Entity, With<GunRig>>,
    pending: Query<Entity, With<PendingModel>>,
) {
    let Some((path, handle)) = loader.model.clone() else {
        return;
    };

    match asset_server.get_load_state(handle.id()) {
        Some(LoadState::Loaded) => {
            let Some(gltf) = gltf_assets.get(&handle) else {
                return;
            };
            let scene_handle = gltf
                .default_scene
                .clone()
                .or_else(|| gltf.scenes.first().cloned());
            let Some(scene_handle) = scene_handle else {
                tracing::error!("Model has no scenes: {}", path);
                loader.model = None;
                return;
            };

            tracing::info!("Model loaded: {}", path);

            // A newer request supersedes any half-finished swap
            for entity in &pending {
                commands.entity(entity).despawn();
            }

            if let Ok(rig) = rig.single() {
                let child = commands
                    .spawn((
                        SceneRoot(scene_handle),
                        Transform::default(),
                        Visibility::Hidden,
                        PendingModel,
                    ))
                    .id();
                commands.entity(rig).add_child(child);
            }
            loader.model = None;
        }
        Some(LoadState::Failed(err)) => {
            // Keep the previous model on screen rather than show an empty rig
            tracing::error!("Failed to load model {}: {}", path, err);
            loader.model = None;
        }
        _ => {
            // Still loading
        }
    }
}

fn poll_sound_load(
    mut loader: ResMut<ModelLoader>,
    asset_server: Res<AssetServer>,
    mut shot_sound: ResMut<ShotSound>,
) {
    let Some((path, handle)) = loader.sound.clone() else {
        return;
    };

    match asset_server.get_load_state(handle.id()) {
        Some(LoadState::Loaded) => {
            tracing::info!("Shot sound loaded: {}", path);
            shot_sound.0 = Some(handle);
            loader.sound = None;
        }
        Some(LoadState::Failed(err)) => {
            // A missing or undecodable sound just means firing is silent
            tracing::warn!("Failed to load shot sound {}: {}", path, err);
            shot_sound.0 = None;
            loader.sound = None;
        }
        _ => {
            // Still loading
        }
    }
}

/// Once the pending scene has instanced meshes, normalize it into the rig
/// and swap it for the old model. The despawn and the promotion happen in
/// the same command batch, so no frame shows both guns or neither.
fn finalize_pending_model(
    mut commands: Commands,
    pending: Query<Entity, With<PendingModel>>,
    active: Query<Entity, With<ActiveModel>>,
    children_query: Query<&Children>,
    mesh_query: Query<(&Mesh3d, &GlobalTransform)>,
    meshes: Res<Assets<Mesh>>,
    mut transforms: Query<&mut Transform>,
) {
    let Ok(entity) = pending.single() else {
        return;
    };

    // Merge world-space bounds over every mesh in the scene. The pending
    // root sits at the rig origin with identity transform, so world space
    // here is the model's own space.
    let mut min = Vec3::splat(f32::MAX);
    let mut max = Vec3::splat(f32::MIN);
    let mut found_mesh = false;

    fn collect_bounds(
        entity: Entity,
        children_query: &Query<&Children>,
        mesh_query: &Query<(&Mesh3d, &GlobalTransform)>,
        mesh_assets: &Assets<Mesh>,
        min: &mut Vec3,
        max: &mut Vec3,
        found: &mut bool,
    ) {
        if let Ok((mesh_handle, global_transform)) = mesh_query.get(entity) {
            if let Some(mesh) = mesh_assets.get(&mesh_handle.0) {
                if let Some(aabb) = mesh.compute_aabb() {
                    let lo = Vec3::from(aabb.min());
                    let hi = Vec3::from(aabb.max());
                    for corner in [
                        Vec3::new(lo.x, lo.y, lo.z),
                        Vec3::new(hi.x, lo.y, lo.z),
                        Vec3::new(lo.x, hi.y, lo.z),
                        Vec3::new(hi.x, hi.y, lo.z),
                        Vec3::new(lo.x, lo.y, hi.z),
                        Vec3::new(hi.x, lo.y, hi.z),
                        Vec3::new(lo.x, hi.y, hi.z),
                        Vec3::new(hi.x, hi.y, hi.z),
                    ] {
                        let point = global_transform.transform_point(corner);
                        *min = min.min(point);
                        *max = max.max(point);
                    }
                    *found = true;
                }
            }
        }

        if let Ok(children) = children_query.get(entity) {
            for child in children.iter() {
                collect_bounds(child, children_query, mesh_query, mesh_assets, min, max, found);
            }
        }
    }

    collect_bounds(
        entity,
        &children_query,
        &mesh_query,
        meshes.as_ref(),
        &mut min,
        &mut max,
        &mut found_mesh,
    );

    // Scene instances appear a frame or two after the root spawns
    if !found_mesh {
        return;
    }

    if let Ok(mut transform) = transforms.get_mut(entity) {
        *transform = fit_transform(min, max, TARGET_DIAGONAL);
    }

    for old in &active {
        commands.entity(old).despawn();
    }
    commands
        .entity(entity)
        .remove::<PendingModel>()
        .insert((ActiveModel, Visibility::Inherited));
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::{AssetApp, AssetPlugin};

    fn viewer_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(AssetPlugin::default())
            .init_asset::<Mesh>()
            .init_asset::<Gltf>()
            .init_asset::<AudioSource>()
            .add_plugins(ModelsPlugin);
        app
    }

    fn spawn_rig(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((Transform::default(), Visibility::default(), GunRig))
            .id()
    }

    fn spawn_active(app: &mut App, rig: Entity) -> Entity {
        let model = app
            .world_mut()
            .spawn((Transform::default(), Visibility::Inherited, ActiveModel))
            .id();
        app.world_mut().entity_mut(rig).add_child(model);
        model
    }

    fn spawn_pending(app: &mut App, rig: Entity) -> Entity {
        let model = app
            .world_mut()
            .spawn((Transform::default(), Visibility::Hidden, PendingModel))
            .id();
        app.world_mut().entity_mut(rig).add_child(model);
        model
    }

    /// Hang a unit-cube mesh under `parent`, as scene instancing would.
    fn attach_mesh(app: &mut App, parent: Entity) {
        let mesh = app
            .world_mut()
            .resource_mut::<Assets<Mesh>>()
            .add(Mesh::from(Cuboid::new(1.0, 1.0, 1.0)));
        let child = app
            .world_mut()
            .spawn((Mesh3d(mesh), Transform::default(), GlobalTransform::default()))
            .id();
        app.world_mut().entity_mut(parent).add_child(child);
    }

    fn active_models(app: &mut App) -> Vec<Entity> {
        let mut query = app.world_mut().query_filtered::<Entity, With<ActiveModel>>();
        query.iter(app.world()).collect()
    }

    fn pending_models(app: &mut App) -> Vec<Entity> {
        let mut query = app
            .world_mut()
            .query_filtered::<Entity, With<PendingModel>>();
        query.iter(app.world()).collect()
    }

    #[test]
    fn swap_promotes_pending_in_a_single_update() {
        let mut app = viewer_app();
        let rig = spawn_rig(&mut app);
        let old = spawn_active(&mut app, rig);
        let pending = spawn_pending(&mut app, rig);
        attach_mesh(&mut app, pending);

        app.update();

        let active = active_models(&mut app);
        assert_eq!(active, vec![pending]);
        assert_ne!(active[0], old);
        assert!(pending_models(&mut app).is_empty());

        // Unit cube: diagonal sqrt(3), normalized to the target diagonal
        let transform = app.world().get::<Transform>(pending).unwrap();
        let expected = TARGET_DIAGONAL / 3.0f32.sqrt();
        assert!((transform.scale.x - expected).abs() < 1e-5);
        assert!(transform.translation.length() < 1e-5);
    }

    #[test]
    fn pending_without_meshes_leaves_the_active_model_up() {
        let mut app = viewer_app();
        let rig = spawn_rig(&mut app);
        let old = spawn_active(&mut app, rig);
        spawn_pending(&mut app, rig);

        app.update();

        assert_eq!(active_models(&mut app), vec![old]);
        assert_eq!(pending_models(&mut app).len(), 1);
    }

    /// Stand-in for the supersede path in `poll_model_load`: despawn the
    /// stale pending model and spawn its replacement, queued the frame the
    /// stale one's meshes arrive.
    #[derive(Resource, Default)]
    struct ReplacePending(Option<Entity>);

    fn replace_pending(
        mut commands: Commands,
        mut replace: ResMut<ReplacePending>,
        rig: Query<Entity, With<GunRig>>,
    ) {
        let Some(stale) = replace.0.take() else {
            return;
        };
        commands.entity(stale).despawn();
        if let Ok(rig) = rig.single() {
            let fresh = commands
                .spawn((Transform::default(), Visibility::Hidden, PendingModel))
                .id();
            commands.entity(rig).add_child(fresh);
        }
    }

    #[test]
    fn superseded_pending_never_becomes_active() {
        let mut app = viewer_app();
        app.init_resource::<ReplacePending>()
            .add_systems(Update, replace_pending.before(finalize_pending_model));

        let rig = spawn_rig(&mut app);
        let old = spawn_active(&mut app, rig);
        let stale = spawn_pending(&mut app, rig);
        attach_mesh(&mut app, stale);
        app.world_mut().resource_mut::<ReplacePending>().0 = Some(stale);

        // The stale pending is despawned before finalize runs, so it is not
        // promoted and the old model keeps the rig occupied.
        app.update();
        assert_eq!(active_models(&mut app), vec![old]);
        let pending = pending_models(&mut app);
        assert_eq!(pending.len(), 1);
        assert_ne!(pending[0], stale);

        // Once the replacement's meshes arrive it swaps in normally.
        attach_mesh(&mut app, pending[0]);
        app.update();
        assert_eq!(active_models(&mut app), vec![pending[0]]);
        assert!(pending_models(&mut app).is_empty());
    }
}
