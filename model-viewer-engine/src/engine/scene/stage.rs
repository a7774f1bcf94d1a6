use bevy::prelude::*;

use super::grid::spawn_ground_grid;
use super::lighting::spawn_lighting;
use crate::engine::camera::orbit_camera::{OrbitCamera, spawn_viewer_camera};
use crate::engine::core::config::ViewerConfig;
use crate::engine::viewer::session::ViewerSession;

/// Owned by one open viewer; despawned when it closes.
#[derive(Component, Default)]
pub struct ViewerScoped;

/// Parent of whichever model is on display. Carries the hover offset.
#[derive(Component, Default)]
pub struct ModelGroup;

/// Root of an installed model, loaded or synthesized.
#[derive(Component, Default)]
pub struct ModelRoot;

pub fn spawn_viewer_stage(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<ViewerConfig>,
) {
    spawn_viewer_camera(&mut commands, &config);
    spawn_lighting(&mut commands);
    spawn_ground_grid(&mut commands, &mut meshes, &mut materials);
    commands.spawn((
        Name::new("model_group"),
        ModelGroup,
        Transform::IDENTITY,
        Visibility::default(),
        ViewerScoped,
    ));

    #[cfg(not(target_arch = "wasm32"))]
    crate::engine::systems::status_overlay::spawn_status_overlay(&mut commands);

    info!("Viewer stage ready");
}

/// Release everything the open viewer owned. Runs once per close.
pub fn teardown_viewer_stage(
    mut commands: Commands,
    scoped: Query<Entity, With<ViewerScoped>>,
    mut session: ResMut<ViewerSession>,
) {
    let mut released = 0;
    for entity in &scoped {
        commands.entity(entity).despawn();
        released += 1;
    }
    commands.remove_resource::<OrbitCamera>();
    commands.insert_resource(AmbientLight::default());
    session.record_teardown();
    info!(
        "Viewer stage released ({} root entities, teardown #{})",
        released,
        session.teardowns()
    );
}
