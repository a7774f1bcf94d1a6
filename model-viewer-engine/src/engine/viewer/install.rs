use bevy::prelude::*;

use super::session::ViewerSession;
use crate::engine::core::app_state::ViewerLoop;
use crate::engine::loading::driver::ModelInstall;
use crate::engine::scene::airframe::spawn_airframe;
use crate::engine::scene::normalizer::AwaitingNormalization;
use crate::engine::scene::stage::{ModelGroup, ModelRoot};

/// Swap the displayed model for the one the resolver settled on.
pub fn install_pending_model(
    mut commands: Commands,
    mut session: ResMut<ViewerSession>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    groups: Query<Entity, With<ModelGroup>>,
    installed: Query<Entity, With<ModelRoot>>,
    next_state: Res<NextState<ViewerLoop>>,
) {
    if session.pending_install.is_none() {
        return;
    }
    // A queued loop transition replaces the stage; install into the new one.
    if matches!(*next_state, NextState::Pending(_)) {
        return;
    }
    // The stage is built on the frame after the viewer opens.
    let Ok(group) = groups.single() else {
        return;
    };
    let Some(install) = session.take_current_install() else {
        return;
    };

    for previous in &installed {
        commands.entity(previous).despawn();
    }

    match install {
        ModelInstall::Scene {
            generation,
            location,
            model,
        } => {
            commands.spawn((
                Name::new(format!("model:{location}")),
                SceneRoot(model),
                ModelRoot,
                AwaitingNormalization::default(),
                Transform::IDENTITY,
                Visibility::Hidden,
                ChildOf(group),
            ));
            info!("Installed model from {} (generation {})", location, generation);
        }
        ModelInstall::Airframe { generation } => {
            spawn_airframe(&mut commands, &mut meshes, &mut materials, group);
            info!("Installed procedural model (generation {})", generation);
        }
    }
}
