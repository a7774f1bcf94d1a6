use bevy::gltf::GltfExtras;
use bevy::prelude::*;
use bevy::time::Real;
use constants::render_settings::{HOVER_AMPLITUDE, ROTOR_SPIN_PER_FRAME};
use serde::Deserialize;

use crate::engine::scene::stage::ModelGroup;

/// Spins about its local Y axis every frame.
#[derive(Component, Debug, Default)]
pub struct Rotor;

/// Vertical hover offset of the model group at a given wall-clock time.
pub fn hover_offset(elapsed_secs: f64) -> f32 {
    elapsed_secs.sin() as f32 * HOVER_AMPLITUDE
}

pub fn spin_rotors(mut rotors: Query<&mut Transform, With<Rotor>>) {
    for mut transform in &mut rotors {
        transform.rotate_local_y(ROTOR_SPIN_PER_FRAME);
    }
}

pub fn hover_model_group(
    time: Res<Time<Real>>,
    mut groups: Query<&mut Transform, With<ModelGroup>>,
) {
    let offset = hover_offset(time.elapsed_secs_f64());
    for mut transform in &mut groups {
        transform.translation.y = offset;
    }
}

#[derive(Deserialize)]
struct NodeExtras {
    #[serde(default, rename = "isRotor")]
    is_rotor: bool,
}

/// Authored models opt into rotor animation with `{"isRotor": true}` node extras.
pub fn tag_authored_rotors(
    mut commands: Commands,
    nodes: Query<(Entity, &GltfExtras), Added<GltfExtras>>,
) {
    for (entity, extras) in &nodes {
        match serde_json::from_str::<NodeExtras>(&extras.value) {
            Ok(NodeExtras { is_rotor: true }) => {
                commands.entity(entity).insert(Rotor);
            }
            Ok(_) => {}
            Err(error) => debug!("Ignoring unreadable glTF extras on {:?}: {}", entity, error),
        }
    }
}
