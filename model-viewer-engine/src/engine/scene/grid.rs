//! Flat reference grid under the model.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::view::NoFrustumCulling;
use constants::render_settings::{
    GRID_CENTRE_COLOUR, GRID_DIVISIONS, GRID_LINE_COLOUR, GRID_SIZE, GRID_Y,
};

use super::stage::ViewerScoped;

#[derive(Component)]
pub struct GroundGrid;

/// Line segment endpoints for a square grid centered on the origin, split
/// into the two centre lines and the rest.
pub fn grid_segments(size: f32, divisions: u32) -> (Vec<[Vec3; 2]>, Vec<[Vec3; 2]>) {
    let half = size * 0.5;
    let step = size / divisions as f32;
    let mut centre = Vec::new();
    let mut lines = Vec::new();

    for i in 0..=divisions {
        let offset = -half + i as f32 * step;
        let along_z = [Vec3::new(offset, 0.0, -half), Vec3::new(offset, 0.0, half)];
        let along_x = [Vec3::new(-half, 0.0, offset), Vec3::new(half, 0.0, offset)];
        let target = if i * 2 == divisions {
            &mut centre
        } else {
            &mut lines
        };
        target.push(along_z);
        target.push(along_x);
    }

    (centre, lines)
}

fn line_list_mesh(segments: &[[Vec3; 2]]) -> Mesh {
    let vertices: Vec<[f32; 3]> = segments
        .iter()
        .flat_map(|[a, b]| [a.to_array(), b.to_array()])
        .collect();
    let indices: Vec<u32> = (0..vertices.len() as u32).collect();

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Spawn the 20x20 grid two units below the model.
pub fn spawn_ground_grid(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let (centre, lines) = grid_segments(GRID_SIZE, GRID_DIVISIONS);

    for (segments, colour, name) in [
        (centre, GRID_CENTRE_COLOUR, "grid_centre"),
        (lines, GRID_LINE_COLOUR, "grid_lines"),
    ] {
        let material = materials.add(StandardMaterial {
            base_color: colour,
            unlit: true,
            ..default()
        });
        commands.spawn((
            Name::new(name),
            Mesh3d(meshes.add(line_list_mesh(&segments))),
            MeshMaterial3d(material),
            Transform::from_xyz(0.0, GRID_Y, 0.0),
            Visibility::Visible,
            NoFrustumCulling,
            GroundGrid,
            ViewerScoped,
        ));
    }
}
