//! Procedural placeholder airframe shown when no real model loads.
//!
//! The blueprint is plain data so its topology and framing can be checked
//! without a renderer; [`spawn_airframe`] turns it into wireframe meshes.

use bevy::color::Alpha;
use bevy::pbr::wireframe::{Wireframe, WireframeColor};
use bevy::prelude::*;
use bevy::render::alpha::AlphaMode;
use constants::airframe::*;

use super::normalizer::{ModelBounds, normalization_transform};
use super::stage::ModelRoot;
use crate::engine::systems::animation::Rotor;

/// Root of a synthesized airframe.
#[derive(Component, Debug, Default)]
pub struct ProceduralAirframe;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Body,
    Arm,
    Motor,
    RotorBlade,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartShape {
    Cuboid(Vec3),
    Cylinder { radius: f32, height: f32 },
}

impl PartShape {
    fn half_extents(&self) -> Vec3 {
        match *self {
            Self::Cuboid(size) => size * 0.5,
            Self::Cylinder { radius, height } => Vec3::new(radius, height * 0.5, radius),
        }
    }

    fn mesh(&self) -> Mesh {
        match *self {
            Self::Cuboid(size) => Cuboid::from_size(size).into(),
            Self::Cylinder { radius, height } => Cylinder::new(radius, height).into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartSpec {
    pub kind: PartKind,
    pub shape: PartShape,
    pub transform: Transform,
}

impl PartSpec {
    fn bounds(&self) -> ModelBounds {
        ModelBounds::from_transformed_box(
            Vec3::ZERO,
            self.shape.half_extents(),
            &self.transform.compute_affine(),
        )
    }
}

/// Fixed-topology airframe: one body, two crossed arms and four motor/rotor pairs.
#[derive(Debug, Clone)]
pub struct AirframeBlueprint {
    pub parts: Vec<PartSpec>,
    /// Centers the airframe and scales it to the target size.
    pub root_transform: Transform,
}

impl AirframeBlueprint {
    pub fn build() -> Self {
        let mut parts = vec![PartSpec {
            kind: PartKind::Body,
            shape: PartShape::Cuboid(Vec3::from_array(BODY_SIZE)),
            transform: Transform::IDENTITY,
        }];

        for yaw in ARM_YAWS {
            parts.push(PartSpec {
                kind: PartKind::Arm,
                shape: PartShape::Cylinder {
                    radius: ARM_RADIUS,
                    height: ARM_LENGTH,
                },
                transform: Transform::from_rotation(
                    Quat::from_rotation_y(yaw) * Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
                ),
            });
        }

        for [x, z] in ROTOR_OFFSETS {
            parts.push(PartSpec {
                kind: PartKind::Motor,
                shape: PartShape::Cylinder {
                    radius: MOTOR_RADIUS,
                    height: MOTOR_HEIGHT,
                },
                transform: Transform::from_xyz(x, MOTOR_Y, z),
            });
            parts.push(PartSpec {
                kind: PartKind::RotorBlade,
                shape: PartShape::Cuboid(Vec3::from_array(BLADE_SIZE)),
                transform: Transform::from_xyz(x, BLADE_Y, z),
            });
        }

        let mut blueprint = Self {
            parts,
            root_transform: Transform::IDENTITY,
        };
        blueprint.root_transform = normalization_transform(blueprint.local_bounds()).transform;
        blueprint
    }

    /// Bounds of the parts before the root transform is applied.
    pub fn local_bounds(&self) -> Option<ModelBounds> {
        self.parts
            .iter()
            .map(PartSpec::bounds)
            .reduce(ModelBounds::union)
    }

    /// Bounds as rendered, with the root transform applied.
    pub fn framed_bounds(&self) -> Option<ModelBounds> {
        self.local_bounds()
            .map(|bounds| bounds.transformed(&self.root_transform))
    }

    pub fn count(&self, kind: PartKind) -> usize {
        self.parts.iter().filter(|part| part.kind == kind).count()
    }
}

/// Spawn the placeholder under `parent` and return its root.
pub fn spawn_airframe(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    parent: Entity,
) -> Entity {
    let blueprint = AirframeBlueprint::build();

    // Faint tinted shell; the wireframe overlay carries the shape.
    let frame_material = materials.add(StandardMaterial {
        base_color: FRAME_COLOUR.with_alpha(0.05),
        emissive: FRAME_EMISSIVE.to_linear() * FRAME_EMISSIVE_INTENSITY,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });
    let blade_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.0, 0.0, 0.0, 0.0),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    let root = commands
        .spawn((
            Name::new("procedural_airframe"),
            ModelRoot,
            ProceduralAirframe,
            blueprint.root_transform,
            Visibility::default(),
            ChildOf(parent),
        ))
        .id();

    for (index, part) in blueprint.parts.iter().enumerate() {
        let (material, colour) = match part.kind {
            PartKind::RotorBlade => (blade_material.clone(), BLADE_COLOUR),
            _ => (frame_material.clone(), FRAME_COLOUR),
        };
        let mut entity = commands.spawn((
            Name::new(format!("{:?}_{index}", part.kind).to_lowercase()),
            part.kind,
            Mesh3d(meshes.add(part.shape.mesh())),
            MeshMaterial3d(material),
            part.transform,
            Wireframe,
            WireframeColor { color: colour },
            ChildOf(root),
        ));
        if part.kind == PartKind::RotorBlade {
            entity.insert(Rotor);
        }
    }

    root
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;
    use constants::render_settings::TARGET_SIZE;

    use super::*;

    #[test]
    fn blueprint_has_the_fixed_topology() {
        let blueprint = AirframeBlueprint::build();

        assert_eq!(blueprint.count(PartKind::Body), 1);
        assert_eq!(blueprint.count(PartKind::Arm), 2);
        assert_eq!(blueprint.count(PartKind::Motor), 4);
        assert_eq!(blueprint.count(PartKind::RotorBlade), 4);
        assert_eq!(blueprint.parts.len(), 11);
    }

    #[test]
    fn motors_sit_at_symmetric_offsets() {
        let blueprint = AirframeBlueprint::build();
        let sum: Vec3 = blueprint
            .parts
            .iter()
            .filter(|part| part.kind == PartKind::Motor)
            .map(|part| part.transform.translation)
            .sum();

        assert!(sum.x.abs() < 1e-6 && sum.z.abs() < 1e-6);
    }

    #[test]
    fn arms_lie_flat_and_cross() {
        let blueprint = AirframeBlueprint::build();
        let directions: Vec<Vec3> = blueprint
            .parts
            .iter()
            .filter(|part| part.kind == PartKind::Arm)
            .map(|part| part.transform.rotation * Vec3::Y)
            .collect();

        for direction in &directions {
            assert!(direction.y.abs() < 1e-5);
        }
        assert!(directions[0].dot(directions[1]).abs() < 1e-5);
    }

    #[test]
    fn blueprint_is_centered_at_target_size() {
        let framed = AirframeBlueprint::build().framed_bounds().unwrap();

        assert!((framed.max_dimension() - TARGET_SIZE).abs() < 1e-4);
        assert!(framed.center().length() < 1e-4);
    }

    #[test]
    fn spawned_airframe_tags_every_blade_as_a_rotor() {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        world.init_resource::<Assets<StandardMaterial>>();
        let parent = world.spawn(Transform::IDENTITY).id();

        let root = world
            .run_system_once(
                move |mut commands: Commands,
                      mut meshes: ResMut<Assets<Mesh>>,
                      mut materials: ResMut<Assets<StandardMaterial>>| {
                    spawn_airframe(&mut commands, &mut meshes, &mut materials, parent)
                },
            )
            .unwrap();

        let blades = world
            .query_filtered::<&PartKind, With<Rotor>>()
            .iter(&world)
            .collect::<Vec<_>>();
        assert_eq!(blades.len(), 4);
        assert!(blades.iter().all(|kind| **kind == PartKind::RotorBlade));
        assert_eq!(world.get::<Children>(root).map(|c| c.len()), Some(11));
        assert!(world.get::<ProceduralAirframe>(root).is_some());
    }
}
