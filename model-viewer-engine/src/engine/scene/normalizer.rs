use bevy::math::Affine3A;
use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use bevy::render::view::NoFrustumCulling;
use bevy::scene::{SceneInstance, SceneSpawner};
use constants::render_settings::TARGET_SIZE;

use crate::engine::core::config::ViewerConfig;
use crate::engine::loading::error::ResolutionError;

/// Axis-aligned bounds of a model hierarchy in its root's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl ModelBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounds of a local box after `transform` is applied to its corners.
    pub fn from_transformed_box(center: Vec3, half_extents: Vec3, transform: &Affine3A) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    let corner = center + half_extents * Vec3::new(sx, sy, sz);
                    let world = transform.transform_point3(corner);
                    min = min.min(world);
                    max = max.max(world);
                }
            }
        }
        Self { min, max }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }

    pub fn transformed(&self, transform: &Transform) -> Self {
        Self::from_transformed_box(
            self.center(),
            self.size() * 0.5,
            &transform.compute_affine(),
        )
    }
}

/// Result of fitting a model into the viewing volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalization {
    pub transform: Transform,
    pub degenerate: Option<ResolutionError>,
}

/// Root transform that centers `bounds` on the origin and scales its largest
/// dimension to [`TARGET_SIZE`]. Empty or zero-extent bounds are only
/// recentered, keeping unit scale.
pub fn normalization_transform(bounds: Option<ModelBounds>) -> Normalization {
    let Some(bounds) = bounds.filter(|b| b.min.is_finite() && b.max.is_finite()) else {
        return Normalization {
            transform: Transform::IDENTITY,
            degenerate: Some(ResolutionError::DegenerateGeometry { max_dimension: 0.0 }),
        };
    };

    let center = bounds.center();
    let max_dimension = bounds.max_dimension();
    if max_dimension > 0.0 {
        let scale = TARGET_SIZE / max_dimension;
        Normalization {
            transform: Transform::from_translation(-center * scale)
                .with_scale(Vec3::splat(scale)),
            degenerate: None,
        }
    } else {
        Normalization {
            transform: Transform::from_translation(-center),
            degenerate: Some(ResolutionError::DegenerateGeometry { max_dimension }),
        }
    }
}

/// Loaded model root that has not been fitted into the viewing volume yet.
/// The root stays hidden until the fit is applied.
#[derive(Component, Default)]
pub struct AwaitingNormalization {
    frames_waited: u32,
}

/// Applied fit, kept for diagnostics.
#[derive(Component, Debug, Clone, Copy)]
pub struct NormalizedModel {
    pub scale: f32,
    pub degenerate: bool,
}

/// Fit freshly spawned model scenes once their meshes have bounds.
pub fn normalize_loaded_models(
    mut commands: Commands,
    config: Res<ViewerConfig>,
    scene_spawner: Res<SceneSpawner>,
    mut roots: Query<
        (
            Entity,
            &GlobalTransform,
            &mut Transform,
            &mut Visibility,
            &mut AwaitingNormalization,
            Option<&SceneRoot>,
            Option<&SceneInstance>,
        ),
    >,
    children: Query<&Children>,
    meshes: Query<(&GlobalTransform, Option<&Aabb>, Has<NoFrustumCulling>), With<Mesh3d>>,
) {
    for (root, root_global, mut transform, mut visibility, mut awaiting, scene_root, instance) in
        &mut roots
    {
        awaiting.frames_waited += 1;
        let out_of_budget = awaiting.frames_waited > config.normalization_frame_budget;

        let scene_ready = match (scene_root, instance) {
            (None, _) => true,
            (Some(_), Some(instance)) => scene_spawner.instance_is_ready(**instance),
            (Some(_), None) => false,
        };
        if !scene_ready && !out_of_budget {
            continue;
        }

        let root_inverse = root_global.affine().inverse();
        let mut bounds: Option<ModelBounds> = None;
        let mut missing_bounds = false;
        for descendant in children.iter_descendants(root) {
            let Ok((global, aabb, unculled)) = meshes.get(descendant) else {
                continue;
            };
            let Some(aabb) = aabb else {
                missing_bounds |= !unculled;
                continue;
            };
            let relative = root_inverse * global.affine();
            let part = ModelBounds::from_transformed_box(
                aabb.center.into(),
                aabb.half_extents.into(),
                &relative,
            );
            bounds = Some(bounds.map_or(part, |acc| acc.union(part)));
        }
        if missing_bounds && !out_of_budget {
            continue;
        }
        if out_of_budget {
            warn!(
                "Normalizing {:?} after {} frames with incomplete bounds",
                root, awaiting.frames_waited
            );
        }

        let normalization = normalization_transform(bounds);
        if let Some(degenerate) = &normalization.degenerate {
            warn!("{}", degenerate);
        }
        *transform = normalization.transform;
        *visibility = Visibility::Inherited;
        commands
            .entity(root)
            .remove::<AwaitingNormalization>()
            .insert(NormalizedModel {
                scale: normalization.transform.scale.x,
                degenerate: normalization.degenerate.is_some(),
            });
        info!(
            "Model normalized: scale {:.4}, offset {:?}",
            normalization.transform.scale.x, normalization.transform.translation
        );
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;

    const EPSILON: f32 = 1e-4;

    fn fitted(bounds: ModelBounds) -> ModelBounds {
        bounds.transformed(&normalization_transform(Some(bounds)).transform)
    }

    #[test]
    fn normalized_bounds_are_centered_at_target_size() {
        let samples = [
            ModelBounds::new(Vec3::new(10.0, 20.0, 30.0), Vec3::new(110.0, 40.0, 50.0)),
            ModelBounds::new(Vec3::splat(-0.01), Vec3::new(0.02, 0.005, 0.01)),
            ModelBounds::new(Vec3::new(-3.0, 0.0, -1.0), Vec3::new(-1.0, 0.5, 7.0)),
        ];
        for bounds in samples {
            let result = fitted(bounds);
            assert!((result.max_dimension() - TARGET_SIZE).abs() < EPSILON);
            assert!(result.center().length() < EPSILON, "{:?}", result.center());
        }
    }

    #[test]
    fn flat_model_still_scales_by_its_largest_axis() {
        let bounds = ModelBounds::new(Vec3::new(-1.0, 0.0, -2.0), Vec3::new(1.0, 0.0, 2.0));
        let normalization = normalization_transform(Some(bounds));

        assert!(normalization.degenerate.is_none());
        assert!((normalization.transform.scale.x - 1.0).abs() < EPSILON);
    }

    #[test]
    fn zero_extent_model_is_recentered_without_rescaling() {
        let point = Vec3::new(2.0, -1.0, 5.0);
        let normalization = normalization_transform(Some(ModelBounds::new(point, point)));

        assert_eq!(normalization.transform.scale, Vec3::ONE);
        assert_eq!(normalization.transform.translation, -point);
        assert!(matches!(
            normalization.degenerate,
            Some(ResolutionError::DegenerateGeometry { .. })
        ));
    }

    #[test]
    fn empty_model_keeps_identity() {
        let normalization = normalization_transform(None);

        assert_eq!(normalization.transform, Transform::IDENTITY);
        assert!(normalization.degenerate.is_some());
    }

    #[test]
    fn system_fits_a_hierarchy_and_reveals_it() {
        let mut world = World::new();
        world.insert_resource(ViewerConfig::default());
        world.insert_resource(SceneSpawner::default());

        let root = world
            .spawn((
                Transform::IDENTITY,
                GlobalTransform::IDENTITY,
                Visibility::Hidden,
                AwaitingNormalization::default(),
            ))
            .id();
        // Two unit cubes, one offset by 9 on x: combined bounds x in [-0.5, 9.5].
        for offset in [Vec3::ZERO, Vec3::new(9.0, 0.0, 0.0)] {
            world.spawn((
                Mesh3d(Handle::default()),
                Aabb::from_min_max(Vec3::splat(-0.5), Vec3::splat(0.5)),
                GlobalTransform::from_translation(offset),
                ChildOf(root),
            ));
        }

        world.run_system_once(normalize_loaded_models).unwrap();

        let transform = *world.get::<Transform>(root).unwrap();
        let scale = TARGET_SIZE / 10.0;
        assert!((transform.scale.x - scale).abs() < EPSILON);
        assert!((transform.translation.x + 4.5 * scale).abs() < EPSILON);
        assert_eq!(world.get::<Visibility>(root), Some(&Visibility::Inherited));
        assert!(world.get::<AwaitingNormalization>(root).is_none());
        assert!(!world.get::<NormalizedModel>(root).unwrap().degenerate);
    }

    #[test]
    fn system_waits_for_mesh_bounds() {
        let mut world = World::new();
        world.insert_resource(ViewerConfig::default());
        world.insert_resource(SceneSpawner::default());

        let root = world
            .spawn((
                Transform::IDENTITY,
                GlobalTransform::IDENTITY,
                Visibility::Hidden,
                AwaitingNormalization::default(),
            ))
            .id();
        world.spawn((
            Mesh3d(Handle::default()),
            GlobalTransform::IDENTITY,
            ChildOf(root),
        ));

        world.run_system_once(normalize_loaded_models).unwrap();

        assert!(world.get::<AwaitingNormalization>(root).is_some());
        assert_eq!(world.get::<Visibility>(root), Some(&Visibility::Hidden));
    }
}
