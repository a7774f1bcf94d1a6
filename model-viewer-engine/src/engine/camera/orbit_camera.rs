use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use constants::camera::*;

use crate::engine::core::config::ViewerConfig;
use crate::engine::scene::stage::ViewerScoped;

#[derive(Component)]
pub struct ViewerCamera;

/// Damped orbit around a fixed target, optionally auto-rotating.
///
/// Input accumulates into pending deltas that are applied a fraction at a
/// time, so rotation eases out after the pointer is released.
#[derive(Resource, Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub auto_rotate: bool,
    yaw_delta: f32,
    pitch_delta: f32,
}

impl OrbitCamera {
    pub fn from_position(position: Vec3, target: Vec3, auto_rotate: bool) -> Self {
        let offset = position - target;
        let distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / offset.length().max(f32::EPSILON))
                .asin()
                .clamp(-PITCH_LIMIT, PITCH_LIMIT),
            distance,
            auto_rotate,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
        }
    }

    /// Queue a drag, in pixels.
    pub fn rotate(&mut self, drag: Vec2) {
        self.yaw_delta -= drag.x * ROTATE_SENSITIVITY;
        self.pitch_delta += drag.y * ROTATE_SENSITIVITY;
    }

    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn advance(&mut self, delta_secs: f32) {
        if self.auto_rotate {
            self.yaw += AUTO_ROTATE_SPEED * delta_secs;
        }
        self.yaw += self.yaw_delta * DAMPING_FACTOR;
        self.pitch = (self.pitch + self.pitch_delta * DAMPING_FACTOR).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw_delta *= 1.0 - DAMPING_FACTOR;
        self.pitch_delta *= 1.0 - DAMPING_FACTOR;
    }

    pub fn position(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        self.target + Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position()).looking_at(self.target, Vec3::Y)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_position(Vec3::from_array(START_POSITION), Vec3::ZERO, true)
    }
}

/// Multiplicative distance change for one wheel event; positive scroll zooms in.
pub fn zoom_factor(unit: MouseScrollUnit, amount: f32) -> f32 {
    let steps = match unit {
        MouseScrollUnit::Line => amount,
        MouseScrollUnit::Pixel => amount * PIXEL_ZOOM_SCALE,
    };
    LINE_ZOOM_STEP.powf(steps)
}

pub fn spawn_viewer_camera(commands: &mut Commands, config: &ViewerConfig) {
    let orbit = OrbitCamera::from_position(
        Vec3::from_array(START_POSITION),
        Vec3::ZERO,
        config.auto_rotate,
    );
    commands.spawn((
        Name::new("viewer_camera"),
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: FOV_DEGREES.to_radians(),
            near: NEAR_PLANE,
            far: FAR_PLANE,
            ..default()
        }),
        orbit.transform(),
        ViewerCamera,
        ViewerScoped,
    ));
    commands.insert_resource(orbit);
}

pub fn orbit_camera_controller(
    mut orbit: ResMut<OrbitCamera>,
    mut cameras: Query<&mut Transform, With<ViewerCamera>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let drag: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();
    if mouse_button.pressed(MouseButton::Left) && drag != Vec2::ZERO {
        orbit.rotate(drag);
    }

    for event in scroll_events.read() {
        orbit.zoom(zoom_factor(event.unit, event.y));
    }

    orbit.advance(time.delta_secs());

    if let Ok(mut transform) = cameras.single_mut() {
        *transform = orbit.transform();
    }
}
