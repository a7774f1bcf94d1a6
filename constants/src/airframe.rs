use bevy::color::Color;

pub const BODY_SIZE: [f32; 3] = [1.0, 0.3, 0.6];

pub const ARM_RADIUS: f32 = 0.05;
pub const ARM_LENGTH: f32 = 2.5;
/// Yaw of each crossed arm; the arm cylinder is first laid flat by a quarter turn about Z.
pub const ARM_YAWS: [f32; 2] = [
    std::f32::consts::FRAC_PI_4,
    -std::f32::consts::FRAC_PI_4,
];

pub const MOTOR_RADIUS: f32 = 0.15;
pub const MOTOR_HEIGHT: f32 = 0.2;
pub const MOTOR_Y: f32 = 0.1;

pub const BLADE_SIZE: [f32; 3] = [1.2, 0.02, 0.1];
pub const BLADE_Y: f32 = 0.25;

/// Symmetric (x, z) offsets of the four motor/rotor pairs.
pub const ROTOR_OFFSETS: [[f32; 2]; 4] = [[0.8, 0.8], [-0.8, 0.8], [0.8, -0.8], [-0.8, -0.8]];

pub const FRAME_COLOUR: Color = Color::srgb(0.0, 1.0, 0.616);
pub const FRAME_EMISSIVE: Color = Color::srgb(0.0, 0.2, 0.125);
pub const FRAME_EMISSIVE_INTENSITY: f32 = 0.5;
pub const BLADE_COLOUR: Color = Color::srgb(0.0, 0.941, 1.0);
