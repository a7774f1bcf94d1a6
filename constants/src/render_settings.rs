use bevy::color::Color;

/// Largest bounding-box dimension of every model after normalization.
pub const TARGET_SIZE: f32 = 4.0;

pub const GRID_SIZE: f32 = 20.0;
pub const GRID_DIVISIONS: u32 = 20;
pub const GRID_Y: f32 = -2.0;
pub const GRID_CENTRE_COLOUR: Color = Color::srgb(0.0, 1.0, 0.616);
pub const GRID_LINE_COLOUR: Color = Color::srgb(0.118, 0.161, 0.231);

/// Rotor spin per rendered frame, in radians.
pub const ROTOR_SPIN_PER_FRAME: f32 = 0.3;
pub const HOVER_AMPLITUDE: f32 = 0.1;

pub const AMBIENT_COLOUR: Color = Color::srgb(0.251, 0.251, 0.251);
pub const AMBIENT_BRIGHTNESS: f32 = 600.0;
pub const KEY_LIGHT_POSITION: [f32; 3] = [5.0, 10.0, 7.0];
pub const KEY_LIGHT_ILLUMINANCE: f32 = 4_000.0;
pub const FILL_LIGHT_POSITION: [f32; 3] = [0.0, 20.0, 0.0];
pub const FILL_LIGHT_ILLUMINANCE: f32 = 1_500.0;
pub const BACK_LIGHT_POSITION: [f32; 3] = [-5.0, 0.0, -5.0];
pub const BACK_LIGHT_COLOUR: Color = Color::srgb(0.0, 1.0, 0.616);
pub const BACK_LIGHT_ILLUMINANCE: f32 = 2_000.0;

/// Frames the normalizer waits for mesh bounds before using what it has.
pub const NORMALIZATION_FRAME_BUDGET: u32 = 120;
