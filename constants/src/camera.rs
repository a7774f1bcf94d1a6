/// Vertical field of view in degrees.
pub const FOV_DEGREES: f32 = 45.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;

/// Where the camera sits when a viewer opens.
pub const START_POSITION: [f32; 3] = [4.0, 3.0, 4.0];

pub const MIN_DISTANCE: f32 = 1.0;
pub const MAX_DISTANCE: f32 = 20.0;

/// Fraction of the pending rotation applied per frame; the remainder decays by the same factor.
pub const DAMPING_FACTOR: f32 = 0.05;

/// One full orbit every thirty seconds.
pub const AUTO_ROTATE_SPEED: f32 = std::f32::consts::TAU / 30.0;

pub const ROTATE_SENSITIVITY: f32 = 0.01;
pub const LINE_ZOOM_STEP: f32 = 0.95;
pub const PIXEL_ZOOM_SCALE: f32 = 0.05;

/// Keeps the orbit away from the poles so the up vector never flips.
pub const PITCH_LIMIT: f32 = 1.55;
