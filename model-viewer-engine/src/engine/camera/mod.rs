//! Orbit camera for inspecting the displayed model.
//!
//! Damped drag rotation, clamped wheel zoom and optional auto-rotation
//! around the origin.

/// Orbit camera resource, spawning and the per-frame controller.
pub mod orbit_camera;
