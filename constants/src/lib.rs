//! Tuned values shared across the viewer workspace.
//!
//! Kept in a standalone crate so render settings, camera limits and the
//! placeholder airframe dimensions have a single source of truth.

/// Placeholder airframe dimensions and placements in model units.
pub mod airframe;

/// Orbit camera framing, damping and zoom limits.
pub mod camera;

/// Candidate path conventions for locating model files.
pub mod path;

/// Scene dressing: normalization target, grid, lighting and animation rates.
pub mod render_settings;
