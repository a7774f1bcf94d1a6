//! Scene contents of an open viewer.
//!
//! Provides the stage (camera, lights, grid, model group), the procedural
//! placeholder and the fit applied to loaded models.

/// Procedural wireframe airframe used when no real model is available.
pub mod airframe;

/// Flat line grid below the model for spatial reference.
pub mod grid;

/// Ambient, key, fill and back lighting.
pub mod lighting;

/// Bounds measurement and the recenter-and-rescale fit for loaded models.
pub mod normalizer;

/// Stage setup and teardown around one open viewer.
pub mod stage;
