//! Core application setup and state management.
//!
//! Handles the viewer lifecycle, runtime configuration, window setup and
//! plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with asset loading, the viewer, host RPC and
/// platform-specific input.
pub mod app_setup;

/// Viewer loop state and its transitions.
pub mod app_state;

/// Runtime settings read once at startup.
pub mod config;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
