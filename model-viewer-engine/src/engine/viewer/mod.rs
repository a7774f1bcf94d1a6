//! Viewer session: what is open, what is shown, and how host commands change it.

/// Host-facing commands, applied in arrival order.
pub mod events;

/// Command handling against the session and the viewer loop state.
pub mod commands;

/// Swapping the displayed model once resolution settles.
pub mod install;

/// The per-viewer session resource and its status snapshot.
pub mod session;

use bevy::prelude::*;

use crate::engine::camera::orbit_camera::orbit_camera_controller;
use crate::engine::core::app_state::ViewerLoop;
use crate::engine::core::config::ViewerConfig;
use crate::engine::loading::driver::drive_model_resolution;
use crate::engine::scene::normalizer::normalize_loaded_models;
use crate::engine::scene::stage::{spawn_viewer_stage, teardown_viewer_stage};
use crate::engine::systems::animation::{hover_model_group, spin_rotors, tag_authored_rotors};
use commands::handle_viewer_commands;
use events::ViewerCommand;
use install::install_pending_model;
use session::ViewerSession;

/// Viewer lifecycle, resolution and display.
///
/// Expects asset, scene, transform and input plugins to be present; the
/// wireframe overlay only draws when `WireframePlugin` is added too. Reads
/// [`ViewerConfig`] if inserted beforehand, otherwise uses defaults.
pub struct ViewerPlugin;

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<ViewerConfig>() {
            app.insert_resource(ViewerConfig::default());
        }
        let policy = app.world().resource::<ViewerConfig>().candidate_policy();

        app.init_state::<ViewerLoop>()
            .add_event::<ViewerCommand>()
            .insert_resource(ViewerSession::new(policy))
            .add_systems(OnEnter(ViewerLoop::Running), spawn_viewer_stage)
            .add_systems(OnExit(ViewerLoop::Running), teardown_viewer_stage)
            .add_systems(Update, handle_viewer_commands)
            .add_systems(
                Update,
                (
                    drive_model_resolution,
                    install_pending_model,
                    tag_authored_rotors,
                    normalize_loaded_models,
                )
                    .chain()
                    .after(handle_viewer_commands)
                    .run_if(in_state(ViewerLoop::Running)),
            )
            .add_systems(
                Update,
                (orbit_camera_controller, spin_rotors, hover_model_group)
                    .run_if(in_state(ViewerLoop::Running)),
            );

        #[cfg(not(target_arch = "wasm32"))]
        {
            app.add_systems(
                Update,
                crate::engine::systems::status_overlay::status_text_update_system
                    .after(install_pending_model)
                    .run_if(in_state(ViewerLoop::Running)),
            );
        }
    }
}
