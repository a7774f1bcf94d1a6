use bevy::gltf::Gltf;
use bevy::prelude::*;

use super::events::ViewerCommand;
use super::session::ViewerSession;
use crate::engine::core::app_state::{ViewerLoop, restart_viewer_loop, transition_viewer_loop};
use crate::engine::loading::candidates::LocalOverride;
use crate::engine::loading::loader::GltfSceneLoader;

/// Apply queued viewer commands in the order they were sent.
pub fn handle_viewer_commands(
    mut commands_in: EventReader<ViewerCommand>,
    mut session: ResMut<ViewerSession>,
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    current: Res<State<ViewerLoop>>,
    mut next_state: ResMut<NextState<ViewerLoop>>,
) {
    let mut loader = GltfSceneLoader {
        asset_server: &asset_server,
        gltfs: &gltfs,
    };
    let was_running = *current.get() == ViewerLoop::Running;
    let mut running = was_running;
    let mut closed_open_viewer = false;
    let mut handled = false;

    for command in commands_in.read() {
        handled = true;
        match command {
            ViewerCommand::Open {
                display_name,
                reference,
            } => {
                info!(
                    "Opening viewer for {} ({})",
                    display_name,
                    reference.as_deref().unwrap_or("no model reference")
                );
                let next = session.open(display_name.clone(), reference.as_deref());
                session.apply(next, &mut loader);
                running = true;
            }
            ViewerCommand::Close => {
                if running {
                    info!("Closing viewer");
                    closed_open_viewer |= was_running;
                }
                session.close();
                running = false;
            }
            ViewerCommand::SetLocalOverride { path } => {
                if !running {
                    warn!("Ignoring local file {}: no viewer is open", path);
                    continue;
                }
                let Some(local) = LocalOverride::new(path.clone()) else {
                    warn!("Ignoring blank local file path");
                    continue;
                };
                info!("Using local file {}", local.as_str());
                let next = session.set_local_override(local);
                session.apply(next, &mut loader);
            }
            ViewerCommand::ClearLocalOverride => {
                if !running || session.local_override().is_none() {
                    continue;
                }
                info!("Clearing local file");
                let next = session.clear_local_override();
                session.apply(next, &mut loader);
            }
        }
    }

    if running && closed_open_viewer {
        restart_viewer_loop(&mut next_state);
    } else if handled {
        let target = if running {
            ViewerLoop::Running
        } else {
            ViewerLoop::Stopped
        };
        transition_viewer_loop(&current, &mut next_state, target);
    }
}
