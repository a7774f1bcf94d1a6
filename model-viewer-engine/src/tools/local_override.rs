use std::path::Path;

use bevy::prelude::*;
use bevy::window::FileDragAndDrop;

use crate::engine::viewer::events::ViewerCommand;

/// Only glTF containers are worth handing to the loader.
pub fn is_model_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            extension.eq_ignore_ascii_case("glb") || extension.eq_ignore_ascii_case("gltf")
        })
}

/// Asset paths read `#` as the start of a label, so such files cannot be addressed.
pub fn is_addressable(path: &Path) -> bool {
    !path.to_string_lossy().contains('#')
}

/// Turn a file dropped onto the window into a local override.
pub fn handle_dropped_files(
    mut drops: EventReader<FileDragAndDrop>,
    mut viewer_commands: EventWriter<ViewerCommand>,
) {
    for drop in drops.read() {
        let FileDragAndDrop::DroppedFile { path_buf, .. } = drop else {
            continue;
        };
        if !is_model_file(path_buf) {
            warn!("Ignoring dropped file {}: not a glTF model", path_buf.display());
            continue;
        }
        if !is_addressable(path_buf) {
            warn!(
                "Ignoring dropped file {}: '#' is not allowed in model paths",
                path_buf.display()
            );
            continue;
        }
        info!("Local file dropped: {}", path_buf.display());
        viewer_commands.write(ViewerCommand::SetLocalOverride {
            path: path_buf.to_string_lossy().into_owned(),
        });
    }
}
