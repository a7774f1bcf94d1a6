use bevy::prelude::*;

use crate::engine::loading::resolver::ViewerState;
use crate::engine::viewer::session::ViewerStatus;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::scene::stage::ViewerScoped;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::viewer::session::ViewerSession;

pub const FALLBACK_BANNER: &str = "[SIMULATION MODE - ASSET MISSING]";
pub const LOADING_BANNER: &str = "LOADING ASSET DATA...";
pub const OVERRIDE_BANNER: &str = "LOCAL FILE LOADED";
pub const CONTROLS_HELP: &str = "CONTROLS: CLICK & DRAG TO ROTATE • SCROLL TO ZOOM";

#[derive(Component)]
pub struct StatusText;

/// Overlay text for one status snapshot, top to bottom.
pub fn overlay_lines(status: &ViewerStatus) -> Vec<String> {
    let mut lines = vec![status.display_name.clone()];
    if status.using_fallback {
        lines.push(FALLBACK_BANNER.to_string());
    }
    if status.state == ViewerState::Resolving {
        lines.push(LOADING_BANNER.to_string());
    }
    if !status.trace.is_empty() {
        lines.push(format!("DEBUG: {}", status.trace));
    }
    if !status.error.is_empty() {
        lines.push(format!("⚠ {}", status.error));
    }
    if status.local_override_active {
        lines.push(OVERRIDE_BANNER.to_string());
    }
    lines.push(CONTROLS_HELP.to_string());
    lines
}

#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_status_overlay(commands: &mut Commands) {
    commands
        .spawn((
            Name::new("status_overlay"),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            ViewerScoped,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.0, 0.9, 1.0)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                StatusText,
            ));
        });
}

#[cfg(not(target_arch = "wasm32"))]
pub fn status_text_update_system(
    session: Res<ViewerSession>,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    let content = overlay_lines(&session.status()).join("\n");
    for mut text in &mut query {
        if text.0 != content {
            text.0 = content.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::loading::resolver::RenderSource;

    #[test]
    fn fallback_with_failed_override_shows_every_banner() {
        let status = ViewerStatus {
            state: ViewerState::Rendering(RenderSource::Fallback),
            using_fallback: true,
            trace: "Local file failed; showing procedural model".into(),
            error: "Local file failed to load (x.glb): bad".into(),
            display_name: "Scout".into(),
            local_override_active: true,
        };

        let lines = overlay_lines(&status);

        assert_eq!(
            lines,
            vec![
                "Scout".to_string(),
                FALLBACK_BANNER.to_string(),
                "DEBUG: Local file failed; showing procedural model".to_string(),
                "⚠ Local file failed to load (x.glb): bad".to_string(),
                OVERRIDE_BANNER.to_string(),
                CONTROLS_HELP.to_string(),
            ]
        );
    }

    #[test]
    fn resolving_shows_the_loading_banner_only() {
        let status = ViewerStatus {
            state: ViewerState::Resolving,
            trace: "Attempting path: a.glb".into(),
            display_name: "Hauler".into(),
            ..Default::default()
        };

        let lines = overlay_lines(&status);

        assert!(lines.contains(&LOADING_BANNER.to_string()));
        assert!(!lines.contains(&FALLBACK_BANNER.to_string()));
        assert!(!lines.iter().any(|line| line.starts_with('⚠')));
    }
}
