use bevy::prelude::*;
use constants::render_settings::*;

use super::stage::ViewerScoped;

pub fn viewer_ambient_light() -> AmbientLight {
    AmbientLight {
        color: AMBIENT_COLOUR,
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    }
}

/// Key light, an overhead fill standing in for sky light, and a tinted back light.
pub fn spawn_lighting(commands: &mut Commands) {
    commands.insert_resource(viewer_ambient_light());

    let lights = [
        ("key_light", KEY_LIGHT_POSITION, Color::WHITE, KEY_LIGHT_ILLUMINANCE),
        ("fill_light", FILL_LIGHT_POSITION, Color::WHITE, FILL_LIGHT_ILLUMINANCE),
        ("back_light", BACK_LIGHT_POSITION, BACK_LIGHT_COLOUR, BACK_LIGHT_ILLUMINANCE),
    ];
    for (name, position, color, illuminance) in lights {
        let position = Vec3::from_array(position);
        // The fill shines straight down, so it needs an explicit up vector.
        let up = if position.x == 0.0 && position.z == 0.0 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        commands.spawn((
            Name::new(name),
            DirectionalLight {
                color,
                illuminance,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_translation(position).looking_at(Vec3::ZERO, up),
            ViewerScoped,
        ));
    }
}
