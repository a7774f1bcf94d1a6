use bevy::asset::LoadState;
use bevy::prelude::*;

use super::product_catalog::{ProductCatalog, ProductEntry};
use crate::engine::core::config::ViewerConfig;
use crate::engine::viewer::events::ViewerCommand;

#[derive(Resource, Default)]
pub struct CatalogLoader {
    handle: Option<Handle<ProductCatalog>>,
    settled: bool,
}

pub fn start_catalog_loading(
    mut catalog_loader: ResMut<CatalogLoader>,
    asset_server: Res<AssetServer>,
    config: Res<ViewerConfig>,
) {
    info!("Loading product catalog from: {}", config.catalog_path);
    catalog_loader.handle = Some(asset_server.load(config.catalog_path.clone()));
}

/// Publish the catalog once it loads and open its first entry if configured to.
pub fn load_catalog_system(
    mut commands: Commands,
    mut catalog_loader: ResMut<CatalogLoader>,
    asset_server: Res<AssetServer>,
    catalogs: Res<Assets<ProductCatalog>>,
    config: Res<ViewerConfig>,
    mut viewer_commands: EventWriter<ViewerCommand>,
) {
    if catalog_loader.settled {
        return;
    }
    let Some(handle) = catalog_loader.handle.clone() else {
        return;
    };

    if let LoadState::Failed(error) = asset_server.load_state(&handle) {
        error!("Product catalog failed to load: {}", error);
        error!("Viewer can still be opened over RPC");
        catalog_loader.settled = true;
        return;
    }

    let Some(catalog) = catalogs.get(&handle) else {
        return;
    };
    info!("✓ Product catalog loaded ({} products)", catalog.products.len());
    catalog_loader.settled = true;

    if config.auto_open_first {
        if let Some(first) = catalog.products.first() {
            viewer_commands.write(open_command(first));
        }
    }
    commands.insert_resource(catalog.clone());
}

pub fn open_command(entry: &ProductEntry) -> ViewerCommand {
    ViewerCommand::Open {
        display_name: entry.model.clone(),
        reference: entry.model_url.clone(),
    }
}

/// Number keys open catalog entries, Escape closes, Backspace drops the local file.
pub fn catalog_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    catalog: Option<Res<ProductCatalog>>,
    mut viewer_commands: EventWriter<ViewerCommand>,
) {
    const DIGITS: [KeyCode; 9] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];

    if let Some(catalog) = catalog {
        for (index, key) in DIGITS.iter().enumerate() {
            if !keyboard.just_pressed(*key) {
                continue;
            }
            match catalog.by_shortcut(index + 1) {
                Some(entry) => {
                    viewer_commands.write(open_command(entry));
                }
                None => debug!("No catalog entry for key {}", index + 1),
            }
        }
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        viewer_commands.write(ViewerCommand::Close);
    }
    if keyboard.just_pressed(KeyCode::Backspace) {
        viewer_commands.write(ViewerCommand::ClearLocalOverride);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_without_url_opens_without_a_reference() {
        let entry = ProductEntry {
            id: "X-1".into(),
            model: "Prototype".into(),
            kind: "concept".into(),
            model_url: None,
        };

        assert_eq!(
            open_command(&entry),
            ViewerCommand::Open {
                display_name: "Prototype".into(),
                reference: None,
            }
        );
    }
}
