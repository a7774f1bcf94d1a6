use bevy::asset::{AssetMetaCheck, UnapprovedPathMode};
use bevy::pbr::wireframe::{WireframeConfig, WireframePlugin};
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::catalog::catalog_loader::{CatalogLoader, load_catalog_system, start_catalog_loading};
use crate::catalog::product_catalog::ProductCatalog;
use crate::engine::core::config::ViewerConfig;
use crate::engine::core::window_config::create_window_config;
use crate::engine::viewer::ViewerPlugin;
use crate::engine::viewer::commands::handle_viewer_commands;
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::catalog::catalog_loader::catalog_keyboard_shortcuts;
#[cfg(not(target_arch = "wasm32"))]
use crate::tools::local_override::handle_dropped_files;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(WireframePlugin::default())
        .insert_resource(WireframeConfig {
            global: false,
            default_color: Color::WHITE,
        })
        // Registers ProductCatalog as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<ProductCatalog>::new(&["catalog.json"]));

    // Logging is only up once the default plugins are in.
    let config = ViewerConfig::from_env().unwrap_or_else(|error| {
        warn!("{}; using default viewer config", error);
        ViewerConfig::default()
    });
    info!("Viewer config: {:?}", config);
    app.insert_resource(config);

    app.add_plugins(ViewerPlugin).add_plugins(WebRpcPlugin);

    app.init_resource::<CatalogLoader>()
        .add_systems(Startup, start_catalog_loading)
        .add_systems(
            Update,
            load_catalog_system.before(handle_viewer_commands),
        );

    // Keyboard shortcuts and file drops only exist on native; the host page drives WASM.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(
            Update,
            (catalog_keyboard_shortcuts, handle_dropped_files).before(handle_viewer_commands),
        );
    }

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    // Dropped files live outside the asset folder.
    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        unapproved_path_mode: UnapprovedPathMode::Allow,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
