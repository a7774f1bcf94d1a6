/// Conventional public directory tried by the compatibility search.
pub const PUBLIC_DIR: &str = "public";

/// Catalog file shipped in the assets folder.
pub const DEFAULT_CATALOG_PATH: &str = "catalog.json";

/// Environment variable naming an optional viewer configuration file.
pub const CONFIG_ENV_VAR: &str = "MODEL_VIEWER_CONFIG";
