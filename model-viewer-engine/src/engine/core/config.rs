use std::path::{Path, PathBuf};

use bevy::prelude::*;
use constants::path::DEFAULT_CATALOG_PATH;
use constants::render_settings::NORMALIZATION_FRAME_BUDGET;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::loading::candidates::CandidatePolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read viewer config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse viewer config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime settings for the viewer, read once at startup.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Directory model references are resolved against. When unset the
    /// conventional deployment layouts are searched instead.
    pub asset_base_dir: Option<String>,
    pub catalog_path: String,
    /// Open the first catalog entry as soon as the catalog is available.
    pub auto_open_first: bool,
    pub auto_rotate: bool,
    pub normalization_frame_budget: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            asset_base_dir: None,
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
            auto_open_first: true,
            auto_rotate: true,
            normalization_frame_budget: NORMALIZATION_FRAME_BUDGET,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Config named by the environment, or defaults when none is set.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(constants::path::CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::default())
    }

    pub fn candidate_policy(&self) -> CandidatePolicy {
        CandidatePolicy::with_base_dir(self.asset_base_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = ViewerConfig::from_json(r#"{ "asset_base_dir": "models" }"#).unwrap();

        assert_eq!(config.asset_base_dir.as_deref(), Some("models"));
        assert_eq!(config.catalog_path, DEFAULT_CATALOG_PATH);
        assert!(config.auto_rotate);
        assert_eq!(config.candidate_policy().base_dir(), Some("models"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            ViewerConfig::from_json("{ auto_rotate: yes }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let error = ViewerConfig::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(error, ConfigError::Read { .. }));
        assert!(error.to_string().contains("not/here.json"));
    }
}
