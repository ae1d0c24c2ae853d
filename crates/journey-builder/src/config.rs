//! Application configuration, stored as JSON under the platform config
//! directory or at the path named by `JOURNEY_BUILDER_CONFIG`.

use crate::layout_settings::LayoutSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "JOURNEY_BUILDER_CONFIG";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found")]
    NotFound,
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the journey library. Platform data dir when unset.
    pub data_dir: Option<PathBuf>,
    /// Slot (file stem) the library is stored under.
    pub storage_slot: String,
    pub layout: LayoutSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_slot: journey::storage::DEFAULT_SLOT.to_string(),
            layout: LayoutSettings::default(),
        }
    }
}

pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound);
        }
        Err(err) => return Err(ConfigError::Io(err)),
    };
    Ok(serde_json::from_str(&json)?)
}

pub fn save_to_path(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(config)?)?;
    Ok(())
}

/// Missing file means defaults; an unreadable one is logged and also
/// falls back to defaults.
pub fn load_or_default(path: &Path) -> AppConfig {
    match load_from_path(path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "loaded config");
            config
        }
        Err(ConfigError::NotFound) => AppConfig::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
            AppConfig::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn project_dirs() -> Result<directories::ProjectDirs, ConfigError> {
    directories::ProjectDirs::from("dev", "journey", "JourneyBuilder")
        .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))
}

/// Path of the config file: the env override, else the platform default.
#[cfg(not(target_arch = "wasm32"))]
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load() -> AppConfig {
    match config_path() {
        Ok(path) => load_or_default(&path),
        Err(e) => {
            tracing::warn!(error = %e, "using default config");
            AppConfig::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AppConfig {
    /// Directory the journey library lives in.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(load_from_path(&path), Err(ConfigError::NotFound)));
        assert_eq!(load_or_default(&path), AppConfig::default());
    }

    #[test]
    fn test_unreadable_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "not json").unwrap();
        assert!(matches!(load_from_path(&path), Err(ConfigError::Serde(_))));
        assert_eq!(load_or_default(&path), AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let mut config = AppConfig {
            data_dir: Some(dir.path().to_path_buf()),
            storage_slot: "drafts".to_string(),
            ..AppConfig::default()
        };
        config.layout.visuals.node_radius = 20.0;

        save_to_path(&config, &path).unwrap();
        assert_eq!(load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_config() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "storage_slot": "alt" }"#).unwrap();
        assert_eq!(config.storage_slot, "alt");
        assert_eq!(config.data_dir, None);
        assert_eq!(config.layout, LayoutSettings::default());
    }
}
