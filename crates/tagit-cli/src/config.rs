//! Persistent CLI configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.json";
const APP_DIR_NAME: &str = "tagit";

pub const DATA_DIR_ENV: &str = "TAGIT_DATA_DIR";
pub const ROOT_ENV: &str = "TAGIT_ROOT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub default_root: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            data_dir: None,
            default_root: None,
        }
    }
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

/// Drop unset or blank paths.
pub fn normalize_path_option(value: Option<PathBuf>) -> Option<PathBuf> {
    value.filter(|path| !path.as_os_str().to_string_lossy().trim().is_empty())
}

fn env_path(name: &str) -> Option<PathBuf> {
    normalize_path_option(std::env::var_os(name).map(PathBuf::from))
}

/// First candidate that is set: explicit flag, environment, config file.
pub fn pick_path(
    explicit: Option<PathBuf>,
    from_env: Option<PathBuf>,
    configured: Option<PathBuf>,
) -> Option<PathBuf> {
    normalize_path_option(explicit)
        .or_else(|| normalize_path_option(from_env))
        .or_else(|| normalize_path_option(configured))
}

impl CliConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Data directory from `--data-dir`, `TAGIT_DATA_DIR`, the config file,
    /// or the platform data directory.
    pub fn resolve_data_dir(&self, explicit: Option<PathBuf>) -> Result<PathBuf, String> {
        if let Some(path) = pick_path(explicit, env_path(DATA_DIR_ENV), self.data_dir.clone()) {
            return Ok(path);
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| "Failed to resolve data directory; pass --data-dir".to_string())
    }

    /// Root from `--root`, `TAGIT_ROOT`, the config file, or the current
    /// directory.
    pub fn resolve_root(&self, explicit: Option<PathBuf>) -> Result<PathBuf, String> {
        if let Some(path) = pick_path(explicit, env_path(ROOT_ENV), self.default_root.clone()) {
            return Ok(path);
        }
        std::env::current_dir()
            .map_err(|error| format!("Failed to resolve current directory: {error}"))
    }

    fn normalize(&mut self) {
        self.data_dir = normalize_path_option(self.data_dir.take());
        self.default_root = normalize_path_option(self.default_root.take());
    }
}
