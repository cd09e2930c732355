// Privacy Sentinel Settings Engine
// Reads user settings (settings.json) and engine tunables (engine.json) from the
// configuration directory. The engine never writes either file; the user
// settings store is owned by the host and changes arrive as events.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::{EngineConfig, Settings};

pub const SETTINGS_FILE: &str = "settings.json";
pub const ENGINE_FILE: &str = "engine.json";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&self) -> Result<Settings, SettingsError>;
    fn load_engine_config(&self) -> Result<EngineConfig, SettingsError>;
    fn get_config_dir(&self) -> &Path;
}

/// Settings engine reading JSON files from one directory.
pub struct SettingsEngine {
    config_dir: PathBuf,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `dir_override` is `Some`, reads from that directory; otherwise from
    /// the platform configuration directory (which honors `SENTINEL_CONFIG_DIR`).
    pub fn new(dir_override: Option<PathBuf>) -> Self {
        Self {
            config_dir: dir_override.unwrap_or_else(platform::get_config_dir),
        }
    }

    /// Reads `name` from the config directory; a missing file yields `T::default()`.
    fn read_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, SettingsError> {
        let path = self.config_dir.join(name);
        if !path.exists() {
            debug!("{} not found, using defaults", path.display());
            return Ok(T::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            SettingsError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads user settings. Missing fields fall back to their defaults.
    fn load(&self) -> Result<Settings, SettingsError> {
        self.read_or_default(SETTINGS_FILE)
    }

    fn load_engine_config(&self) -> Result<EngineConfig, SettingsError> {
        self.read_or_default(ENGINE_FILE)
    }

    fn get_config_dir(&self) -> &Path {
        &self.config_dir
    }
}
