/*!
 * Key-value settings storage
 *
 * The depot reads its tunable behavior (currently the upload priority) from
 * a settings store. The store is deliberately dumb: string keys to string
 * values, re-read from the backing file on every access so that external
 * edits take effect without a restart.
 */

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use log::debug;

use crate::error::{DatahopError, Result};

/// Settings key holding the configured upload priority
pub const UPLOAD_PRIORITY: &str = "UploadPriority";

/// Backend-agnostic access to persisted settings
pub trait SettingsStore {
    /// Get the stored value for `key`, `None` if the key was never set
    fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Persist `value` under `key`, replacing any previous value
    fn set_string(&self, key: &str, value: &str) -> Result<()>;
}

/// Settings store backed by a flat JSON object on disk
///
/// Stateless between calls: each read loads the file, each write rewrites
/// it. A missing file behaves as an empty store.
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    /// Open a store at an explicit location
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the store at the default per-user location
    /// (`<config-dir>/datahop/settings.json`)
    pub fn default_location() -> Self {
        let path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("datahop")
            .join("settings.json");
        Self::new(path)
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            DatahopError::invalid_configuration_caused_by(
                format!("failed to read settings file {}", self.path.display()),
                e,
            )
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            DatahopError::invalid_configuration_caused_by(
                format!("settings file {} is not valid JSON", self.path.display()),
                e,
            )
        })
    }

    fn save(&self, settings: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DatahopError::invalid_configuration_caused_by(
                    format!("failed to create settings directory {}", parent.display()),
                    e,
                )
            })?;
        }
        let contents = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, contents).map_err(|e| {
            DatahopError::invalid_configuration_caused_by(
                format!("failed to write settings file {}", self.path.display()),
                e,
            )
        })
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        let settings = self.load()?;
        let value = settings.get(key).cloned();
        debug!("Setting {} = {:?}", key, value);
        Ok(value)
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let mut settings = self.load()?;
        settings.insert(key.to_string(), value.to_string());
        self.save(&settings)
    }
}
