//! Persisted user preferences: the directory of the last opened file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub last_dir: Option<PathBuf>,
}

/// JSON settings file at a fixed location.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// `<config dir>/petabvis/settings.json`, if the platform has a config dir.
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::at(dir.join("petabvis").join("settings.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file reads as defaults.
    pub fn load(&self) -> AppResult<Settings> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
            Err(e) => Err(AppError::SettingsIo {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    pub fn save(&self, settings: &Settings) -> AppResult<()> {
        let content = serde_json::to_string_pretty(settings)?;
        let write = |path: &Path| -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)
        };
        write(&self.path).map_err(|e| AppError::SettingsIo {
            path: self.path.clone(),
            source: e,
        })?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    /// Where file dialogs start: the remembered directory if it still
    /// exists, else the home directory.
    pub fn start_dir(&self) -> Option<PathBuf> {
        self.load()
            .ok()
            .and_then(|s| s.last_dir)
            .filter(|dir| dir.is_dir())
            .or_else(dirs::home_dir)
    }

    /// Remembers the parent directory of an opened file.
    pub fn remember_dir_of(&self, file: &Path) -> AppResult<()> {
        let Some(dir) = file.parent().filter(|d| !d.as_os_str().is_empty()) else {
            return Ok(());
        };
        let mut settings = self.load().unwrap_or_default();
        settings.last_dir = Some(dir.to_path_buf());
        self.save(&settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(name: &str) -> SettingsStore {
        let dir = std::env::temp_dir().join("pv_settings_test").join(name);
        let _ = std::fs::remove_dir_all(&dir);
        SettingsStore::at(dir.join("settings.json"))
    }

    #[test]
    fn missing_file_is_default() {
        let store = store("missing");
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn remembers_parent_dir() {
        let store = store("remember");
        let file = std::env::temp_dir().join("pv_settings_test").join("data.yaml");
        store.remember_dir_of(&file).unwrap();

        let settings = store.load().unwrap();
        assert_eq!(
            settings.last_dir.as_deref(),
            Some(std::env::temp_dir().join("pv_settings_test").as_path())
        );
        assert_eq!(
            store.start_dir(),
            Some(std::env::temp_dir().join("pv_settings_test"))
        );
    }
}
