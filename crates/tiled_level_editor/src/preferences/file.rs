//! Preferences file save/load operations

use super::EditSessionConfig;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(serde_json::Error),
    #[error("Serialize error: {0}")]
    Serialize(serde_json::Error),
    #[error("Could not determine config directory")]
    NoConfigDir,
}

impl EditSessionConfig {
    /// Get the config directory path for the editor
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "tiled_level", "tiled_level_editor")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the preferences file path
    pub fn preferences_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(PREFERENCES_FILE))
    }

    /// Load preferences from the config directory, returning defaults on any failure
    pub fn load() -> Self {
        let loaded = Self::preferences_path()
            .ok_or(PreferencesError::NoConfigDir)
            .and_then(|path| Self::load_from_path(&path));
        match loaded {
            Ok(config) => config,
            Err(e) => {
                warn!("Could not load preferences: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Load preferences from `path`; a missing file yields defaults
    pub fn load_from_path(path: &Path) -> Result<Self, PreferencesError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: EditSessionConfig =
            serde_json::from_str(&content).map_err(PreferencesError::Parse)?;
        Ok(config.sanitized())
    }

    /// Save preferences to the config directory
    pub fn save(&self) -> Result<(), PreferencesError> {
        let path = Self::preferences_path().ok_or(PreferencesError::NoConfigDir)?;
        self.save_to_path(&path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), PreferencesError> {
        // Create config directory if it doesn't exist
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(PreferencesError::Serialize)?;
        std::fs::write(path, content)?;

        info!("Saved preferences to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiled_level_core::{EraserTarget, IVec3, PlacedType};

    #[test]
    fn test_preferences_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(PREFERENCES_FILE);

        let mut config = EditSessionConfig::default();
        config.eraser_target = EraserTarget::Only(PlacedType::Wall);
        config.eraser_extent = IVec3::new(3, 1, 2);
        config.multi_mode = true;
        config.fill.gap_coefficient = 0.25;
        config.save_to_path(&path).unwrap();

        let loaded = EditSessionConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_out_of_range_eraser_extent_loads_as_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        let config = EditSessionConfig {
            eraser_extent: IVec3::new(40, 1, 1),
            ..Default::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = EditSessionConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.eraser_extent, IVec3::ONE);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = EditSessionConfig::load_from_path(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, EditSessionConfig::default());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            EditSessionConfig::load_from_path(&path),
            Err(PreferencesError::Parse(_))
        ));
    }
}
