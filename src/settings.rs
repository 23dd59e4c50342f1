//! User settings stored as RON in the platform config directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "twin-loupe";
const SETTINGS_FILE: &str = "settings.ron";

/// Errors that can occur when reading or writing the settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::de::SpannedError,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
}

/// Bounds, increment and starting point of the shared zoom level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSettings {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub initial: f32,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 3.0,
            step: 0.1,
            initial: 1.0,
        }
    }
}

/// Geometry of the per-pane magnifier overlay, in logical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnifierSettings {
    /// Size of the frame showing the magnified crop.
    pub zoom_viewport_size: [f32; 2],
    /// Size of the indicator drawn around the cursor.
    pub region_size: [f32; 2],
    /// Distance between the indicator and the zoom frame.
    pub viewport_gap: f32,
}

impl Default for MagnifierSettings {
    fn default() -> Self {
        Self {
            zoom_viewport_size: [150.0, 150.0],
            region_size: [20.0, 20.0],
            viewport_gap: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub zoom: ZoomSettings,
    pub magnifier: MagnifierSettings,
    /// Number of image panes opened at startup.
    pub panes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            zoom: ZoomSettings::default(),
            magnifier: MagnifierSettings::default(),
            panes: 2,
        }
    }
}

impl Settings {
    /// `<config dir>/twin-loupe/settings.ron`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Loads settings from the default location, falling back to defaults
    /// when the file does not exist yet.
    pub fn load() -> Result<Self, SettingsError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), SettingsError> {
        let io_error = |source: std::io::Error| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, content).map_err(io_error)
    }
}
