use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Light,
    Dark,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Light => DisplayMode::Dark,
            DisplayMode::Dark => DisplayMode::Light,
        }
    }

    /// Visibility of the (light, dark) header icons. Exactly one is shown.
    pub fn icons(self) -> (bool, bool) {
        (self == DisplayMode::Light, self == DisplayMode::Dark)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DarkModeSetting {
    Enabled,
    Disabled,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPreferences {
    dark_mode: DarkModeSetting,
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("no config directory available on this platform")]
    NoConfigDir,
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not encode preferences: {0}")]
    Json(#[from] serde_json::Error),
}

/// The dark/light preference together with the file it is persisted in.
#[derive(Debug)]
pub struct Preferences {
    pub mode: DisplayMode,
    path: Option<PathBuf>,
}

impl Preferences {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("movie-catalog-tui").join("preferences.json"))
    }

    /// Reads the stored mode, falling back to light when nothing usable is stored.
    pub fn load(path: Option<PathBuf>) -> Self {
        let mode = path
            .as_deref()
            .and_then(read_mode)
            .unwrap_or_default();

        Self { mode, path }
    }

    /// Flips the mode and writes it out. The in-memory mode flips even when
    /// the write fails.
    pub fn toggle(&mut self) -> Result<DisplayMode, PreferenceError> {
        self.mode = self.mode.toggled();
        self.save()?;
        Ok(self.mode)
    }

    fn save(&self) -> Result<(), PreferenceError> {
        let path = self.path.as_ref().ok_or(PreferenceError::NoConfigDir)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| PreferenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let stored = StoredPreferences {
            dark_mode: match self.mode {
                DisplayMode::Dark => DarkModeSetting::Enabled,
                DisplayMode::Light => DarkModeSetting::Disabled,
            },
        };
        let json = serde_json::to_string_pretty(&stored)?;

        fs::write(path, json).map_err(|source| PreferenceError::Io {
            path: path.clone(),
            source,
        })
    }
}

fn read_mode(path: &Path) -> Option<DisplayMode> {
    let contents = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<StoredPreferences>(&contents) {
        Ok(stored) => Some(match stored.dark_mode {
            DarkModeSetting::Enabled => DisplayMode::Dark,
            DarkModeSetting::Disabled => DisplayMode::Light,
        }),
        Err(e) => {
            tracing::warn!("ignoring unreadable preferences at {}: {}", path.display(), e);
            None
        }
    }
}
