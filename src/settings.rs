//! Engine and driver settings
//!
//! Persisted as JSON next to the save files; every field has a default so a
//! partial file is fine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MAX_TICKS, MAX_NESTING_DEPTH};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Grid updates allowed per run before it is aborted
    pub max_ticks: u64,
    /// Deepest nested grid the loader accepts
    pub max_nesting_depth: usize,
    /// Use terminal colors when printing grids
    pub color_output: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_ticks: DEFAULT_MAX_TICKS,
            max_nesting_depth: MAX_NESTING_DEPTH,
            color_output: true,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Using default settings, cannot read {}: {err}", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Using default settings, {} is malformed: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("tumble-sim-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"max_ticks": 12}"#).unwrap();
        assert_eq!(settings.max_ticks, 12);
        assert_eq!(settings.max_nesting_depth, MAX_NESTING_DEPTH);
        assert!(settings.color_output);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("settings.json");
        let settings = Settings {
            max_ticks: 77,
            max_nesting_depth: 4,
            color_output: false,
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_or_bad_file_falls_back() {
        assert_eq!(Settings::load(&temp_path("absent.json")), Settings::default());

        let path = temp_path("bad.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        let _ = fs::remove_file(&path);
    }
}
