//! Editor tunables, persisted as JSON.

use crate::handles::BASE_HANDLE_SIZE;
use crate::shapes::{Brush, PolylineStyle};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Interaction constants and canvas geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Handle side length before adding the shape's stroke width.
    pub handle_size: f64,
    /// Stroke width for new polylines.
    pub default_line_width: f64,
    /// A drawn line is discarded when `w² + h²` of its bounds is at most this.
    pub line_discard_extent_sq: f64,
    /// A drawn quad is discarded when `w + h` of its bounds is at most this.
    pub rect_discard_extent: f64,
    /// Half-size of the square probed around a double click for vertex insertion.
    pub insert_margin: f64,
    /// Canvas pixels that must stay visible inside the workspace while panning.
    pub pan_margin: f64,
    pub canvas_size: Size,
    /// Window area the canvas is panned within.
    pub workspace_size: Size,
    pub default_brush: Brush,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            handle_size: BASE_HANDLE_SIZE,
            default_line_width: PolylineStyle::MIN_WIDTH,
            line_discard_extent_sq: 4.0,
            rect_discard_extent: 4.0,
            insert_margin: 2.0,
            pan_margin: 100.0,
            canvas_size: Size::new(800.0, 600.0),
            workspace_size: Size::new(1024.0, 768.0),
            default_brush: Brush::default(),
        }
    }
}

impl EditorSettings {
    /// `<config dir>/vectorpad/settings.json`, if a config dir exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("vectorpad").join("settings.json"))
    }

    pub fn load(path: &Path) -> SettingsResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content).map_err(|e| {
            SettingsError::Parse(format!("Invalid settings {}: {}", path.display(), e))
        })
    }

    /// Load from `path`, falling back to defaults when the file is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::debug!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> SettingsResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SettingsError::Parse(e.to_string()))?;
        fs::write(path, json)
            .map_err(|e| SettingsError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeColor;

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = EditorSettings {
            pan_margin: 50.0,
            default_brush: Brush::solid(ShapeColor::new(1, 2, 3, 255)),
            ..EditorSettings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(EditorSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "insert_margin": 5.0 }"#).unwrap();

        let settings = EditorSettings::load(&path).unwrap();
        assert_eq!(settings.insert_margin, 5.0);
        assert_eq!(settings.handle_size, BASE_HANDLE_SIZE);
        assert_eq!(settings.pan_margin, 100.0);
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(EditorSettings::load(&path), Err(SettingsError::Parse(_))));
        assert!(matches!(
            EditorSettings::load(&dir.path().join("missing.json")),
            Err(SettingsError::Io(_))
        ));
        assert_eq!(EditorSettings::load_or_default(&path), EditorSettings::default());
    }
}
