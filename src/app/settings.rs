use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::model::Rgba;
use crate::view::{DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(super) struct AppSettings {
    pub tile_size: u32,
    pub canvas_cols: u32,
    pub canvas_rows: u32,
    pub canvas_color: Rgba,
    pub grid_color: Rgba,
    pub show_grid: bool,
    pub selection_width: u32,
    pub selection_height: u32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub zoom_sensitivity: f32,
    pub rotate_sensitivity: f32,
    pub picker_zoom: f32,
    pub layout_path: String,
    pub tilesheet_path: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            tile_size: 16,
            canvas_cols: 50,
            canvas_rows: 50,
            canvas_color: Rgba::opaque(0x36, 0x39, 0x3f),
            grid_color: Rgba::opaque(0x5d, 0x61, 0x68),
            show_grid: true,
            selection_width: 1,
            selection_height: 1,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            zoom_sensitivity: 0.001,
            rotate_sensitivity: 0.1,
            picker_zoom: 2.0,
            layout_path: "layout.json".to_string(),
            tilesheet_path: None,
        }
    }
}

/// `~/.config/tilesuyu.toml` when present, else `settings.toml` here.
pub(super) fn config_path() -> String {
    if let Some(home) = std::env::var_os("HOME") {
        let path = Path::new(&home).join(".config").join("tilesuyu.toml");
        if path.exists() {
            return path.display().to_string();
        }
    }
    "settings.toml".to_string()
}

/// Parse by extension first, then try the other format.
pub(super) fn load_settings(path: &str) -> Result<AppSettings, EditorError> {
    let s = std::fs::read_to_string(path)?;
    if path.ends_with(".toml") {
        match toml::from_str::<AppSettings>(&s) {
            Ok(settings) => Ok(settings),
            Err(e) => serde_json::from_str::<AppSettings>(&s).map_err(|_| e.into()),
        }
    } else {
        match serde_json::from_str::<AppSettings>(&s) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                toml::from_str::<AppSettings>(&s).map_err(|_| EditorError::SettingsJson(e))
            }
        }
    }
}

/// Missing file means defaults; a broken one is logged and replaced by defaults.
pub(super) fn load_or_default(path: &str) -> AppSettings {
    if !Path::new(path).exists() {
        log::info!("no settings at {path}, using defaults");
        return AppSettings::default();
    }
    match load_settings(path) {
        Ok(settings) => {
            log::info!("loaded settings from {path}");
            settings
        }
        Err(e) => {
            log::warn!("ignoring settings at {path}: {e}");
            AppSettings::default()
        }
    }
}

pub(super) fn save_settings(path: &str, settings: &AppSettings) -> Result<(), EditorError> {
    let text = if path.ends_with(".toml") {
        toml::to_string_pretty(settings)?
    } else {
        serde_json::to_string_pretty(settings).map_err(EditorError::SettingsJson)?
    };
    std::fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("tilesuyu-{}-{name}", std::process::id()))
            .display()
            .to_string()
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_keys() {
        let settings: AppSettings = toml::from_str(
            r##"
tile_size = 32
canvas_color = "#101010"
tilesheet_path = "sheet.png"
"##,
        )
        .unwrap();
        assert_eq!(settings.tile_size, 32);
        assert_eq!(settings.canvas_color, Rgba::opaque(0x10, 0x10, 0x10));
        assert_eq!(settings.tilesheet_path.as_deref(), Some("sheet.png"));
        assert_eq!(settings.canvas_cols, 50);
        assert_eq!(settings.grid_color, Rgba::opaque(0x5d, 0x61, 0x68));
    }

    #[test]
    fn bad_colour_is_an_error() {
        assert!(toml::from_str::<AppSettings>(r#"grid_color = "grey""#).is_err());
    }

    #[test]
    fn save_then_load_toml() {
        let path = temp_path("settings.toml");
        let settings = AppSettings {
            canvas_rows: 12,
            show_grid: false,
            layout_path: "level-1.json".to_string(),
            ..AppSettings::default()
        };
        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path).unwrap(), settings);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn toml_file_may_hold_json() {
        let path = temp_path("json-in.toml");
        std::fs::write(&path, r#"{"tile_size": 8, "selection_width": 3}"#).unwrap();
        let settings = load_settings(&path).unwrap();
        assert_eq!((settings.tile_size, settings.selection_width), (8, 3));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_or_broken_files_fall_back_to_defaults() {
        assert_eq!(load_or_default(&temp_path("absent.toml")), AppSettings::default());
        let path = temp_path("broken.toml");
        std::fs::write(&path, "tile_size = [").unwrap();
        assert!(matches!(
            load_settings(&path),
            Err(EditorError::SettingsParse(_))
        ));
        assert_eq!(load_or_default(&path), AppSettings::default());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn broken_json_settings_are_reported_as_settings() {
        let path = temp_path("broken.json");
        std::fs::write(&path, "{\"tile_size\": [").unwrap();
        let err = load_settings(&path).unwrap_err();
        assert!(matches!(err, EditorError::SettingsJson(_)));
        assert!(err.to_string().starts_with("invalid settings"));
        std::fs::remove_file(&path).unwrap();
    }
}
