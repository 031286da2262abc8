use thiserror::Error;

/// Failures of the host-side I/O around the editor: layouts, tile sheets
/// and the settings file. The editing core itself never fails.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid layout: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    SettingsParse(#[from] toml::de::Error),
    #[error("invalid settings: {0}")]
    SettingsJson(serde_json::Error),
    #[error("could not write settings: {0}")]
    SettingsWrite(#[from] toml::ser::Error),
    #[error("could not decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("layout has no cells")]
    EmptyLayout,
    #[error("load a tile sheet before loading a layout")]
    NoTileSheet,
}
