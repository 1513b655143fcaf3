//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// How to locate and launch Blender.
    #[serde(default)]
    pub blender: BlenderConfig,

    /// Defaults seeded into every new playblast job.
    #[serde(default)]
    pub playblast: PlayblastDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Blender executable settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlenderConfig {
    /// Explicit path to the Blender executable. `None` resolves `blender` on `PATH`.
    pub executable: Option<PathBuf>,

    /// Extra arguments passed before the capture script.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

/// Default playblast parameters.
///
/// Enum-valued fields are stored as strings and parsed by the job model,
/// which falls back to its built-in default for unknown values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayblastDefaults {
    /// Output directory. A leading `//` is relative to the project directory.
    pub output_directory: String,

    /// Base name of the output file.
    pub file_name: String,

    /// `video` or `image-sequence`.
    pub file_format: String,

    /// Video codec (e.g., "h264", "mpeg4").
    pub video_codec: String,

    /// Video container (e.g., "quicktime", "mpeg4", "avi").
    pub container_format: String,

    /// Resolution percentage (1-100).
    pub resolution_scale: u32,

    /// Output width in pixels.
    pub resolution_x: u32,

    /// Output height in pixels.
    pub resolution_y: u32,

    /// Whether the scene frame range is put back after the capture.
    pub restore_frame_range: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "playblast=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for PlayblastDefaults {
    fn default() -> Self {
        Self {
            output_directory: "//".to_string(),
            file_name: "playblast".to_string(),
            file_format: "video".to_string(),
            video_codec: "h264".to_string(),
            container_format: "quicktime".to_string(),
            resolution_scale: 75,
            resolution_x: 1920,
            resolution_y: 1080,
            restore_frame_range: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

impl BlenderConfig {
    /// Executable to launch, `blender` from `PATH` unless configured.
    pub fn executable_path(&self) -> PathBuf {
        self.executable
            .clone()
            .unwrap_or_else(|| PathBuf::from("blender"))
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("playblast").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dialog_defaults() {
        let defaults = PlayblastDefaults::default();
        assert_eq!(defaults.output_directory, "//");
        assert_eq!(defaults.file_name, "playblast");
        assert_eq!(defaults.file_format, "video");
        assert_eq!(defaults.container_format, "quicktime");
        assert_eq!(defaults.resolution_scale, 75);
        assert!(!defaults.restore_frame_range);
    }

    #[test]
    fn test_partial_config_fills_missing_sections() {
        let json = r#"{ "playblast": { "file_name": "shot010" } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.playblast.file_name, "shot010");
        assert_eq!(config.playblast.resolution_x, 1920);
        assert_eq!(config.logging.level, "info");
        assert!(config.blender.executable.is_none());
    }

    #[test]
    fn test_blender_executable_falls_back_to_path_lookup() {
        let mut config = AppConfig::default();
        assert_eq!(config.blender.executable_path(), PathBuf::from("blender"));

        config.blender.executable = Some(PathBuf::from("/opt/blender/blender"));
        assert_eq!(
            config.blender.executable_path(),
            PathBuf::from("/opt/blender/blender")
        );
    }
}
