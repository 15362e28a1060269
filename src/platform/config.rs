// StashScope - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for StashScope configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/stashscope/ or %APPDATA%\StashScope\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[export]` section.
    pub export: ExportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Body font size in points.
    pub font_size: Option<f32>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Suggested CSV export file name.
    pub csv_file_name: Option<String>,
    /// Suggested JSON export file name.
    pub json_file_name: Option<String>,
    /// Suggested timeline snapshot file name.
    pub png_file_name: Option<String>,
    /// Snapshot width in pixels.
    pub png_width: Option<u32>,
    /// Snapshot height in pixels.
    pub png_height: Option<u32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    /// Body font size in points.
    pub font_size: f32,

    // -- Export --
    pub csv_file_name: String,
    pub json_file_name: String,
    pub png_file_name: String,
    pub png_width: u32,
    pub png_height: u32,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            csv_file_name: constants::DEFAULT_CSV_FILE_NAME.to_string(),
            json_file_name: constants::DEFAULT_JSON_FILE_NAME.to_string(),
            png_file_name: constants::DEFAULT_PNG_FILE_NAME.to_string(),
            png_width: constants::DEFAULT_PNG_WIDTH,
            png_height: constants::DEFAULT_PNG_HEIGHT,
            log_level: None,
        }
    }
}

/// Load and validate a config file.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unparseable, returns defaults with an error warning so the
/// application still starts but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content, config_path),
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            };
            tracing::warn!(error = %err, "Config unreadable");
            (AppConfig::default(), vec![format!("{err}. Using defaults.")])
        }
    }
}

/// Parse and validate config text. `origin` is used in messages only.
pub fn parse_config(content: &str, origin: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: origin.to_path_buf(),
                source: e,
            };
            tracing::warn!(error = %err, "Config unparseable");
            warnings.push(format!("{err}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %origin.display(), "Loaded config.toml");

    let mut config = AppConfig::default();

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => {
                warnings.push(format!(
                    "[ui] theme = \"{other}\" is not recognised. Expected \"dark\" or \"light\". Using default (dark).",
                ));
            }
        }
    }

    // -- UI: font_size --
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            warnings.push(format!(
                "[ui] font_size = {size} is out of range ({}-{}). Using default ({}).",
                constants::MIN_FONT_SIZE,
                constants::MAX_FONT_SIZE,
                constants::DEFAULT_FONT_SIZE,
            ));
        }
    }

    // -- Export: file names --
    let names = [
        ("csv_file_name", raw.export.csv_file_name, &mut config.csv_file_name),
        ("json_file_name", raw.export.json_file_name, &mut config.json_file_name),
        ("png_file_name", raw.export.png_file_name, &mut config.png_file_name),
    ];
    for (key, value, slot) in names {
        if let Some(name) = value {
            if is_plain_file_name(&name) {
                *slot = name;
            } else {
                warnings.push(format!(
                    "[export] {key} = \"{name}\" must be a bare file name. Using default ({slot}).",
                ));
            }
        }
    }

    // -- Export: snapshot size --
    let dims = [
        ("png_width", raw.export.png_width, &mut config.png_width),
        ("png_height", raw.export.png_height, &mut config.png_height),
    ];
    for (key, value, slot) in dims {
        if let Some(px) = value {
            if (constants::MIN_PNG_DIMENSION..=constants::MAX_PNG_DIMENSION).contains(&px) {
                *slot = px;
            } else {
                let err = ConfigError::ValueOutOfRange {
                    field: format!("[export] {key}"),
                    value: px.to_string(),
                    expected: format!(
                        "{}-{}",
                        constants::MIN_PNG_DIMENSION,
                        constants::MAX_PNG_DIMENSION
                    ),
                };
                warnings.push(format!("{err}. Using default ({slot})."));
            }
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

fn is_plain_file_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (AppConfig, Vec<String>) {
        parse_config(text, Path::new("config.toml"))
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let (config, warnings) = parse("");
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_values_applied() {
        let (config, warnings) = parse(
            r#"
[ui]
theme = "light"
font_size = 16.0

[export]
csv_file_name = "stash.csv"
png_width = 800
png_height = 400

[logging]
level = "debug"
"#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert!(!config.dark_mode);
        assert_eq!(config.font_size, 16.0);
        assert_eq!(config.csv_file_name, "stash.csv");
        assert_eq!(config.json_file_name, constants::DEFAULT_JSON_FILE_NAME);
        assert_eq!((config.png_width, config.png_height), (800, 400));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let (config, warnings) = parse(
            r#"
[ui]
theme = "neon"
font_size = 99.0

[export]
png_file_name = "../escape.png"
png_width = 10
"#,
        );
        assert_eq!(warnings.len(), 4);
        assert!(config.dark_mode);
        assert_eq!(config.font_size, constants::DEFAULT_FONT_SIZE);
        assert_eq!(config.png_file_name, constants::DEFAULT_PNG_FILE_NAME);
        assert_eq!(config.png_width, constants::DEFAULT_PNG_WIDTH);
    }

    #[test]
    fn test_unparseable_config_warns() {
        let (config, warnings) = parse("[ui\ntheme=");
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_missing_file_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }
}
