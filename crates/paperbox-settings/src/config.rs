//! Configuration file handling
//!
//! A config file carries default box parameters, laser settings and output
//! preferences. Files are JSON or TOML, chosen by extension.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use paperbox_camtools::{LaserSettings, PaperBoxParameters};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Output file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Gcode,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Gcode => "gcode",
            Self::Json => "json",
        }
    }

    /// Guess the format from an output file name
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "svg" => Some(Self::Svg),
            "gcode" | "nc" | "ngc" => Some(Self::Gcode),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "gcode" | "g-code" => Ok(Self::Gcode),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Output preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Maximum chord length used when flattening arcs (mm)
    pub arc_segment_length: f64,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Svg,
            arc_segment_length: 0.5,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Default box parameters
    pub paper_box: PaperBoxParameters,
    /// Laser power and feed per layer
    pub laser: LaserSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn of(path: &Path) -> SettingsResult<Self> {
        if path.extension().is_some_and(|ext| ext == "json") {
            Ok(Self::Json)
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            Ok(Self::Toml)
        } else {
            let ext = path
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default();
            Err(ConfigError::UnsupportedFormat(ext).into())
        }
    }
}

impl Config {
    /// `<config dir>/paperbox/config.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("paperbox").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    ///
    /// The result is not validated: command line flags may still complete it,
    /// so callers run [`Config::validate`] once everything is merged.
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = FileFormat::of(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = match format {
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match FileFormat::of(path)? {
            FileFormat::Json => serde_json::to_string_pretty(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Load `explicit` (which must exist), else the default path if present,
    /// else the built-in defaults
    pub fn load_or_default(explicit: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            return Self::load_from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let arc_segment_length = self.output.arc_segment_length;
        if !arc_segment_length.is_finite() || arc_segment_length <= 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "output.arc_segment_length".to_string(),
                value: arc_segment_length.to_string(),
            }
            .into());
        }

        self.laser.validate()?;
        self.paper_box.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output.format, OutputFormat::Svg);
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("GCODE".parse::<OutputFormat>(), Ok(OutputFormat::Gcode));
        assert!("png".parse::<OutputFormat>().is_err());
        assert_eq!(
            OutputFormat::from_path(Path::new("box.NC")),
            Some(OutputFormat::Gcode)
        );
        assert_eq!(OutputFormat::from_path(Path::new("box")), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = FileFormat::of(Path::new("config.yaml")).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Config(ConfigError::UnsupportedFormat(ref ext)) if ext == "yaml"
        ));
    }

    #[test]
    fn test_invalid_arc_segment_length() {
        let mut config = Config::default();
        config.output.arc_segment_length = 0.0;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::Config(ConfigError::ValueOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[paper_box]\nx = 60.0\ndesign = \"tuckbox\"\n").unwrap();
        assert_eq!(config.paper_box.x, 60.0);
        assert_eq!(config.paper_box.y, 100.0);
        assert_eq!(config.laser, LaserSettings::default());
    }
}
