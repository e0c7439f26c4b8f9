//! Configuration file support for cairo-chrome.
//!
//! Settings are read from `~/.config/cairo-chrome/config.toml`. Every value
//! has a default, so a missing file or a missing section is fine; values out
//! of range are clamped with a warning.

pub mod types;

pub use types::{DriverConfig, ThemeConfig};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::theme::ThemeRegistry;

const STACK_DEPTH_RANGE: std::ops::RangeInclusive<usize> = 4..=256;

/// Root configuration.
///
/// # Example TOML
/// ```toml
/// [driver]
/// antialias = "on"
/// matrix_stack_depth = 32
/// clip_stack_depth = 32
///
/// [theme]
/// name = "Vector"
/// scheme = "Dark"
/// box_saturation = 0.6
/// gradients = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Graphics driver settings
    #[serde(default)]
    pub driver: DriverConfig,

    /// Box theme and color scheme
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Config {
    /// Clamps numeric settings and replaces unknown theme or scheme names
    /// with the defaults.
    ///
    /// Validated ranges:
    /// - `matrix_stack_depth`, `clip_stack_depth`: 4 - 256
    /// - `box_saturation`: 0.0 - 1.0
    fn validate_and_clamp(&mut self) {
        let (lo, hi) = (*STACK_DEPTH_RANGE.start(), *STACK_DEPTH_RANGE.end());
        if !STACK_DEPTH_RANGE.contains(&self.driver.matrix_stack_depth) {
            warn!(
                "Invalid matrix_stack_depth {}, clamping to {lo}-{hi} range",
                self.driver.matrix_stack_depth
            );
            self.driver.matrix_stack_depth = self.driver.matrix_stack_depth.clamp(lo, hi);
        }
        if !STACK_DEPTH_RANGE.contains(&self.driver.clip_stack_depth) {
            warn!(
                "Invalid clip_stack_depth {}, clamping to {lo}-{hi} range",
                self.driver.clip_stack_depth
            );
            self.driver.clip_stack_depth = self.driver.clip_stack_depth.clamp(lo, hi);
        }

        if !(0.0..=1.0).contains(&self.theme.box_saturation) {
            warn!(
                "Invalid box_saturation {:.2}, clamping to 0.0-1.0 range",
                self.theme.box_saturation
            );
            self.theme.box_saturation = if self.theme.box_saturation.is_nan() {
                ThemeConfig::default().box_saturation
            } else {
                self.theme.box_saturation.clamp(0.0, 1.0)
            };
        }

        let registry = ThemeRegistry::with_defaults();
        let defaults = ThemeConfig::default();
        if registry.find(&self.theme.name).is_none() {
            warn!(
                "Unknown theme '{}', falling back to '{}'",
                self.theme.name, defaults.name
            );
            self.theme.name = defaults.name;
        }
        if registry.find_scheme(&self.theme.scheme).is_none() {
            warn!(
                "Unknown color scheme '{}', falling back to '{}'",
                self.theme.scheme, defaults.scheme
            );
            self.theme.scheme = defaults.scheme;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("cairo-chrome");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads the user's configuration, or defaults if there is none.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Loads configuration from `path`, or returns defaults if it doesn't
    /// exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or is not
    /// valid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let mut config = Self::parse(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.validate_and_clamp();

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);
        Ok(config)
    }

    fn parse(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Writes the annotated example configuration to `path`.
    ///
    /// # Errors
    /// Returns an error if a file already exists there or it cannot be
    /// written.
    pub fn create_default_file(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(path, default_config)?;

        info!("Created default config at {}", path.display());
        Ok(())
    }

    /// JSON schema of the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{AntialiasMode, DriverOptions};

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.driver.matrix_stack_depth, 32);
        assert_eq!(config.theme.name, "Cairo");
        assert!(config.theme.gradients);
    }

    #[test]
    fn sections_are_read() {
        let config = Config::parse(
            r#"
            [driver]
            antialias = "off"
            clip_stack_depth = 64

            [theme]
            name = "Vector"
            scheme = "Washed out"
            debug_boxes = true
            "#,
        )
        .unwrap();
        assert_eq!(config.driver.antialias, AntialiasMode::Off);
        assert_eq!(config.driver.clip_stack_depth, 64);
        assert_eq!(config.theme.scheme, "Washed out");
        assert!(config.theme.box_style().debug);

        let options = DriverOptions::from(&config.driver);
        assert_eq!(options.clip_stack_depth, 64);
        assert_eq!(options.antialias, AntialiasMode::Off);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut config = Config::parse(
            r#"
            [driver]
            matrix_stack_depth = 1
            clip_stack_depth = 100000

            [theme]
            box_saturation = 1.5
            "#,
        )
        .unwrap();
        config.validate_and_clamp();
        assert_eq!(config.driver.matrix_stack_depth, 4);
        assert_eq!(config.driver.clip_stack_depth, 256);
        assert_eq!(config.theme.box_saturation, 1.0);
    }

    #[test]
    fn unknown_names_fall_back() {
        let mut config = Config::parse(
            r#"
            [theme]
            name = "Gleam"
            scheme = "Neon"
            "#,
        )
        .unwrap();
        config.validate_and_clamp();
        assert_eq!(config.theme.name, "Cairo");
        assert_eq!(config.theme.scheme, "Gray");
    }

    #[test]
    fn bad_antialias_mode_is_a_parse_error() {
        assert!(Config::parse("[driver]\nantialias = \"sometimes\"").is_err());
    }

    #[test]
    fn load_from_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.theme.scheme, "Gray");
    }

    #[test]
    fn example_file_round_trips_through_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        Config::create_default_file(&path).unwrap();
        assert!(Config::create_default_file(&path).is_err());
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.driver.antialias, AntialiasMode::Default);
    }

    #[test]
    fn schema_names_both_sections() {
        let schema = serde_json::to_value(Config::json_schema()).unwrap();
        let properties = &schema["properties"];
        assert!(properties.get("driver").is_some());
        assert!(properties.get("theme").is_some());
    }
}
