//! Configuration file support for medcalc.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/medcalc/config.toml`.

use crate::limits::{cycle_length_in_range, DEFAULT_CYCLE_LENGTH};
use crate::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub ovulation: OvulationConfig,
}

/// When results are released to the person using the calculator
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Show results immediately
    #[default]
    Instant,
    /// Require an email address, then show results
    EmailFirst,
    /// Require an email address and only deliver results by email
    EmailOnly,
}

impl OutputMode {
    pub fn requires_email(&self) -> bool {
        matches!(self, OutputMode::EmailFirst | OutputMode::EmailOnly)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub mode: OutputMode,
}

/// Result rendering configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// strftime-style pattern for dates in headlines
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OvulationConfig {
    #[serde(default = "default_cycle_length")]
    pub default_cycle_length: u32,
}

impl Default for OvulationConfig {
    fn default() -> Self {
        Self {
            default_cycle_length: default_cycle_length(),
        }
    }
}

// Default value functions
fn default_date_format() -> String {
    "%B %-d, %Y".into()
}

fn default_cycle_length() -> u32 {
    DEFAULT_CYCLE_LENGTH
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from(".config"))
        });
        base.join("medcalc").join("config.toml")
    }

    /// Reject values the calculators cannot work with
    pub fn validate(&self) -> Result<()> {
        if !cycle_length_in_range(self.ovulation.default_cycle_length) {
            return Err(Error::Config(format!(
                "ovulation.default_cycle_length must be between 21 and 35, got {}",
                self.ovulation.default_cycle_length
            )));
        }

        if StrftimeItems::new(&self.display.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::Config(format!(
                "display.date_format is not a valid date pattern: {:?}",
                self.display.date_format
            )));
        }

        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = self.to_toml()?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.mode, OutputMode::Instant);
        assert_eq!(config.ovulation.default_cycle_length, 28);
        assert_eq!(config.display.date_format, "%B %-d, %Y");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[output]
mode = "email_only"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.mode, OutputMode::EmailOnly);
        assert_eq!(config.ovulation.default_cycle_length, 28); // default
    }

    #[test]
    fn test_out_of_range_cycle_length_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[ovulation]\ndefault_cycle_length = 40\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_bad_date_format_rejected() {
        let mut config = Config::default();
        config.display.date_format = "%Q %Y".into();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_output_mode_is_toml_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[output]\nmode = \"popup\"\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Toml(_))));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.output.mode = OutputMode::EmailFirst;
        config.ovulation.default_cycle_length = 30;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
