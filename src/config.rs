//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration.
//!
//! ```toml
//! [joystick]
//! shape = "circle"   # or "square"
//! range = 80.0
//!
//! [publisher]
//! topic = "/joy"
//! rate_hz = 20.0
//! enabled = true
//! button_count = 8
//! frame_id = ""
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Result, VirtualJoyError};
use crate::joystick::{Shape, DEFAULT_RANGE};
use crate::publisher::timer::DEFAULT_RATE_HZ;
use crate::publisher::{validate_topic, DEFAULT_TOPIC};

/// Lowest accepted publish rate in Hz
pub const MIN_RATE_HZ: f64 = 0.01;

/// Highest accepted publish rate in Hz
pub const MAX_RATE_HZ: f64 = 1000.0;

/// Highest accepted number of buttons
pub const MAX_BUTTONS: usize = 32;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub joystick: JoystickConfig,
    #[serde(default)]
    pub publisher: PublisherConfig,
}

/// Stick geometry configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct JoystickConfig {
    #[serde(default)]
    pub shape: Shape,

    #[serde(default = "default_range")]
    pub range: f64,
}

/// Publisher configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PublisherConfig {
    #[serde(default = "default_topic")]
    pub topic: String,

    #[serde(default = "default_rate_hz")]
    pub rate_hz: f64,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_button_count")]
    pub button_count: usize,

    #[serde(default)]
    pub frame_id: String,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            shape: Shape::default(),
            range: default_range(),
        }
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            topic: default_topic(),
            rate_hz: default_rate_hz(),
            enabled: default_enabled(),
            button_count: default_button_count(),
            frame_id: String::new(),
        }
    }
}

// Default value functions
fn default_range() -> f64 { DEFAULT_RANGE }

fn default_topic() -> String { DEFAULT_TOPIC.to_string() }
fn default_rate_hz() -> f64 { DEFAULT_RATE_HZ }
fn default_enabled() -> bool { true }
fn default_button_count() -> usize { 8 }

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub topic: Option<String>,
    pub rate_hz: Option<f64>,
    pub shape: Option<Shape>,
    pub publish: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use virtual_joy::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Examples
    ///
    /// ```
    /// use virtual_joy::config::Config;
    /// use virtual_joy::joystick::Shape;
    ///
    /// let config = Config::parse("[joystick]\nshape = \"square\"\n")?;
    /// assert_eq!(config.joystick.shape, Shape::Square);
    /// assert_eq!(config.publisher.topic, "/joy");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides and validate the result
    ///
    /// # Errors
    ///
    /// Returns error if an overridden value is out of range
    pub fn apply(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(topic) = overrides.topic {
            self.publisher.topic = topic;
        }
        if let Some(rate_hz) = overrides.rate_hz {
            self.publisher.rate_hz = rate_hz;
        }
        if let Some(shape) = overrides.shape {
            self.joystick.shape = shape;
        }
        if let Some(publish) = overrides.publish {
            self.publisher.enabled = publish;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if !(self.joystick.range.is_finite() && self.joystick.range > 0.0) {
            return Err(VirtualJoyError::InvalidRange(self.joystick.range));
        }

        validate_topic(&self.publisher.topic)?;

        if !(self.publisher.rate_hz >= MIN_RATE_HZ && self.publisher.rate_hz <= MAX_RATE_HZ) {
            return Err(VirtualJoyError::Config(format!(
                "rate_hz must be between {} and {}",
                MIN_RATE_HZ, MAX_RATE_HZ
            )));
        }

        if self.publisher.button_count > MAX_BUTTONS {
            return Err(VirtualJoyError::Config(format!(
                "button_count must be at most {}",
                MAX_BUTTONS
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[joystick]
shape = "square"
range = 120.0

[publisher]
topic = "/teleop/joy"
rate_hz = 50.0
enabled = false
button_count = 4
frame_id = "base_link"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.joystick.shape, Shape::Square);
        assert_eq!(config.joystick.range, 120.0);
        assert_eq!(config.publisher.topic, "/teleop/joy");
        assert_eq!(config.publisher.rate_hz, 50.0);
        assert!(!config.publisher.enabled);
        assert_eq!(config.publisher.button_count, 4);
        assert_eq!(config.publisher.frame_id, "base_link");
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/virtual-joy.toml");
        assert!(matches!(result, Err(VirtualJoyError::Io(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let result = Config::parse("[joystick\nrange = ");
        assert!(matches!(result, Err(VirtualJoyError::ConfigParse(_))));
    }

    #[test]
    fn test_unknown_shape_is_square() {
        let config = Config::parse("[joystick]\nshape = \"octagon\"\n").unwrap();
        assert_eq!(config.joystick.shape, Shape::Square);
    }

    #[test]
    fn test_circle_shape_is_disk() {
        let config = Config::parse("[joystick]\nshape = \"circle\"\n").unwrap();
        assert_eq!(config.joystick.shape, Shape::Disk);
    }

    #[test]
    fn test_range_zero() {
        let mut config = Config::default();
        config.joystick.range = 0.0;
        assert!(matches!(config.validate(), Err(VirtualJoyError::InvalidRange(_))));
    }

    #[test]
    fn test_range_negative() {
        let result = Config::parse("[joystick]\nrange = -10.0\n");
        assert!(matches!(result, Err(VirtualJoyError::InvalidRange(_))));
    }

    #[test]
    fn test_range_nan() {
        let mut config = Config::default();
        config.joystick.range = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_topic() {
        let mut config = Config::default();
        config.publisher.topic = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_topic_with_whitespace() {
        let mut config = Config::default();
        config.publisher.topic = "/joy two".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rate_zero() {
        let mut config = Config::default();
        config.publisher.rate_hz = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rate_too_high() {
        let mut config = Config::default();
        config.publisher.rate_hz = 1000.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rate_below_min() {
        let mut config = Config::default();
        config.publisher.rate_hz = 1e-300;
        assert!(config.validate().is_err());

        config.publisher.rate_hz = MIN_RATE_HZ;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rate_at_max() {
        let mut config = Config::default();
        config.publisher.rate_hz = MAX_RATE_HZ;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_too_many_buttons() {
        let mut config = Config::default();
        config.publisher.button_count = MAX_BUTTONS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_buttons_allowed() {
        let mut config = Config::default();
        config.publisher.button_count = 0;
        assert!(config.validate().is_ok());
    }

    // ==================== Override Tests ====================

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config::default()
            .apply(Overrides {
                topic: Some("/cli/joy".to_string()),
                rate_hz: Some(5.0),
                shape: Some(Shape::Square),
                publish: Some(false),
            })
            .unwrap();

        assert_eq!(config.publisher.topic, "/cli/joy");
        assert_eq!(config.publisher.rate_hz, 5.0);
        assert_eq!(config.joystick.shape, Shape::Square);
        assert!(!config.publisher.enabled);
    }

    #[test]
    fn test_empty_overrides_keep_file_values() {
        let config = Config::parse("[publisher]\nrate_hz = 30.0\n").unwrap();
        let merged = config.clone().apply(Overrides::default()).unwrap();
        assert_eq!(merged, config);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let result = Config::default().apply(Overrides {
            rate_hz: Some(-3.0),
            ..Overrides::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_tiny_rate_override_rejected() {
        let result = Config::default().apply(Overrides {
            rate_hz: Some(1e-300),
            ..Overrides::default()
        });
        assert!(matches!(result, Err(VirtualJoyError::Config(_))));
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_range(), 80.0);
        assert_eq!(default_topic(), "/joy");
        assert_eq!(default_rate_hz(), 20.0);
        assert_eq!(default_enabled(), true);
        assert_eq!(default_button_count(), 8);
    }
}
