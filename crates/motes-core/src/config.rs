//! `motes.toml` loading.
//!
//! Every section and key is optional; an empty file yields the built-in
//! defaults.
//!
//! ```toml
//! [defaults]
//! particle_count = 8000
//! base_color = "#ff8800"
//!
//! [simulation]
//! seed = 42
//!
//! [window]
//! title = "Motes"
//! width = 1280
//! height = 800
//!
//! [headless]
//! frame_rate = 30.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::color::Color;
use crate::error::ConfigError;
use crate::params::{
    is_valid_particle_count, is_valid_particle_size, is_valid_speed_factor, Parameters, MAX_PARTICLES,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotesConfig {
    pub defaults: DefaultsConfig,
    pub simulation: SimulationConfig,
    pub window: WindowConfig,
    pub headless: HeadlessConfig,
}

/// Startup values, also the snapshot `reset` returns to. Colors are hex
/// strings so the file reads the same as console input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub particle_count: u32,
    pub speed_factor: f32,
    pub base_color: String,
    pub particle_size: f32,
    pub background_color: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let builtin = Parameters::default();
        Self {
            particle_count: builtin.particle_count,
            speed_factor: builtin.speed_factor,
            base_color: builtin.base_color.to_string(),
            particle_size: builtin.particle_size,
            background_color: builtin.background_color.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Motes".into(),
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// Slowest accepted headless tick rate.
pub const MIN_FRAME_RATE: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    /// Simulation ticks per second.
    pub frame_rate: f32,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self { frame_rate: 60.0 }
    }
}

impl MotesConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parameters()?;
        if !(self.headless.frame_rate.is_finite() && self.headless.frame_rate >= MIN_FRAME_RATE) {
            return Err(invalid(
                "headless.frame_rate",
                format!("must be a number of at least {MIN_FRAME_RATE}"),
            ));
        }
        if !(self.window.width > 0.0 && self.window.height > 0.0) {
            return Err(invalid("window", "width and height must be positive"));
        }
        Ok(())
    }

    /// Resolve `[defaults]` into the parameter snapshot, applying the same
    /// rules as the console commands.
    pub fn parameters(&self) -> Result<Parameters, ConfigError> {
        let d = &self.defaults;
        if !is_valid_particle_count(d.particle_count) {
            return Err(invalid(
                "defaults.particle_count",
                format!("must be between 1 and {MAX_PARTICLES}"),
            ));
        }
        if !is_valid_speed_factor(d.speed_factor) {
            return Err(invalid("defaults.speed_factor", "must be a non-negative number"));
        }
        if !is_valid_particle_size(d.particle_size) {
            return Err(invalid("defaults.particle_size", "must be a positive number"));
        }
        let color = |field: &'static str, value: &str| {
            Color::parse_hex(value).ok_or_else(|| invalid(field, format!("`{value}` is not a #rrggbb color")))
        };

        Ok(Parameters {
            particle_count: d.particle_count,
            speed_factor: d.speed_factor,
            base_color: color("defaults.base_color", &d.base_color)?,
            particle_size: d.particle_size,
            background_color: color("defaults.background_color", &d.background_color)?,
        })
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_matches_builtins() {
        let config = MotesConfig::from_toml_str("").unwrap();
        assert_eq!(config, MotesConfig::default());

        let params = config.parameters().unwrap();
        assert_eq!(params.particle_count, 5000);
        assert_eq!(params.speed_factor, 0.01);
        assert_eq!(params.base_color.to_string(), "#00ffaa");
        assert_eq!(params.particle_size, 0.1);
        assert_eq!(params.background_color.to_string(), "#111111");
    }

    #[test]
    fn test_partial_config() {
        let config = MotesConfig::from_toml_str(
            r##"
            [defaults]
            particle_count = 8000
            base_color = "#FF8800"

            [simulation]
            seed = 42
            "##,
        )
        .unwrap();

        let params = config.parameters().unwrap();
        assert_eq!(params.particle_count, 8000);
        assert_eq!(params.base_color, Color::from_hex(0xff8800));
        assert_eq!(params.speed_factor, 0.01);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.headless.frame_rate, 60.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = MotesConfig::from_toml_str("[defaults]\nparticle_count = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "defaults.particle_count", .. }));

        let err = MotesConfig::from_toml_str("[defaults]\nbackground_color = \"gray\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "defaults.background_color", .. }));

        let err = MotesConfig::from_toml_str("[headless]\nframe_rate = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "headless.frame_rate", .. }));
    }

    #[test]
    fn test_frame_rate_floor() {
        for rate in ["1e-40", "0.05", "inf"] {
            let err = MotesConfig::from_toml_str(&format!("[headless]\nframe_rate = {rate}")).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { field: "headless.frame_rate", .. }), "{rate}");
        }
        let config = MotesConfig::from_toml_str("[headless]\nframe_rate = 0.1").unwrap();
        assert!((1.0 / config.headless.frame_rate).is_finite());
    }

    #[test]
    fn test_parse_error() {
        let err = MotesConfig::from_toml_str("[defaults\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
