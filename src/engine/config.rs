//=========================================================================
// Engine Configuration
//=========================================================================
//
// TOML-backed settings for the engine and its scene manager.
//
// Example:
// ```toml
// tps = 60.0
// start_playing = true
//
// [scene_manager]
// mode = "single"
// screen_width = 1280.0
// screen_height = 720.0
// default_transition_time = 0.5
// max_preload_events_per_tick = 64
// ```
//
// Every key is optional; missing keys take their default value.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::scene::SceneManagerConfig;

//=== ConfigError =========================================================

/// Errors raised while loading or saving an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The file parsed but holds values the engine cannot run with.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

//=== EngineConfig ========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed ticks per second of [`Engine::run_while`](crate::Engine::run_while).
    pub tps: f64,

    /// Initial value of the engine's `playing` flag.
    pub start_playing: bool,

    pub scene_manager: SceneManagerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tps: 60.0,
            start_playing: true,
            scene_manager: SceneManagerConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Writes the configuration as pretty-printed TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tps.is_finite() || self.tps <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tps must be positive, got {}",
                self.tps
            )));
        }

        let scenes = &self.scene_manager;
        if scenes.screen_width <= 0.0 || scenes.screen_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "screen size must be positive, got {}x{}",
                scenes.screen_width, scenes.screen_height
            )));
        }
        if scenes.default_transition_time < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "default_transition_time must not be negative, got {}",
                scenes.default_transition_time
            )));
        }
        if scenes.max_preload_events_per_tick == 0 {
            return Err(ConfigError::Invalid(
                "max_preload_events_per_tick must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
