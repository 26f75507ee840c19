//! TOML-based application configuration.
//!
//! Stores player-facing preferences: starting difficulty, preferred game
//! mode, sound, and an optional fixed RNG seed for reproducible rounds.
//!
//! Configuration is stored at `~/.config/sifferlek/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::mode::GameMode;

use super::data_dir;

const CONFIG_FILE: &str = "config.toml";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Difficulty level new rounds start at (1-4).
    #[serde(default = "default_level")]
    pub default_level: u8,
    /// Game mode the `play` command defaults to.
    #[serde(default = "default_mode")]
    pub default_mode: GameMode,
    /// Fixed seed for question generation; unset means entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Sound effects toggle, consumed by the presentation layer.
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
}

fn default_level() -> u8 {
    1
}

fn default_mode() -> GameMode {
    GameMode::Arithmetic
}

fn default_true() -> bool {
    true
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            default_level: 1,
            default_mode: GameMode::Arithmetic,
            seed: None,
            sound_enabled: true,
        }
    }
}

impl GameConfig {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from(CONFIG_FILE),
            message: e.to_string(),
        })?;
        Ok(dir.join(CONFIG_FILE))
    }

    /// Load the config, creating a default file on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let config = Self::default();
                config.save()?;
                Ok(config)
            }
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Validate and apply a `key = value` style setting.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "default_level" => {
                let level: u8 = value.parse().map_err(|_| invalid(key, value))?;
                if !(1..=4).contains(&level) {
                    return Err(invalid(key, value));
                }
                self.default_level = level;
            }
            "default_mode" => {
                self.default_mode = match value {
                    "arithmetic" | "plus" => GameMode::Arithmetic,
                    "counting" | "rakna" => GameMode::Counting,
                    _ => return Err(invalid(key, value)),
                };
            }
            "seed" => {
                self.seed = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(value.parse().map_err(|_| invalid(key, value))?)
                };
            }
            "sound_enabled" => {
                self.sound_enabled = value.parse().map_err(|_| invalid(key, value))?;
            }
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "unknown key".to_string(),
                })
            }
        }
        Ok(())
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{value}' is not valid"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let c = GameConfig::default();
        assert_eq!(c.default_level, 1);
        assert_eq!(c.default_mode, GameMode::Arithmetic);
        assert!(c.seed.is_none());
        assert!(c.sound_enabled);
    }

    #[test]
    fn set_validates_level_range() {
        let mut c = GameConfig::default();
        assert!(c.set("default_level", "3").is_ok());
        assert_eq!(c.default_level, 3);
        assert!(c.set("default_level", "5").is_err());
        assert!(c.set("default_level", "abc").is_err());
    }

    #[test]
    fn set_parses_mode_aliases() {
        let mut c = GameConfig::default();
        assert!(c.set("default_mode", "rakna").is_ok());
        assert_eq!(c.default_mode, GameMode::Counting);
        assert!(c.set("default_mode", "plus").is_ok());
        assert_eq!(c.default_mode, GameMode::Arithmetic);
        assert!(c.set("default_mode", "chess").is_err());
    }

    #[test]
    fn set_rejects_unknown_keys() {
        let mut c = GameConfig::default();
        assert!(c.set("volume", "11").is_err());
    }

    #[test]
    fn toml_round_trips() {
        let c = GameConfig {
            default_level: 2,
            default_mode: GameMode::Counting,
            seed: Some(7),
            sound_enabled: false,
        };
        let text = toml::to_string_pretty(&c).unwrap();
        let back: GameConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.default_level, 2);
        assert_eq!(back.default_mode, GameMode::Counting);
        assert_eq!(back.seed, Some(7));
        assert!(!back.sound_enabled);
    }
}
