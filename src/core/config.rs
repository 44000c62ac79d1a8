//! Game configuration
//!
//! All tunables in one serializable tree. Saved and loaded as RON (Rusty
//! Object Notation) or JSON; missing fields fall back to their defaults, so
//! a config file only needs the values it changes.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ai::MonsterConfig;
use crate::game::{CollectibleConfig, PlayerConfig};

/// Top-level game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// OBJ file with the level geometry
    pub level_path: Option<PathBuf>,
    /// Fixed simulation rate in ticks per second
    pub tick_rate: u32,
    /// Monster spawn and restart position (x, z)
    pub monster_spawn: Vec2,
    pub monster: MonsterConfig,
    pub player: PlayerConfig,
    pub collectibles: CollectibleConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            level_path: None,
            tick_rate: 60,
            monster_spawn: Vec2::new(8.0, 8.0),
            monster: MonsterConfig::default(),
            player: PlayerConfig::default(),
            collectibles: CollectibleConfig::default(),
        }
    }
}

impl GameConfig {
    /// Set the level file
    #[must_use]
    pub fn with_level(mut self, path: impl Into<PathBuf>) -> Self {
        self.level_path = Some(path.into());
        self
    }

    /// Set the simulation rate
    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: u32) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Set the monster spawn position
    #[must_use]
    pub fn with_monster_spawn(mut self, spawn: Vec2) -> Self {
        self.monster_spawn = spawn;
        self
    }

    #[must_use]
    pub fn with_monster(mut self, monster: MonsterConfig) -> Self {
        self.monster = monster;
        self
    }

    #[must_use]
    pub fn with_player(mut self, player: PlayerConfig) -> Self {
        self.player = player;
        self
    }

    #[must_use]
    pub fn with_collectibles(mut self, collectibles: CollectibleConfig) -> Self {
        self.collectibles = collectibles;
        self
    }

    /// Seconds per tick
    #[must_use]
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Parse a config from a RON string
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid config
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }

    /// Serialize the config to a pretty RON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Save the config to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = self.to_ron_string()?;
        fs::write(path, ron_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config = Self::from_ron_str(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save the config to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| ConfigError::DeserializeError(e.to_string()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load a config, picking the format from the file extension
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::load_json(path),
            _ => Self::load_ron(path),
        }
    }
}

/// Errors that can occur during config operations
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
