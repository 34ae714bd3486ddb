use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Game-wide tuning, read once at startup
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Horizontal speed in pixels per tick
    pub player_velocity: f32,
    pub gravity: f32,
    /// Ticks each animation frame stays on screen
    pub animation_delay: u32,
    pub max_jumps: u32,
    /// Jump velocity as a multiple of gravity
    pub jump_strength: f32,
    pub block_size: u32,
    pub scroll_area_width: f32,
    pub assets_dir: PathBuf,
    pub background: String,
    pub character: String,
    pub sprite_width: u32,
    pub sprite_height: u32,
    pub player_start: (f32, f32),
    pub player_size: (f32, f32),
    pub level: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Legend of Ninja Frog".to_string(),
            width: 800,
            height: 600,
            fps: 60,
            player_velocity: 5.0,
            gravity: 1.0,
            animation_delay: 3,
            max_jumps: 2,
            jump_strength: 8.0,
            block_size: 96,
            scroll_area_width: 200.0,
            assets_dir: PathBuf::from("assets"),
            background: "Blue.png".to_string(),
            character: "NinjaFrog".to_string(),
            sprite_width: 32,
            sprite_height: 32,
            player_start: (100.0, 100.0),
            player_size: (50.0, 50.0),
            level: None,
        }
    }
}

impl GameConfig {
    /// Load config from a JSON file; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        // No config file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        // Read file contents
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;

        // Parse JSON; missing fields fall back to defaults
        let config: GameConfig = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))?;

        // Validate values
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Validation(
                "Window dimensions must be positive".to_string(),
            ));
        }
        if self.fps == 0 {
            return Err(ConfigError::Validation("FPS must be positive".to_string()));
        }
        if self.block_size == 0 {
            return Err(ConfigError::Validation(
                "Block size must be positive".to_string(),
            ));
        }
        if self.sprite_width == 0 || self.sprite_height == 0 {
            return Err(ConfigError::Validation(
                "Sprite frame dimensions must be positive".to_string(),
            ));
        }
        if self.gravity <= 0.0 {
            return Err(ConfigError::Validation(
                "Gravity must be positive".to_string(),
            ));
        }
        if self.max_jumps == 0 {
            return Err(ConfigError::Validation(
                "At least one jump must be allowed".to_string(),
            ));
        }
        Ok(())
    }

    /// Length of one fixed tick in seconds
    pub fn timestep(&self) -> f64 {
        1.0 / self.fps as f64
    }
}

/// Config loading errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Io(String, String),
    Parse(String, String),
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, err) => write!(f, "IO error reading config {}: {}", path, err),
            ConfigError::Parse(path, err) => write!(f, "Failed to parse config {}: {}", path, err),
            ConfigError::Validation(msg) => write!(f, "Config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
