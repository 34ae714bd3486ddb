use crate::components::{Block, Collider, CollisionMask, Object, Position};
use crate::config::GameConfig;
use crate::level::{LevelData, SpawnPoint};
use crate::plugins::assets::BlockTexture;
use bevy::app::AppExit;
use bevy::prelude::*;
use std::fs;
use std::path::Path;

/// Draw order of terrain blocks
pub const BLOCK_Z: f32 = 0.0;

/// Resource holding the level being played
#[derive(Resource, Clone, Debug)]
pub struct CurrentLevel {
    pub level_data: LevelData,
}

/// Plugin for level loading and block spawning
pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, load_level_system)
            .add_systems(Startup, spawn_level_system);
    }
}

/// Load level from JSON file
pub fn load_level_from_file(path: &Path) -> Result<LevelData, LevelLoadError> {
    // Check if file exists
    if !path.exists() {
        return Err(LevelLoadError::FileNotFound(path.display().to_string()));
    }

    // Read file contents
    let contents = fs::read_to_string(path)
        .map_err(|e| LevelLoadError::IoError(path.display().to_string(), e.to_string()))?;

    // Parse JSON
    let level_data: LevelData = serde_json::from_str(&contents)
        .map_err(|e| LevelLoadError::ParseError(path.display().to_string(), e.to_string()))?;

    // Validate level data
    validate_level_data(&level_data)?;

    Ok(level_data)
}

/// Validate level data for required fields and valid values
fn validate_level_data(level: &LevelData) -> Result<(), LevelLoadError> {
    if level.id.is_empty() {
        return Err(LevelLoadError::ValidationError(
            "Level ID cannot be empty".to_string(),
        ));
    }

    if !level.spawn_point.x.is_finite() || !level.spawn_point.y.is_finite() {
        return Err(LevelLoadError::ValidationError(
            "Spawn point must be finite".to_string(),
        ));
    }

    // Every block needs a real position
    for (i, block) in level.blocks.iter().enumerate() {
        if !block.x.is_finite() || !block.y.is_finite() {
            return Err(LevelLoadError::ValidationError(format!(
                "Block {} has an invalid position",
                i
            )));
        }
    }

    Ok(())
}

/// Level named by the config, or the built-in layout
pub fn resolve_level(config: &GameConfig) -> Result<LevelData, LevelLoadError> {
    match &config.level {
        Some(path) => load_level_from_file(path),
        // No level file configured, use the built-in layout
        None => {
            let (x, y) = config.player_start;
            Ok(LevelData::starter(
                config.width,
                config.height,
                config.block_size,
                SpawnPoint { x, y },
            ))
        }
    }
}

/// Spawn one block entity per level block. Without a texture the blocks are
/// invisible solid rectangles.
pub fn spawn_level_entities(
    commands: &mut Commands,
    level: &LevelData,
    block_size: f32,
    texture: Option<&BlockTexture>,
) {
    for block in &level.blocks {
        let mut entity = commands.spawn((
            Object::new(block.name.clone()),
            Block,
            Position::new(block.x, block.y),
            Collider::new(block_size, block_size),
        ));

        if let Some(texture) = texture {
            entity.insert((
                CollisionMask(texture.mask.clone()),
                SpriteBundle {
                    texture: texture.texture.clone(),
                    transform: Transform::from_xyz(0.0, 0.0, BLOCK_Z),
                    ..default()
                },
            ));
        }
    }
}

fn load_level_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut exit: EventWriter<AppExit>,
) {
    match resolve_level(&config) {
        Ok(level_data) => {
            info!(
                "Loaded level {} with {} blocks",
                level_data.id,
                level_data.blocks.len()
            );
            commands.insert_resource(CurrentLevel { level_data });
        }
        Err(e) => {
            error!("Failed to load level: {}", e);
            exit.send(AppExit);
        }
    }
}

fn spawn_level_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    level: Option<Res<CurrentLevel>>,
    texture: Option<Res<BlockTexture>>,
) {
    let Some(level) = level else {
        return;
    };
    spawn_level_entities(
        &mut commands,
        &level.level_data,
        config.block_size as f32,
        texture.as_deref(),
    );
}

/// Level loading errors
#[derive(Debug, Clone, PartialEq)]
pub enum LevelLoadError {
    FileNotFound(String),
    IoError(String, String),
    ParseError(String, String),
    ValidationError(String),
}

impl std::fmt::Display for LevelLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelLoadError::FileNotFound(path) => write!(f, "Level file not found: {}", path),
            LevelLoadError::IoError(path, err) => {
                write!(f, "IO error reading level file {}: {}", path, err)
            }
            LevelLoadError::ParseError(path, err) => {
                write!(f, "Failed to parse level file {}: {}", path, err)
            }
            LevelLoadError::ValidationError(msg) => write!(f, "Level validation error: {}", msg),
        }
    }
}

impl std::error::Error for LevelLoadError {}
