use serde::{Deserialize, Serialize};

fn default_block_name() -> String {
    "block".to_string()
}

/// Level data structure matching JSON format
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub id: String,
    pub spawn_point: SpawnPoint,
    #[serde(default)]
    pub blocks: Vec<BlockData>,
}

/// Spawn point data
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

/// Terrain block placed at its top-left corner
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockData {
    #[serde(default = "default_block_name")]
    pub name: String,
    pub x: f32,
    pub y: f32,
}

impl BlockData {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            name: default_block_name(),
            x,
            y,
        }
    }
}

impl LevelData {
    /// Built-in layout: a floor running a window's width past both edges,
    /// one block resting on it and one floating block.
    pub fn starter(width: u32, height: u32, block_size: u32, spawn_point: SpawnPoint) -> Self {
        let (w, h, bs) = (width as i32, height as i32, block_size as i32);

        let mut blocks: Vec<BlockData> = ((-w).div_euclid(bs)..(w * 2).div_euclid(bs))
            .map(|i| BlockData::new((i * bs) as f32, (h - bs) as f32))
            .collect();
        blocks.push(BlockData::new(0.0, (h - bs * 2) as f32));
        blocks.push(BlockData::new((bs * 3) as f32, (h - bs * 4) as f32));

        Self {
            id: "starter".to_string(),
            spawn_point,
            blocks,
        }
    }
}
