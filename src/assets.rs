//! Image loading: sprite sheet slicing, background tiling and terrain tiles.
//!
//! Everything here works on decoded `RgbaImage`s so it runs without a window;
//! `plugins::assets` turns the results into textures.

use bevy::math::{IVec2, UVec2};
use image::{imageops, RgbaImage};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-left corner of the terrain tile used for blocks inside `Terrain.png`
pub const TERRAIN_TILE_ORIGIN: UVec2 = UVec2::new(96, 0);

/// Frames keyed by sheet name (`idle_left`, `run_right`, ...)
pub type SpriteSheets = BTreeMap<String, Vec<RgbaImage>>;

/// Repeating background image and the tile corners covering the window
#[derive(Clone, Debug)]
pub struct Background {
    pub image: RgbaImage,
    pub tiles: Vec<IVec2>,
}

/// Decode an image file as RGBA
pub fn open_image(path: &Path) -> Result<RgbaImage, AssetLoadError> {
    if !path.exists() {
        return Err(AssetLoadError::FileNotFound(path.display().to_string()));
    }
    image::open(path)
        .map(|image| image.to_rgba8())
        .map_err(|e| AssetLoadError::Decode(path.display().to_string(), e.to_string()))
}

/// Load every sheet in `root/dir1/dir2`, slicing `width`×`height` frames from
/// the top row and doubling them with Scale2x. With `direction`, each sheet
/// is stored as `<name>_right` plus a mirrored `<name>_left`.
pub fn load_sprite_sheets(
    root: &Path,
    dir1: &str,
    dir2: &str,
    width: u32,
    height: u32,
    direction: bool,
) -> Result<SpriteSheets, AssetLoadError> {
    let dir = root.join(dir1).join(dir2);
    let mut sheets = SpriteSheets::new();

    for path in sheet_files(&dir)? {
        // Slice the top row and double each frame
        let sheet = open_image(&path)?;
        let frames: Vec<RgbaImage> = slice_frames(&sheet, width, height)
            .iter()
            .map(scale2x)
            .collect();

        if frames.is_empty() {
            return Err(AssetLoadError::EmptySheet(path.display().to_string()));
        }

        // Sheet name is the file name without extension
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        // Sheets face right; mirror them for the left
        if direction {
            let flipped = frames.iter().map(imageops::flip_horizontal).collect();
            sheets.insert(format!("{}_right", name), frames);
            sheets.insert(format!("{}_left", name), flipped);
        } else {
            sheets.insert(name, frames);
        }
    }

    Ok(sheets)
}

/// PNG files directly inside `dir`, sorted by name
fn sheet_files(dir: &Path) -> Result<Vec<PathBuf>, AssetLoadError> {
    if !dir.is_dir() {
        return Err(AssetLoadError::DirectoryNotFound(dir.display().to_string()));
    }

    let entries =
        fs::read_dir(dir).map_err(|e| AssetLoadError::Io(dir.display().to_string(), e.to_string()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AssetLoadError::Io(dir.display().to_string(), e.to_string()))?;
        let path = entry.path();
        let is_png = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if path.is_file() && is_png {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Cut `sheet_width / width` frames from the top row of a sheet
pub fn slice_frames(sheet: &RgbaImage, width: u32, height: u32) -> Vec<RgbaImage> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    (0..sheet.width() / width)
        .map(|i| {
            let mut frame = RgbaImage::new(width, height);
            let region = imageops::crop_imm(sheet, i * width, 0, width, height).to_image();
            imageops::replace(&mut frame, &region, 0, 0);
            frame
        })
        .collect()
}

/// Double an image with the Scale2x (EPX) edge-preserving algorithm
pub fn scale2x(source: &RgbaImage) -> RgbaImage {
    let (w, h) = source.dimensions();
    let mut scaled = RgbaImage::new(w * 2, h * 2);

    for y in 0..h {
        for x in 0..w {
            let p = *source.get_pixel(x, y);
            let up = *source.get_pixel(x, y.saturating_sub(1));
            let right = *source.get_pixel((x + 1).min(w - 1), y);
            let left = *source.get_pixel(x.saturating_sub(1), y);
            let down = *source.get_pixel(x, (y + 1).min(h - 1));

            let e0 = if left == up && left != down && up != right { up } else { p };
            let e1 = if up == right && up != left && right != down { right } else { p };
            let e2 = if down == left && down != right && left != up { left } else { p };
            let e3 = if right == down && right != up && down != left { down } else { p };

            scaled.put_pixel(2 * x, 2 * y, e0);
            scaled.put_pixel(2 * x + 1, 2 * y, e1);
            scaled.put_pixel(2 * x, 2 * y + 1, e2);
            scaled.put_pixel(2 * x + 1, 2 * y + 1, e3);
        }
    }
    scaled
}

/// Tile corners covering a `width`×`height` window with one spare row and column
pub fn background_tiles(tile: UVec2, width: u32, height: u32) -> Vec<IVec2> {
    if tile.x == 0 || tile.y == 0 {
        return Vec::new();
    }

    let mut tiles = Vec::new();
    for i in 0..=(width / tile.x) {
        for j in 0..=(height / tile.y) {
            tiles.push(IVec2::new((i * tile.x) as i32, (j * tile.y) as i32));
        }
    }
    tiles
}

/// Load `root/Background/<name>` and lay it out over the window
pub fn load_background(
    root: &Path,
    name: &str,
    width: u32,
    height: u32,
) -> Result<Background, AssetLoadError> {
    let image = open_image(&root.join("Background").join(name))?;
    let tiles = background_tiles(UVec2::new(image.width(), image.height()), width, height);
    Ok(Background { image, tiles })
}

/// Terrain block image of `size`×`size` pixels
pub fn load_block(root: &Path, size: u32) -> Result<RgbaImage, AssetLoadError> {
    let terrain = open_image(&root.join("Terrain").join("Terrain.png"))?;
    Ok(block_from_terrain(&terrain, size))
}

/// Crop the grass tile, double it and keep the top-left `size`×`size`
pub fn block_from_terrain(terrain: &RgbaImage, size: u32) -> RgbaImage {
    // Copy the tile onto a transparent canvas
    let mut surface = RgbaImage::new(size, size);
    let region = imageops::crop_imm(
        terrain,
        TERRAIN_TILE_ORIGIN.x,
        TERRAIN_TILE_ORIGIN.y,
        size,
        size,
    )
    .to_image();
    imageops::replace(&mut surface, &region, 0, 0);

    // Doubling overshoots the canvas; keep the top-left corner
    let doubled = scale2x(&surface);
    imageops::crop_imm(&doubled, 0, 0, size, size).to_image()
}

/// Asset loading errors
#[derive(Debug, Clone, PartialEq)]
pub enum AssetLoadError {
    DirectoryNotFound(String),
    FileNotFound(String),
    Io(String, String),
    Decode(String, String),
    EmptySheet(String),
}

impl std::fmt::Display for AssetLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetLoadError::DirectoryNotFound(path) => {
                write!(f, "Asset directory not found: {}", path)
            }
            AssetLoadError::FileNotFound(path) => write!(f, "Asset file not found: {}", path),
            AssetLoadError::Io(path, err) => write!(f, "IO error reading {}: {}", path, err),
            AssetLoadError::Decode(path, err) => write!(f, "Failed to decode {}: {}", path, err),
            AssetLoadError::EmptySheet(path) => {
                write!(f, "Sprite sheet {} is narrower than one frame", path)
            }
        }
    }
}

impl std::error::Error for AssetLoadError {}
