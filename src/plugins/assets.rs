use crate::assets::{
    load_background, load_block, load_sprite_sheets, AssetLoadError, Background, SpriteSheets,
};
use crate::config::GameConfig;
use crate::mask::Mask;
use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use image::RgbaImage;
use std::collections::BTreeMap;

/// Directory under the assets root holding character sprite sheets
pub const CHARACTERS_DIR: &str = "MainCharacters";

/// One animation frame: texture plus its collision mask
#[derive(Clone, Debug)]
pub struct SpriteFrame {
    pub texture: Handle<Image>,
    pub mask: Mask,
}

impl SpriteFrame {
    pub fn size(&self) -> Vec2 {
        self.mask.size().as_vec2()
    }
}

/// Player animation frames keyed by sheet name
#[derive(Resource, Clone, Debug, Default)]
pub struct SpriteLibrary {
    pub sheets: BTreeMap<String, Vec<SpriteFrame>>,
}

impl SpriteLibrary {
    pub fn frames(&self, key: &str) -> Option<&[SpriteFrame]> {
        self.sheets
            .get(key)
            .map(Vec::as_slice)
            .filter(|frames| !frames.is_empty())
    }
}

/// Terrain block texture shared by every block
#[derive(Resource, Clone, Debug)]
pub struct BlockTexture {
    pub texture: Handle<Image>,
    pub mask: Mask,
}

/// Background texture and the screen tiles it is drawn at
#[derive(Resource, Clone, Debug)]
pub struct BackgroundTexture {
    pub texture: Handle<Image>,
    pub size: Vec2,
    pub tiles: Vec<IVec2>,
}

/// Everything decoded from disk before any texture exists
pub struct LoadedAssets {
    pub sheets: SpriteSheets,
    pub background: Background,
    pub block: RgbaImage,
}

impl LoadedAssets {
    pub fn load(config: &GameConfig) -> Result<Self, AssetLoadError> {
        let root = config.assets_dir.as_path();
        let sheets = load_sprite_sheets(
            root,
            CHARACTERS_DIR,
            &config.character,
            config.sprite_width,
            config.sprite_height,
            true,
        )?;
        let background = load_background(root, &config.background, config.width, config.height)?;
        let block = load_block(root, config.block_size)?;

        Ok(Self {
            sheets,
            background,
            block,
        })
    }

    /// Upload images as textures and build the game resources
    pub fn install(
        self,
        images: &mut Assets<Image>,
    ) -> (SpriteLibrary, BlockTexture, BackgroundTexture) {
        let sheets = self
            .sheets
            .into_iter()
            .map(|(name, frames)| {
                let frames = frames
                    .into_iter()
                    .map(|frame| SpriteFrame {
                        mask: Mask::from_image(&frame),
                        texture: images.add(texture_from_rgba(frame)),
                    })
                    .collect();
                (name, frames)
            })
            .collect();

        let block = BlockTexture {
            mask: Mask::from_image(&self.block),
            texture: images.add(texture_from_rgba(self.block)),
        };

        let background_size = Vec2::new(
            self.background.image.width() as f32,
            self.background.image.height() as f32,
        );
        let background = BackgroundTexture {
            texture: images.add(texture_from_rgba(self.background.image)),
            size: background_size,
            tiles: self.background.tiles,
        };

        (SpriteLibrary { sheets }, block, background)
    }
}

/// Wrap decoded RGBA pixels in a bevy texture
pub fn texture_from_rgba(image: RgbaImage) -> Image {
    let (width, height) = image.dimensions();
    Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        image.into_raw(),
        TextureFormat::Rgba8UnormSrgb,
    )
}

/// Plugin that decodes the game's images before anything is spawned
pub struct GameAssetsPlugin;

impl Plugin for GameAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, load_game_assets_system);
    }
}

/// Decode assets and install them; a failure ends the game
fn load_game_assets_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut images: ResMut<Assets<Image>>,
    mut exit: EventWriter<AppExit>,
) {
    match LoadedAssets::load(&config) {
        Ok(loaded) => {
            let (library, block, background) = loaded.install(&mut images);
            info!(
                "Loaded {} sprite sheets from {}",
                library.sheets.len(),
                config.assets_dir.display()
            );
            commands.insert_resource(library);
            commands.insert_resource(block);
            commands.insert_resource(background);
        }
        Err(e) => {
            error!("Failed to load assets: {}", e);
            exit.send(AppExit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_assets(root: &Path) {
        let character = root.join(CHARACTERS_DIR).join("NinjaFrog");
        fs::create_dir_all(&character).unwrap();
        RgbaImage::from_pixel(64, 32, Rgba([0, 255, 0, 255]))
            .save(character.join("idle.png"))
            .unwrap();

        fs::create_dir_all(root.join("Terrain")).unwrap();
        RgbaImage::from_pixel(192, 96, Rgba([120, 80, 40, 255]))
            .save(root.join("Terrain").join("Terrain.png"))
            .unwrap();

        fs::create_dir_all(root.join("Background")).unwrap();
        RgbaImage::from_pixel(64, 64, Rgba([0, 0, 255, 255]))
            .save(root.join("Background").join("Blue.png"))
            .unwrap();
    }

    fn test_app(config: GameConfig) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Assets<Image>>()
            .insert_resource(config)
            .add_plugins(GameAssetsPlugin);
        app
    }

    #[test]
    fn test_texture_from_rgba_keeps_size() {
        let texture = texture_from_rgba(RgbaImage::new(8, 4));
        assert_eq!(texture.texture_descriptor.size.width, 8);
        assert_eq!(texture.texture_descriptor.size.height, 4);
        assert_eq!(texture.data.len(), 8 * 4 * 4);
    }

    #[test]
    fn test_library_skips_empty_sheets() {
        let mut library = SpriteLibrary::default();
        library.sheets.insert("idle_left".to_string(), Vec::new());
        assert!(library.frames("idle_left").is_none());
        assert!(library.frames("run_left").is_none());
    }

    #[test]
    fn test_assets_installed_on_startup() {
        let root = TempDir::new().unwrap();
        write_assets(root.path());

        let mut app = test_app(GameConfig {
            assets_dir: root.path().to_path_buf(),
            ..Default::default()
        });
        app.update();

        let library = app.world.resource::<SpriteLibrary>();
        let idle = library.frames("idle_right").unwrap();
        assert_eq!(idle.len(), 2);
        assert_eq!(idle[0].size(), Vec2::new(64.0, 64.0));
        assert_eq!(idle[0].mask.count(), 64 * 64);
        assert!(library.frames("idle_left").is_some());

        let block = app.world.resource::<BlockTexture>();
        assert_eq!(block.mask.size(), UVec2::new(96, 96));

        let background = app.world.resource::<BackgroundTexture>();
        assert_eq!(background.tiles.len(), 130);
        assert_eq!(background.size, Vec2::new(64.0, 64.0));
    }

    #[test]
    fn test_missing_assets_request_exit() {
        let root = TempDir::new().unwrap();

        let mut app = test_app(GameConfig {
            assets_dir: root.path().to_path_buf(),
            ..Default::default()
        });
        app.update();

        assert!(app.world.get_resource::<SpriteLibrary>().is_none());
        assert_eq!(app.world.resource::<Events<AppExit>>().len(), 1);
    }
}
