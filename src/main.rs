use bevy::prelude::*;
use bevy::window::WindowResolution;
use ninja_frog::config::{ConfigError, GameConfig};
use ninja_frog::plugins::{
    AnimationPlugin, CameraPlugin, GameAssetsPlugin, LevelPlugin, PhysicsPlugin, PlayerPlugin,
};

const CONFIG_PATH: &str = "config.json";

fn main() -> Result<(), ConfigError> {
    let config = GameConfig::load(CONFIG_PATH)?;

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: config.title.clone(),
                        resolution: WindowResolution::new(
                            config.width as f32,
                            config.height as f32,
                        ),
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Physics reads the tick rate from the config while building
        .insert_resource(config)
        .add_plugins(GameAssetsPlugin)
        .add_plugins(LevelPlugin)
        .add_plugins(PlayerPlugin)
        .add_plugins(PhysicsPlugin)
        .add_plugins(AnimationPlugin)
        .add_plugins(CameraPlugin)
        .run();

    Ok(())
}
