use crate::components::{BackgroundTile, Collider, Player, Position, Velocity};
use crate::config::GameConfig;
use crate::plugins::assets::BackgroundTexture;
use crate::plugins::physics::GameTick;
use bevy::prelude::*;
use bevy::transform::TransformSystem;

/// Draw order of the background, behind everything else
pub const BACKGROUND_Z: f32 = -1.0;

/// Horizontal distance the view has scrolled from the level origin
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollOffset(pub f32);

/// Camera plugin - scrolling view and world-to-screen placement
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScrollOffset>()
            .add_systems(Startup, (setup_camera, spawn_background))
            .add_systems(FixedUpdate, update_scroll_system.after(GameTick::Collide))
            .add_systems(
                PostUpdate,
                (
                    camera_follow_system,
                    sync_transforms_system,
                    background_follow_system,
                )
                    .before(TransformSystem::TransformPropagate),
            );
    }
}

/// Camera marker component
#[derive(Component)]
pub struct GameCamera;

/// New scroll offset after the player moves. The view scrolls along with
/// the player while it is heading into the scroll area at either screen edge.
pub fn scroll_step(
    offset: f32,
    player_left: f32,
    player_right: f32,
    x_vel: f32,
    screen_width: f32,
    scroll_area_width: f32,
) -> f32 {
    let near_right = player_right - offset >= screen_width - scroll_area_width && x_vel > 0.0;
    let near_left = player_left - offset <= scroll_area_width && x_vel < 0.0;

    if near_right || near_left {
        offset + x_vel
    } else {
        offset
    }
}

/// Centre of a top-left, y-down rectangle in bevy's y-up world space
pub fn world_to_screen(position: &Position, size: Vec2) -> Vec2 {
    Vec2::new(position.x + size.x / 2.0, -(position.y + size.y / 2.0))
}

/// Camera translation that shows the window starting at `offset`
pub fn camera_center(offset: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(offset + width / 2.0, -height / 2.0)
}

fn setup_camera(mut commands: Commands, config: Res<GameConfig>) {
    let center = camera_center(0.0, config.width as f32, config.height as f32);
    let mut camera = Camera2dBundle::default();
    camera.transform.translation.x = center.x;
    camera.transform.translation.y = center.y;
    commands.spawn((camera, GameCamera));
}

/// Lay the background tiles over the window
fn spawn_background(mut commands: Commands, background: Option<Res<BackgroundTexture>>) {
    let Some(background) = background else {
        return;
    };

    for tile in &background.tiles {
        let offset = tile.as_vec2();
        let center = world_to_screen(&Position::new(offset.x, offset.y), background.size);
        commands.spawn((
            BackgroundTile { offset },
            SpriteBundle {
                texture: background.texture.clone(),
                transform: Transform::from_xyz(center.x, center.y, BACKGROUND_Z),
                ..default()
            },
        ));
    }
}

fn update_scroll_system(
    config: Res<GameConfig>,
    mut scroll: ResMut<ScrollOffset>,
    player_query: Query<(&Position, &Collider, &Velocity), With<Player>>,
) {
    let Ok((position, collider, velocity)) = player_query.get_single() else {
        return;
    };

    scroll.0 = scroll_step(
        scroll.0,
        position.x,
        position.x + collider.width,
        velocity.x,
        config.width as f32,
        config.scroll_area_width,
    );
}

fn camera_follow_system(
    config: Res<GameConfig>,
    scroll: Res<ScrollOffset>,
    mut camera_query: Query<&mut Transform, With<GameCamera>>,
) {
    let center = camera_center(scroll.0, config.width as f32, config.height as f32);
    for mut transform in camera_query.iter_mut() {
        transform.translation.x = center.x;
        transform.translation.y = center.y;
    }
}

/// Place sprites of positioned entities; depth is left untouched
fn sync_transforms_system(mut query: Query<(&Position, &Collider, &mut Transform)>) {
    for (position, collider, mut transform) in query.iter_mut() {
        let center = world_to_screen(position, Vec2::new(collider.width, collider.height));
        transform.translation.x = center.x;
        transform.translation.y = center.y;
    }
}

/// Keep background tiles fixed on screen while the view scrolls
fn background_follow_system(
    scroll: Res<ScrollOffset>,
    background: Option<Res<BackgroundTexture>>,
    mut tile_query: Query<(&BackgroundTile, &mut Transform)>,
) {
    let Some(background) = background else {
        return;
    };

    for (tile, mut transform) in tile_query.iter_mut() {
        let position = Position::new(scroll.0 + tile.offset.x, tile.offset.y);
        let center = world_to_screen(&position, background.size);
        transform.translation.x = center.x;
        transform.translation.y = center.y;
    }
}
