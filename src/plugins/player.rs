use crate::components::{
    AnimationState, Collider, CollisionMask, JumpState, Object, Player, PlayerIntent, Position,
    Velocity,
};
use crate::config::GameConfig;
use crate::enums::{AnimationType, FacingDirection};
use crate::mask::Mask;
use crate::plugins::assets::SpriteLibrary;
use crate::plugins::level::CurrentLevel;
use crate::plugins::physics::{probe_horizontal, GameTick, Obstacle};
use bevy::prelude::*;

/// Draw order of the player above terrain
pub const PLAYER_Z: f32 = 1.0;

/// Plugin for player input, spawning and movement rules
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_player)
            .add_systems(Update, process_input_system)
            .add_systems(FixedUpdate, apply_jump_system.in_set(GameTick::Jump))
            .add_systems(FixedUpdate, steer_system.in_set(GameTick::Steer));
    }
}

/// Set leftward velocity; turning around restarts the animation
pub fn move_left(
    velocity: &mut Velocity,
    facing: &mut FacingDirection,
    animation: &mut AnimationState,
    speed: f32,
) {
    velocity.x = -speed;
    if *facing != FacingDirection::Left {
        *facing = FacingDirection::Left;
        animation.animation_count = 0;
    }
}

/// Set rightward velocity; turning around restarts the animation
pub fn move_right(
    velocity: &mut Velocity,
    facing: &mut FacingDirection,
    animation: &mut AnimationState,
    speed: f32,
) {
    velocity.x = speed;
    if *facing != FacingDirection::Right {
        *facing = FacingDirection::Right;
        animation.animation_count = 0;
    }
}

/// Launch upward at a constant velocity. Gravity restarts its ramp on the
/// first jump only, so a double jump keeps the accumulated fall.
pub fn jump(
    velocity: &mut Velocity,
    jump_state: &mut JumpState,
    animation: &mut AnimationState,
    gravity: f32,
    strength: f32,
) {
    velocity.y = -gravity * strength;
    animation.animation_count = 0;
    jump_state.jump_count += 1;
    if jump_state.jump_count == 1 {
        jump_state.fall_count = 0;
    }
}

pub fn landed(velocity: &mut Velocity, jump_state: &mut JumpState) {
    jump_state.fall_count = 0;
    jump_state.jump_count = 0;
    velocity.y = 0.0;
}

/// Bounce off a ceiling
pub fn hit_head(velocity: &mut Velocity, jump_state: &mut JumpState) {
    jump_state.fall_count = 0;
    velocity.y = -velocity.y;
}

/// Spawn the player at the level's spawn point
fn spawn_player(
    mut commands: Commands,
    config: Res<GameConfig>,
    level: Option<Res<CurrentLevel>>,
    library: Option<Res<SpriteLibrary>>,
) {
    let (x, y) = level
        .as_deref()
        .map(|level| (level.level_data.spawn_point.x, level.level_data.spawn_point.y))
        .unwrap_or(config.player_start);
    let (width, height) = config.player_size;
    let facing = FacingDirection::default();

    let texture = library
        .as_deref()
        .and_then(|library| library.frames(&AnimationType::Idle.sheet_key(facing)))
        .map(|frames| frames[0].texture.clone())
        .unwrap_or_default();

    commands.spawn((
        Player,
        Position::new(x, y),
        Collider::new(width, height),
        Velocity::default(),
        JumpState::default(),
        AnimationState::default(),
        facing,
        PlayerIntent::default(),
        CollisionMask(Mask::filled(width as u32, height as u32)),
        SpriteBundle {
            texture,
            transform: Transform::from_xyz(0.0, 0.0, PLAYER_Z),
            ..default()
        },
    ));

    info!("Player spawned at ({}, {})", x, y);
}

/// Sample arrow keys every frame and latch space presses
fn process_input_system(
    keyboard: Res<Input<KeyCode>>,
    mut query: Query<&mut PlayerIntent, With<Player>>,
) {
    for mut intent in query.iter_mut() {
        intent.move_left = keyboard.pressed(KeyCode::Left);
        intent.move_right = keyboard.pressed(KeyCode::Right);
        if keyboard.just_pressed(KeyCode::Space) {
            intent.jump_requested = true;
        }
    }
}

/// Consume a latched jump request while jumps remain
fn apply_jump_system(
    config: Res<GameConfig>,
    mut query: Query<
        (
            &mut PlayerIntent,
            &mut Velocity,
            &mut JumpState,
            &mut AnimationState,
        ),
        With<Player>,
    >,
) {
    for (mut intent, mut velocity, mut jump_state, mut animation) in query.iter_mut() {
        if !intent.jump_requested {
            continue;
        }
        intent.jump_requested = false;

        if jump_state.jump_count < config.max_jumps {
            jump(
                &mut velocity,
                &mut jump_state,
                &mut animation,
                config.gravity,
                config.jump_strength,
            );
        }
    }
}

/// Turn held arrow keys into horizontal velocity unless an object is in the way
#[allow(clippy::type_complexity)]
fn steer_system(
    config: Res<GameConfig>,
    mut player_query: Query<
        (
            &Position,
            &CollisionMask,
            &PlayerIntent,
            &mut Velocity,
            &mut FacingDirection,
            &mut AnimationState,
        ),
        With<Player>,
    >,
    object_query: Query<(&Position, &Collider, Option<&CollisionMask>), (With<Object>, Without<Player>)>,
) {
    let obstacles: Vec<Obstacle> = object_query
        .iter()
        .map(|(position, collider, mask)| Obstacle::new(*position, *collider, mask))
        .collect();
    let probe = config.player_velocity * 2.0;

    for (position, mask, intent, mut velocity, mut facing, mut animation) in
        player_query.iter_mut()
    {
        velocity.x = 0.0;

        let blocked_left = probe_horizontal(position, &mask.0, -probe, &obstacles);
        let blocked_right = probe_horizontal(position, &mask.0, probe, &obstacles);

        if intent.move_left && !blocked_left {
            move_left(
                &mut velocity,
                &mut facing,
                &mut animation,
                config.player_velocity,
            );
        }
        if intent.move_right && !blocked_right {
            move_right(
                &mut velocity,
                &mut facing,
                &mut animation,
                config.player_velocity,
            );
        }
    }
}
