use crate::components::{Collider, CollisionMask, JumpState, Object, Player, Position, Velocity};
use crate::config::GameConfig;
use crate::mask::Mask;
use crate::plugins::player::{hit_head, landed};
use bevy::prelude::*;
use std::borrow::Cow;

/// Order of the per-tick game rules
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameTick {
    Jump,
    Motion,
    Animate,
    Steer,
    Collide,
}

/// Plugin for the fixed timestep, gravity and collision resolution
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        let timestep = app
            .world
            .get_resource::<GameConfig>()
            .map(GameConfig::timestep)
            .unwrap_or(1.0 / 60.0);

        app.insert_resource(Time::<Fixed>::from_seconds(timestep))
            .configure_sets(
                FixedUpdate,
                (
                    GameTick::Jump,
                    GameTick::Motion,
                    GameTick::Animate,
                    GameTick::Steer,
                    GameTick::Collide,
                )
                    .chain(),
            )
            .add_systems(FixedUpdate, apply_motion_system.in_set(GameTick::Motion))
            .add_systems(
                FixedUpdate,
                vertical_collision_system.in_set(GameTick::Collide),
            );
    }
}

/// Something the player can collide with
#[derive(Clone, Debug)]
pub struct Obstacle<'a> {
    pub position: Position,
    pub collider: Collider,
    pub mask: Cow<'a, Mask>,
}

impl<'a> Obstacle<'a> {
    /// Objects without a mask collide as solid rectangles
    pub fn new(position: Position, collider: Collider, mask: Option<&'a CollisionMask>) -> Self {
        let mask = match mask {
            Some(CollisionMask(mask)) => Cow::Borrowed(mask),
            None => Cow::Owned(Mask::filled(
                collider.width.max(0.0) as u32,
                collider.height.max(0.0) as u32,
            )),
        };
        Self {
            position,
            collider,
            mask,
        }
    }
}

/// How a vertical collision was resolved
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalContact {
    Landed,
    HitHead,
}

/// Gravity added to the vertical velocity this tick; ramps up over a second
/// of falling and is capped at one pixel per tick.
pub fn gravity_increment(fall_count: u32, fps: u32, gravity: f32) -> f32 {
    (fall_count as f32 / fps as f32 * gravity).min(1.0)
}

pub fn masks_collide(a: &Position, a_mask: &Mask, b: &Position, b_mask: &Mask) -> bool {
    a_mask.overlaps(b_mask, b.pixel() - a.pixel())
}

/// Whether shifting the player horizontally by `dx` would overlap an obstacle
pub fn probe_horizontal(position: &Position, mask: &Mask, dx: f32, obstacles: &[Obstacle]) -> bool {
    let shifted = Position::new(position.x + dx, position.y);
    obstacles
        .iter()
        .any(|obstacle| masks_collide(&shifted, mask, &obstacle.position, &obstacle.mask))
}

/// Snap the player out of every obstacle it overlaps while moving by `dy`:
/// onto the top of it when falling, under it when rising.
pub fn resolve_vertical(
    position: &mut Position,
    collider: &Collider,
    mask: &Mask,
    dy: f32,
    obstacles: &[Obstacle],
) -> Vec<(usize, VerticalContact)> {
    let mut contacts = Vec::new();

    for (index, obstacle) in obstacles.iter().enumerate() {
        if !masks_collide(position, mask, &obstacle.position, &obstacle.mask) {
            continue;
        }

        if dy > 0.0 {
            position.y = obstacle.position.y - collider.height;
            contacts.push((index, VerticalContact::Landed));
        } else if dy < 0.0 {
            position.y = obstacle.position.y + obstacle.collider.height;
            contacts.push((index, VerticalContact::HitHead));
        }
    }

    contacts
}

/// Apply gravity, then move the player by its velocity
fn apply_motion_system(
    config: Res<GameConfig>,
    mut query: Query<(&mut Position, &mut Velocity, &mut JumpState), With<Player>>,
) {
    for (mut position, mut velocity, mut jump_state) in query.iter_mut() {
        velocity.y += gravity_increment(jump_state.fall_count, config.fps, config.gravity);
        position.move_by(velocity.x, velocity.y);
        jump_state.fall_count += 1;
    }
}

/// Land on or bump into objects the player overlaps after moving
#[allow(clippy::type_complexity)]
fn vertical_collision_system(
    mut player_query: Query<
        (
            &mut Position,
            &Collider,
            &CollisionMask,
            &mut Velocity,
            &mut JumpState,
        ),
        With<Player>,
    >,
    object_query: Query<(&Position, &Collider, Option<&CollisionMask>), (With<Object>, Without<Player>)>,
) {
    let obstacles: Vec<Obstacle> = object_query
        .iter()
        .map(|(position, collider, mask)| Obstacle::new(*position, *collider, mask))
        .collect();

    for (mut position, collider, mask, mut velocity, mut jump_state) in player_query.iter_mut() {
        let dy = velocity.y;
        let contacts = resolve_vertical(&mut position, collider, &mask.0, dy, &obstacles);

        for (_, contact) in contacts {
            match contact {
                VerticalContact::Landed => landed(&mut velocity, &mut jump_state),
                VerticalContact::HitHead => hit_head(&mut velocity, &mut jump_state),
            }
        }
    }
}
