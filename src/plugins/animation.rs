use crate::components::{AnimationState, Collider, CollisionMask, JumpState, Player, Velocity};
use crate::config::GameConfig;
use crate::enums::{AnimationType, FacingDirection};
use crate::plugins::assets::SpriteLibrary;
use crate::plugins::physics::GameTick;
use bevy::prelude::*;
use std::collections::HashSet;

/// Plugin for sprite sheet selection and frame cycling
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MissingSheets>()
            .add_systems(FixedUpdate, animate_player_system.in_set(GameTick::Animate));
    }
}

/// Sheet names already reported as missing
#[derive(Resource, Debug, Default)]
pub struct MissingSheets(pub HashSet<String>);

/// Pick the animation for the player's current motion
pub fn select_animation(velocity: &Velocity, jump_state: &JumpState, gravity: f32) -> AnimationType {
    if velocity.y < 0.0 {
        match jump_state.jump_count {
            1 => AnimationType::Jump,
            2 => AnimationType::DoubleJump,
            _ => AnimationType::Idle,
        }
    } else if velocity.y > gravity * 2.0 {
        AnimationType::Fall
    } else if velocity.x != 0.0 {
        AnimationType::Run
    } else {
        AnimationType::Idle
    }
}

/// Each frame is held for `delay` ticks, then the sheet loops
pub fn frame_index(animation_count: u32, delay: u32, frames: usize) -> usize {
    (animation_count / delay.max(1)) as usize % frames.max(1)
}

/// Swap the player's texture, rectangle and mask to the current frame
#[allow(clippy::type_complexity)]
fn animate_player_system(
    config: Res<GameConfig>,
    library: Option<Res<SpriteLibrary>>,
    mut query: Query<
        (
            &Velocity,
            &JumpState,
            &FacingDirection,
            &mut AnimationState,
            &mut Collider,
            &mut CollisionMask,
            &mut Handle<Image>,
        ),
        With<Player>,
    >,
    mut missing: ResMut<MissingSheets>,
) {
    let Some(library) = library else {
        return;
    };

    for (velocity, jump_state, facing, mut animation, mut collider, mut mask, mut texture) in
        query.iter_mut()
    {
        let animation_type = select_animation(velocity, jump_state, config.gravity);
        let key = animation_type.sheet_key(*facing);

        let Some(frames) = library.frames(&key) else {
            if missing.0.insert(key.clone()) {
                warn!("No sprite sheet named {}", key);
            }
            continue;
        };

        let index = frame_index(animation.animation_count, config.animation_delay, frames.len());
        let frame = &frames[index];

        animation.current = animation_type;
        animation.frame = index;
        animation.animation_count += 1;

        // Rectangle follows the frame size; the top-left corner stays put
        let size = frame.size();
        *collider = Collider::new(size.x, size.y);
        mask.0 = frame.mask.clone();
        *texture = frame.texture.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::Mask;
    use crate::plugins::assets::SpriteFrame;

    fn frame(width: u32, height: u32) -> SpriteFrame {
        SpriteFrame {
            texture: Handle::default(),
            mask: Mask::filled(width, height),
        }
    }

    fn test_library() -> SpriteLibrary {
        let mut library = SpriteLibrary::default();
        library
            .sheets
            .insert("idle_left".to_string(), vec![frame(64, 64); 11]);
        library
            .sheets
            .insert("run_right".to_string(), vec![frame(64, 64), frame(60, 62)]);
        library
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(GameConfig::default())
            .insert_resource(test_library())
            .init_resource::<MissingSheets>()
            .add_systems(Update, animate_player_system);
        app
    }

    fn spawn_player(app: &mut App, velocity: Velocity, facing: FacingDirection, count: u32) -> Entity {
        app.world
            .spawn((
                Player,
                velocity,
                JumpState::default(),
                facing,
                AnimationState {
                    animation_count: count,
                    ..Default::default()
                },
                Collider::new(50.0, 50.0),
                CollisionMask(Mask::filled(50, 50)),
                Handle::<Image>::default(),
            ))
            .id()
    }

    #[test]
    fn test_idle_when_still() {
        let animation = select_animation(&Velocity::default(), &JumpState::default(), 1.0);
        assert_eq!(animation, AnimationType::Idle);
    }

    #[test]
    fn test_run_when_moving_horizontally() {
        let animation = select_animation(&Velocity::new(-5.0, 0.0), &JumpState::default(), 1.0);
        assert_eq!(animation, AnimationType::Run);
    }

    #[test]
    fn test_jump_and_double_jump_while_rising() {
        let rising = Velocity::new(5.0, -8.0);
        let once = JumpState {
            fall_count: 0,
            jump_count: 1,
        };
        let twice = JumpState {
            fall_count: 0,
            jump_count: 2,
        };
        assert_eq!(select_animation(&rising, &once, 1.0), AnimationType::Jump);
        assert_eq!(select_animation(&rising, &twice, 1.0), AnimationType::DoubleJump);
    }

    #[test]
    fn test_fall_only_past_twice_gravity() {
        let state = JumpState::default();
        assert_eq!(
            select_animation(&Velocity::new(5.0, 2.0), &state, 1.0),
            AnimationType::Run
        );
        assert_eq!(
            select_animation(&Velocity::new(5.0, 2.5), &state, 1.0),
            AnimationType::Fall
        );
    }

    #[test]
    fn test_frame_index_holds_each_frame_for_delay_ticks() {
        let indices: Vec<usize> = (0..8).map(|count| frame_index(count, 3, 2)).collect();
        assert_eq!(indices, vec![0, 0, 0, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_frame_index_guards_zero_values() {
        assert_eq!(frame_index(5, 0, 3), 2);
        assert_eq!(frame_index(5, 3, 0), 0);
    }

    #[test]
    fn test_system_resizes_rect_and_mask_to_frame() {
        let mut app = test_app();
        let player = spawn_player(&mut app, Velocity::new(5.0, 0.0), FacingDirection::Right, 3);

        app.update();

        let animation = app.world.get::<AnimationState>(player).unwrap();
        assert_eq!(animation.current, AnimationType::Run);
        assert_eq!(animation.frame, 1);
        assert_eq!(animation.animation_count, 4);

        assert_eq!(*app.world.get::<Collider>(player).unwrap(), Collider::new(60.0, 62.0));
        let mask = &app.world.get::<CollisionMask>(player).unwrap().0;
        assert_eq!(mask.size(), UVec2::new(60, 62));
    }

    #[test]
    fn test_missing_sheet_leaves_sprite_unchanged() {
        let mut app = test_app();
        let player = spawn_player(&mut app, Velocity::new(-5.0, 0.0), FacingDirection::Left, 3);

        app.update();

        let animation = app.world.get::<AnimationState>(player).unwrap();
        assert_eq!(animation.animation_count, 3);
        assert_eq!(*app.world.get::<Collider>(player).unwrap(), Collider::new(50.0, 50.0));
    }

    #[test]
    fn test_missing_sheet_reported_once_per_name() {
        let mut app = test_app();
        let player = spawn_player(&mut app, Velocity::new(-5.0, 0.0), FacingDirection::Left, 0);

        for _ in 0..5 {
            app.update();
        }
        let missing = &app.world.resource::<MissingSheets>().0;
        assert_eq!(missing.len(), 1);
        assert!(missing.contains("run_left"));

        // Standing still facing right needs another absent sheet
        *app.world.get_mut::<Velocity>(player).unwrap() = Velocity::default();
        *app.world.get_mut::<FacingDirection>(player).unwrap() = FacingDirection::Right;
        for _ in 0..5 {
            app.update();
        }
        let missing = &app.world.resource::<MissingSheets>().0;
        assert_eq!(missing.len(), 2);
        assert!(missing.contains("idle_right"));
    }

    #[test]
    fn test_animation_cycles_over_ticks() {
        let mut app = test_app();
        let player = spawn_player(&mut app, Velocity::default(), FacingDirection::Left, 0);

        for _ in 0..34 {
            app.update();
        }

        // 33 ticks into an 11 frame sheet at 3 ticks per frame wraps to 0
        let animation = app.world.get::<AnimationState>(player).unwrap();
        assert_eq!(animation.frame, 0);
        assert_eq!(animation.animation_count, 34);
    }
}
