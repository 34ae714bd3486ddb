use crate::enums::AnimationType;
use crate::mask::Mask;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Position component - top-left corner in level pixels, y grows downward
#[derive(Component, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Move and drop the fraction; rectangles live on whole pixels
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.x = (self.x + dx).trunc();
        self.y = (self.y + dy).trunc();
    }

    /// Whole-pixel corner used for mask offsets
    pub fn pixel(&self) -> IVec2 {
        IVec2::new(self.x.floor() as i32, self.y.floor() as i32)
    }
}

/// Velocity component - pixels per tick
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Collider component - size of the entity's rectangle
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    pub width: f32,
    pub height: f32,
}

impl Collider {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Fall and jump counters driving gravity and double jumps
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct JumpState {
    /// Ticks since the player last landed or started a jump
    pub fall_count: u32,
    /// Jumps taken since the player last landed
    pub jump_count: u32,
}

/// Animation state - current sheet and tick counter
#[derive(Component, Clone, Debug, PartialEq, Default)]
pub struct AnimationState {
    pub current: AnimationType,
    pub animation_count: u32,
    pub frame: usize,
}

/// Per-pixel collision mask of the entity's current image
#[derive(Component, Clone, Debug, PartialEq)]
pub struct CollisionMask(pub Mask);

/// Player marker component
#[derive(Component)]
pub struct Player;

/// Player intent component - captures player input
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct PlayerIntent {
    pub move_left: bool,
    pub move_right: bool,
    /// Latched on key press, consumed by the next fixed tick
    pub jump_requested: bool,
}

/// Static level object
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Object {
    pub name: String,
}

impl Object {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Marker for terrain blocks
#[derive(Component)]
pub struct Block;

/// Background tile, fixed on screen at `offset` from the view's top-left
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct BackgroundTile {
    pub offset: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(100.0, 200.0);
        assert_eq!(pos.x, 100.0);
        assert_eq!(pos.y, 200.0);
    }

    #[test]
    fn test_position_move_by() {
        let mut pos = Position::new(100.0, 100.0);
        pos.move_by(-5.0, 3.0);
        assert_eq!(pos, Position::new(95.0, 103.0));
    }

    #[test]
    fn test_position_move_by_truncates_to_whole_pixels() {
        let mut pos = Position::new(100.0, 454.0);
        pos.move_by(0.0, 0.95);
        assert_eq!(pos, Position::new(100.0, 454.0));

        pos.move_by(0.0, -7.5);
        assert_eq!(pos, Position::new(100.0, 446.0));
    }

    #[test]
    fn test_position_pixel_floors() {
        assert_eq!(Position::new(10.7, -0.5).pixel(), IVec2::new(10, -1));
    }

    #[test]
    fn test_velocity_default() {
        let vel = Velocity::default();
        assert_eq!(vel.x, 0.0);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_jump_state_default() {
        let state = JumpState::default();
        assert_eq!(state.fall_count, 0);
        assert_eq!(state.jump_count, 0);
    }

    #[test]
    fn test_collider_creation() {
        let collider = Collider::new(32.0, 64.0);
        assert_eq!(collider.width, 32.0);
        assert_eq!(collider.height, 64.0);
    }

    #[test]
    fn test_object_name() {
        assert_eq!(Object::new("block").name, "block");
    }
}
