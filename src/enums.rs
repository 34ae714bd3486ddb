use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Facing direction - which way the player sprite looks
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FacingDirection {
    #[default]
    Left,
    Right,
}

impl FacingDirection {
    /// Suffix used for direction-specific sprite sheet names
    pub fn suffix(self) -> &'static str {
        match self {
            FacingDirection::Left => "left",
            FacingDirection::Right => "right",
        }
    }
}

/// Animation type - one sprite sheet per animation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum AnimationType {
    #[default]
    Idle,
    Run,
    Jump,
    DoubleJump,
    Fall,
}

impl AnimationType {
    /// Sprite sheet file stem for this animation
    pub fn sheet_name(self) -> &'static str {
        match self {
            AnimationType::Idle => "idle",
            AnimationType::Run => "run",
            AnimationType::Jump => "jump",
            AnimationType::DoubleJump => "double_jump",
            AnimationType::Fall => "fall",
        }
    }

    /// Full sheet key, e.g. `run_left`
    pub fn sheet_key(self, facing: FacingDirection) -> String {
        format!("{}_{}", self.sheet_name(), facing.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_key_combines_name_and_direction() {
        assert_eq!(
            AnimationType::DoubleJump.sheet_key(FacingDirection::Right),
            "double_jump_right"
        );
        assert_eq!(AnimationType::Idle.sheet_key(FacingDirection::Left), "idle_left");
    }

    #[test]
    fn test_player_faces_left_by_default() {
        assert_eq!(FacingDirection::default(), FacingDirection::Left);
    }
}
