pub mod assets;
pub mod components;
pub mod config;
pub mod enums;
pub mod level;
pub mod mask;
pub mod plugins;

pub use components::*;
pub use config::GameConfig;
pub use enums::*;
