/// Main configuration module.
///
/// Re-exports submodules for board geometry, speed presets and AI tuning.
/// Nothing here is global mutable state: every game receives its own [`GameConfig`].
pub mod game;
pub mod speed;
pub mod ai;

pub use game::GameConfig;
pub use speed::{SpeedConfig, SpeedTimings};
