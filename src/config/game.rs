/// Game configuration constants.
///
/// This module defines board geometry, the fixed-point scale used for continuous positions
/// and the collision threshold, plus the per-game [`GameConfig`] value.
use serde::{Deserialize, Serialize};

use crate::config::speed::SpeedConfig;
use crate::game::error::ConfigError;
use crate::game::types::BoardType;

/// Fixed-point units per board square. Positions are integers in these units.
pub const FIXED_ONE: i64 = 1000;

/// Distance (in fixed units) at or below which two pieces collide. 0.4 square.
pub const CAPTURE_DISTANCE: i64 = 400;

/// Collision samples evaluated inside each tick.
pub const SUBSTEPS_PER_TICK: u64 = 10;

/// Side length of the two-player board.
pub const STANDARD_SIZE: i32 = 8;

/// Side length of the four-player board (2x2 corners removed).
pub const FOUR_PLAYER_SIZE: i32 = 12;

/// Side length of each removed corner on the four-player board.
pub const FOUR_PLAYER_CORNER: i32 = 2;

/// Everything a collaborator chooses when creating a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub board_type: BoardType,
    pub speed: SpeedConfig,
    /// Legacy one-character-per-square layout for scripted levels.
    #[serde(default)]
    pub layout: Option<String>,
}

impl GameConfig {
    pub fn new(board_type: BoardType, speed: SpeedConfig) -> Self {
        Self { board_type, speed, layout: None }
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    /// Parse a config sent by the lobby layer, e.g.
    /// `{"board_type":"Standard","speed":"Lightning"}`.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}
