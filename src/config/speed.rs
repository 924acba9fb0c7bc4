/// Speed presets.
///
/// A preset is chosen once per game and fixes the tick length, how many ticks a piece
/// needs per square travelled, and the cooldown installed after each move.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedConfig {
    Standard,
    Lightning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedTimings {
    /// Wall-clock length of one tick, used only by the session driver.
    pub tick_ms: u64,
    pub ticks_per_square: u64,
    pub cooldown_ticks: u64,
}

const STANDARD: SpeedTimings = SpeedTimings {
    tick_ms: 100,
    ticks_per_square: 10,
    cooldown_ticks: 100,
};

const LIGHTNING: SpeedTimings = SpeedTimings {
    tick_ms: 100,
    ticks_per_square: 2,
    cooldown_ticks: 20,
};

impl SpeedConfig {
    pub const fn timings(self) -> SpeedTimings {
        match self {
            SpeedConfig::Standard => STANDARD,
            SpeedConfig::Lightning => LIGHTNING,
        }
    }

    pub const fn ticks_per_square(self) -> u64 {
        self.timings().ticks_per_square
    }

    pub const fn cooldown_ticks(self) -> u64 {
        self.timings().cooldown_ticks
    }

    pub const fn tick_ms(self) -> u64 {
        self.timings().tick_ms
    }
}
