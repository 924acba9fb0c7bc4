//! AI players.
//!
//! Every AI exposes the same two-call capability: decide whether to act this tick, then pick a
//! move. The session driver offers each AI the current state every tick and submits whatever
//! it returns exactly like a human submission.

pub mod arrival;
pub mod heuristic;
pub mod random;
pub mod tactics;

use serde::{Deserialize, Serialize};

use crate::config::speed::SpeedConfig;
use crate::game::state::{GameState, MoveCommand};
use crate::game::types::PlayerId;

pub use heuristic::HeuristicAi;
pub use random::RandomAi;

pub trait AiPlayer {
    /// Rate limiting: whether the AI wants to act at `tick`. Never touches the game.
    fn should_move(&mut self, state: &GameState, player: PlayerId, tick: u64) -> bool;

    /// The move to submit, or `None` when nothing is legal.
    fn get_move(&mut self, state: &GameState, player: PlayerId) -> Option<MoveCommand>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiKind {
    Heuristic { level: u8 },
    Random,
}

/// Build an AI. The seed makes its decisions reproducible.
pub fn create_ai(kind: AiKind, speed: SpeedConfig, seed: u64) -> Box<dyn AiPlayer> {
    match kind {
        AiKind::Heuristic { level } => Box::new(HeuristicAi::new(level, speed, seed)),
        AiKind::Random => Box::new(RandomAi::new(seed)),
    }
}
