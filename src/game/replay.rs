//! Replay reconstruction.
//!
//! A finished game is fully described by its config and its `ReplayMove` log; feeding the log
//! back through the engine at the recorded ticks reproduces the same events and final state.
//! Only accepted moves are logged, so a replay carries no `MoveRejected` events; every other
//! event matches the live stream.

use log::warn;

use crate::config::game::GameConfig;
use crate::game::error::ConfigError;
use crate::game::events::{GameEvent, ReplayMove};
use crate::game::state::GameState;

/// Rebuild a game from its move log, stopping at `until_tick` or when the game ends.
pub fn simulate(
    config: &GameConfig,
    moves: &[ReplayMove],
    until_tick: u64,
) -> Result<(GameState, Vec<GameEvent>), ConfigError> {
    let mut state = GameState::new(config)?;
    let mut events: Vec<GameEvent> = state.start().into_iter().collect();
    let mut log = moves.iter().peekable();

    while state.tick < until_tick && !state.is_finished() {
        while let Some(replay) = log.next_if(|m| m.tick <= state.tick) {
            match state.submit_move(replay.player, replay.piece_id, replay.to) {
                Ok(event) => events.push(event),
                Err(error) => warn!("[Replay] Move {:?} no longer applies: {}", replay, error),
            }
        }
        events.extend(state.advance_tick());
    }
    Ok((state, events))
}
