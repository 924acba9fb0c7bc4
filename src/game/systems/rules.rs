//! End-of-tick rules: promotion, player elimination and the terminal condition.

use log::info;

use crate::game::events::{GameEvent, GameEventType};
use crate::game::state::{EndReason, GameState, GameStatus};
use crate::game::types::{PieceId, PieceType, PlayerId};

/// Promote a pawn that has just come to rest on its promotion edge.
pub fn apply_promotion(state: &mut GameState, piece_id: PieceId) -> Option<GameEvent> {
    let piece = state.pieces.get(piece_id as usize)?;
    if piece.piece_type != PieceType::Pawn || !state.board.is_promotion_square(piece.owner, piece.square) {
        return None;
    }
    state.pieces[piece_id as usize].piece_type = PieceType::Queen;
    Some(GameEvent::new(
        state.tick,
        GameEventType::Promotion { piece_id, piece_type: PieceType::Queen },
    ))
}

fn has_live_king(state: &GameState, player: PlayerId) -> bool {
    state
        .live_pieces()
        .any(|p| p.owner == player && p.piece_type == PieceType::King)
}

/// Mark a player as eliminated and take their remaining pieces off the board.
pub fn eliminate_player(state: &mut GameState, player: PlayerId) -> Option<GameEvent> {
    let slot = state.players.iter_mut().find(|p| p.id == player && !p.eliminated)?;
    slot.eliminated = true;

    let remaining: Vec<PieceId> = state
        .live_pieces()
        .filter(|p| p.owner == player)
        .map(|p| p.id)
        .collect();
    for id in remaining {
        let square = state.pieces[id as usize].square;
        state.moves.remove(&id);
        state.board.remove(square, id);
        state.pieces[id as usize].captured = true;
    }
    info!("[Engine] Player {} eliminated at tick {}", player, state.tick);
    Some(GameEvent::new(state.tick, GameEventType::PlayerEliminated { player }))
}

/// Eliminate every player whose king is gone.
pub fn eliminate_kingless_players(state: &mut GameState) -> Vec<GameEvent> {
    let kingless: Vec<PlayerId> = state
        .active_players()
        .filter(|player| !has_live_king(state, *player))
        .collect();
    kingless
        .into_iter()
        .filter_map(|player| eliminate_player(state, player))
        .collect()
}

/// Finish the game when at most one player is left standing.
pub fn check_game_over(state: &mut GameState, reason: EndReason) -> Option<GameEvent> {
    if state.is_finished() {
        return None;
    }
    let remaining: Vec<PlayerId> = state.active_players().collect();
    let (winner, reason) = match remaining.as_slice() {
        [] => (None, EndReason::Draw),
        [winner] => (Some(*winner), reason),
        _ => return None,
    };
    Some(finish(state, winner, reason))
}

/// Move to `Finished`. Pending submissions are dropped; nothing mutates the game afterwards.
pub fn finish(state: &mut GameState, winner: Option<PlayerId>, reason: EndReason) -> GameEvent {
    state.status = GameStatus::Finished { winner, reason };
    state.pending.clear();
    info!("[Engine] Game over at tick {}: winner={:?} reason={:?}", state.tick, winner, reason);
    GameEvent::new(state.tick, GameEventType::GameOver { winner, reason })
}
