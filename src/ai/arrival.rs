//! Arrival field.
//!
//! For every live piece, the number of ticks it needs to reach each square with a single move of
//! its pattern, counting any cooldown or flight it still has to finish first. Blocking is ignored,
//! so the estimate is optimistic and costs O(pieces x squares).

use std::collections::BTreeMap;

use crate::game::state::GameState;
use crate::game::types::{PieceId, PieceType, PlayerId, Square};

/// Marks squares a piece cannot reach in one move.
pub const UNREACHABLE: u32 = u32::MAX;

#[derive(Debug, Clone)]
pub struct ArrivalField {
    /// Tick the field was computed for; all times are relative to it.
    pub tick: u64,
    width: i32,
    per_piece: BTreeMap<PieceId, (PlayerId, Vec<u32>)>,
}

fn to_u32(ticks: u64) -> u32 {
    u32::try_from(ticks).unwrap_or(UNREACHABLE - 1)
}

impl ArrivalField {
    pub fn compute(state: &GameState, tick: u64) -> Self {
        let board = &state.board;
        let tps = state.speed.ticks_per_square();
        let cooldown = state.speed.cooldown_ticks();

        let mut per_piece = BTreeMap::new();
        for piece in state.live_pieces().filter(|p| state.is_player_active(p.owner)) {
            // Where the piece will stand, and when it will be free to move from there.
            let (origin, delay) = match state.moves.get(&piece.id) {
                Some(mv) => (mv.destination(), mv.completion_tick.saturating_sub(tick) + cooldown),
                None => {
                    let expiry = state.cooldowns.get(&piece.id).copied().unwrap_or(0);
                    (piece.square, expiry.saturating_sub(tick))
                }
            };
            let mut virtual_piece = piece.clone();
            virtual_piece.square = origin;
            virtual_piece.moved |= origin != piece.square;

            let mut grid = vec![UNREACHABLE; (board.width * board.height) as usize];
            grid[board.index(origin)] = to_u32(delay);
            for target in board.reachable_squares(&virtual_piece) {
                let steps = match piece.piece_type {
                    PieceType::Knight => 2,
                    _ => origin.chebyshev(target) as u64,
                };
                let idx = board.index(target);
                grid[idx] = grid[idx].min(to_u32(delay + steps * tps));
            }
            per_piece.insert(piece.id, (piece.owner, grid));
        }

        Self { tick, width: board.width, per_piece }
    }

    fn index(&self, square: Square) -> Option<usize> {
        if square.row < 0 || square.col < 0 || square.col >= self.width {
            return None;
        }
        Some((square.row * self.width + square.col) as usize)
    }

    /// Ticks for one piece to reach `square`, or `UNREACHABLE`.
    pub fn piece_time(&self, piece_id: PieceId, square: Square) -> u32 {
        let Some(idx) = self.index(square) else {
            return UNREACHABLE;
        };
        self.per_piece
            .get(&piece_id)
            .and_then(|(_, grid)| grid.get(idx).copied())
            .unwrap_or(UNREACHABLE)
    }

    fn min_time(&self, square: Square, keep: impl Fn(PieceId, PlayerId) -> bool) -> u32 {
        self.per_piece
            .iter()
            .filter(|(id, (owner, _))| keep(**id, *owner))
            .map(|(id, _)| self.piece_time(*id, square))
            .min()
            .unwrap_or(UNREACHABLE)
    }

    /// Fastest arrival of any of `player`'s pieces, optionally leaving one out.
    pub fn player_time(&self, player: PlayerId, square: Square, exclude: Option<PieceId>) -> u32 {
        self.min_time(square, |id, owner| owner == player && Some(id) != exclude)
    }

    /// Fastest arrival of any opponent of `player`, optionally leaving one piece out
    /// (typically the piece about to be captured).
    pub fn enemy_time(&self, player: PlayerId, square: Square, exclude: Option<PieceId>) -> u32 {
        self.min_time(square, |id, owner| owner != player && Some(id) != exclude)
    }

    pub fn piece_count(&self) -> usize {
        self.per_piece.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::game::GameConfig;
    use crate::config::speed::SpeedConfig;
    use crate::game::types::BoardType;

    const ROOK_ONLY: &str = "
        ....k...
        ........
        ........
        ...R....
        ........
        ........
        ........
        K.......";

    fn rook_state(speed: SpeedConfig) -> GameState {
        let config = GameConfig::new(BoardType::Standard, speed).with_layout(ROOK_ONLY);
        let mut state = GameState::new(&config).expect("valid layout");
        state.start().expect("start");
        state
    }

    #[test]
    fn test_rook_arrival_on_empty_board() {
        let state = rook_state(SpeedConfig::Standard);
        let rook = state.resting_piece_at(Square::new(3, 3)).unwrap().id;
        let field = ArrivalField::compute(&state, state.tick);
        assert_eq!(field.piece_time(rook, Square::new(3, 3)), 0);
        assert_eq!(field.piece_time(rook, Square::new(3, 7)), 40);
        assert_eq!(field.piece_time(rook, Square::new(0, 3)), 30);
        assert_eq!(field.piece_time(rook, Square::new(4, 4)), UNREACHABLE);
        assert_eq!(field.piece_time(rook, Square::new(0, 0)), UNREACHABLE);
    }

    #[test]
    fn test_cooldown_delays_arrival() {
        let mut state = rook_state(SpeedConfig::Lightning);
        let rook = state.resting_piece_at(Square::new(3, 3)).unwrap().id;
        state.cooldowns.insert(rook, 15);
        let field = ArrivalField::compute(&state, 5);
        assert_eq!(field.piece_time(rook, Square::new(3, 5)), 10 + 2 * 2);
    }

    #[test]
    fn test_moving_piece_measured_from_destination() {
        let mut state = rook_state(SpeedConfig::Standard);
        let rook = state.resting_piece_at(Square::new(3, 3)).unwrap().id;
        state.submit_move(1, rook, Square::new(3, 6)).expect("legal move");
        let field = ArrivalField::compute(&state, state.tick);
        // 30 ticks of flight + 100 cooldown + 2 squares.
        assert_eq!(field.piece_time(rook, Square::new(5, 6)), 30 + 100 + 20);
        assert_eq!(field.piece_time(rook, Square::new(3, 3)), 30 + 100 + 30);
    }

    #[test]
    fn test_player_aggregates() {
        let state = rook_state(SpeedConfig::Standard);
        let field = ArrivalField::compute(&state, state.tick);
        assert_eq!(field.piece_count(), 3);
        assert_eq!(field.player_time(1, Square::new(3, 0), None), 30);
        // Black king is one step away from (1, 4).
        assert_eq!(field.enemy_time(1, Square::new(1, 4), None), 10);
        assert_eq!(field.enemy_time(2, Square::new(1, 4), None), UNREACHABLE);
    }
}
