//! Move and path computation.
//!
//! Validates a destination against a piece's movement pattern and produces the ordered list of
//! squares it travels through. Resting pieces block slides; moving pieces occupy neither their
//! origin nor their destination, so they never block.

use crate::config::speed::SpeedConfig;
use crate::game::error::MoveError;
use crate::game::state::GameState;
use crate::game::systems::collision::{is_piece_moving, is_piece_on_cooldown};
use crate::game::types::{Pattern, Piece, PieceId, PieceType, Square};

/// The rook half of a castling move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastleMove {
    pub rook_id: PieceId,
    pub rook_path: Vec<Square>,
}

/// A validated move, ready to be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub path: Vec<Square>,
    pub castle: Option<CastleMove>,
}

fn illegal(reason: impl Into<String>) -> MoveError {
    MoveError::IllegalMove(reason.into())
}

/// Unit step from `from` toward `to` when they share a line or diagonal.
fn line_direction(from: Square, to: Square) -> Option<(i32, i32)> {
    let dr = to.row - from.row;
    let dc = to.col - from.col;
    if (dr == 0) == (dc == 0) && dr.abs() != dc.abs() {
        return None;
    }
    Some((dr.signum(), dc.signum()))
}

/// Squares from `from` to `to` inclusive, walking one unit step at a time.
fn straight_path(from: Square, to: Square, (dr, dc): (i32, i32)) -> Vec<Square> {
    let steps = from.chebyshev(to);
    (0..=steps).map(|n| from.offset(dr * n, dc * n)).collect()
}

fn is_blocked(state: &GameState, path: &[Square]) -> bool {
    path.len() > 2 && path[1..path.len() - 1].iter().any(|sq| state.board.occupant(*sq).is_some())
}

/// True when a friendly in-flight move already targets `square`.
fn is_reserved(state: &GameState, piece: &Piece, square: Square) -> bool {
    state
        .moves
        .values()
        .any(|m| m.player == piece.owner && m.piece_id != piece.id && m.destination() == square)
}

/// Validate `destination` for `piece` and return the squares it will travel through,
/// origin first. Knight paths are the two endpoints of the jump.
pub fn compute_move_path(state: &GameState, piece: &Piece, destination: Square) -> Result<Vec<Square>, MoveError> {
    let origin = piece.square;
    if destination == origin {
        return Err(illegal("destination is the current square"));
    }
    if !state.board.in_bounds(destination) {
        return Err(illegal(format!("{destination} is off the board")));
    }
    let target = state.resting_piece_at(destination);
    if target.is_some_and(|t| t.owner == piece.owner) {
        return Err(illegal(format!("{destination} holds a friendly piece")));
    }
    if is_reserved(state, piece, destination) {
        return Err(illegal(format!("{destination} is the target of a friendly move")));
    }

    let d_row = destination.row - origin.row;
    let d_col = destination.col - origin.col;
    match piece.piece_type.rule().pattern {
        Pattern::Slide(dirs) => {
            let dir = line_direction(origin, destination)
                .filter(|dir| dirs.contains(dir))
                .ok_or_else(|| illegal(format!("{destination} is off the movement pattern")))?;
            let path = straight_path(origin, destination, dir);
            if is_blocked(state, &path) {
                return Err(illegal("path is blocked"));
            }
            Ok(path)
        }
        Pattern::Leap(deltas) => {
            if deltas.contains(&(d_row, d_col)) {
                Ok(vec![origin, destination])
            } else {
                Err(illegal(format!("{destination} is off the movement pattern")))
            }
        }
        Pattern::Pawn => {
            let (fr, fc) = state.board_type().forward(piece.owner);
            let one = origin.offset(fr, fc);
            let two = origin.offset(2 * fr, 2 * fc);
            let diagonal = [origin.offset(fr + fc, fc + fr), origin.offset(fr - fc, fc - fr)];
            if destination == one && target.is_none() {
                Ok(vec![origin, one])
            } else if destination == two
                && !piece.moved
                && target.is_none()
                && state.board.occupant(one).is_none()
            {
                Ok(vec![origin, one, two])
            } else if diagonal.contains(&destination) && target.is_some() {
                Ok(vec![origin, destination])
            } else {
                Err(illegal(format!("pawn cannot move to {destination}")))
            }
        }
    }
}

/// Validate castling: the king moves two squares along its back rank toward an own rook.
/// Both must be unmoved and idle, and every square strictly between them empty.
/// Returns the rook's accompanying path, or `None` when castling is not legal.
pub fn check_castling(state: &GameState, king: &Piece, destination: Square) -> Option<CastleMove> {
    if king.piece_type != PieceType::King || king.moved {
        return None;
    }
    let idle = |piece: &Piece| !is_piece_moving(state, piece.id) && !is_piece_on_cooldown(state, piece.id, state.tick);
    if !idle(king) {
        return None;
    }
    let (fr, fc) = state.board_type().forward(king.owner);
    let dir = [(fc, fr), (-fc, -fr)]
        .into_iter()
        .find(|&(dr, dc)| king.square.offset(2 * dr, 2 * dc) == destination)?;

    let mut square = king.square.offset(dir.0, dir.1);
    while state.board.in_bounds(square) {
        if let Some(found) = state.resting_piece_at(square) {
            let crossed = king.square.offset(dir.0, dir.1);
            let is_castle_rook = found.piece_type == PieceType::Rook
                && found.owner == king.owner
                && !found.moved
                && idle(found)
                && found.square.chebyshev(king.square) >= 3;
            return is_castle_rook.then(|| CastleMove {
                rook_id: found.id,
                rook_path: straight_path(found.square, crossed, (-dir.0, -dir.1)),
            });
        }
        square = square.offset(dir.0, dir.1);
    }
    None
}

/// Validate a move for `piece`, trying castling first for kings.
pub fn plan_move(state: &GameState, piece: &Piece, destination: Square) -> Result<PlannedMove, MoveError> {
    if let Some(castle) = check_castling(state, piece, destination) {
        let dir = line_direction(piece.square, destination)
            .ok_or_else(|| illegal("castling destination is not on the back rank"))?;
        if is_reserved(state, piece, destination) {
            return Err(illegal(format!("{destination} is the target of a friendly move")));
        }
        // The rook lands on the square the king crosses; it must be free of friendly arrivals too.
        if let (Some(rook), Some(&landing)) = (state.piece(castle.rook_id), castle.rook_path.last()) {
            if is_reserved(state, rook, landing) {
                return Err(illegal(format!("castling rook square {landing} is the target of a friendly move")));
            }
        }
        return Ok(PlannedMove {
            path: straight_path(piece.square, destination, dir),
            castle: Some(castle),
        });
    }
    let path = compute_move_path(state, piece, destination)?;
    Ok(PlannedMove { path, castle: None })
}

/// Squares travelled, used to derive the duration. A knight's jump always counts two.
pub fn move_steps(piece_type: PieceType, path: &[Square]) -> u64 {
    match piece_type {
        PieceType::Knight => 2,
        _ => path.len().saturating_sub(1) as u64,
    }
}

pub fn move_duration(speed: SpeedConfig, piece_type: PieceType, path: &[Square]) -> u64 {
    move_steps(piece_type, path) * speed.ticks_per_square()
}
