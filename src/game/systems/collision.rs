//! Collision and capture resolution.
//!
//! Positions are fixed-point (`FIXED_ONE` units per square) and time is counted in sub-tick
//! samples (`SUBSTEPS_PER_TICK` per tick), so every computation is integer arithmetic and replays
//! are bit-identical on every platform.

use serde::{Deserialize, Serialize};

use crate::config::game::{CAPTURE_DISTANCE, FIXED_ONE, SUBSTEPS_PER_TICK};
use crate::game::state::{GameState, Move};
use crate::game::types::{FixedPos, Piece, PieceId, PieceType};

pub fn is_piece_moving(state: &GameState, piece_id: PieceId) -> bool {
    state.moves.contains_key(&piece_id)
}

pub fn is_piece_on_cooldown(state: &GameState, piece_id: PieceId, tick: u64) -> bool {
    state.cooldowns.get(&piece_id).is_some_and(|&expiry| tick < expiry)
}

/// Sub-tick sample index of a tick boundary.
pub fn tick_to_sample(tick: u64) -> u64 {
    tick * SUBSTEPS_PER_TICK
}

/// Position along a move at sample `time`: exactly the origin at the start sample and exactly
/// the destination from the completion sample on.
pub fn position_on_move(mv: &Move, time: u64) -> FixedPos {
    let start = tick_to_sample(mv.start_tick);
    let end = tick_to_sample(mv.completion_tick);
    if time <= start {
        return mv.origin().into();
    }
    if time >= end || mv.path.len() < 2 {
        return mv.destination().into();
    }
    let segments = (mv.path.len() - 1) as i64;
    let elapsed = (time - start) as i64;
    let total = (end - start) as i64;
    // Distance travelled along the path, in fixed units of path length.
    let travelled = elapsed * segments * FIXED_ONE / total;
    let segment = (travelled / FIXED_ONE) as usize;
    let within = travelled % FIXED_ONE;
    let from = mv.path[segment];
    let to = mv.path[segment + 1];
    FixedPos {
        row: from.row as i64 * FIXED_ONE + (to.row - from.row) as i64 * within,
        col: from.col as i64 * FIXED_ONE + (to.col - from.col) as i64 * within,
    }
}

/// Position of a piece at sample `time`. Resting pieces sit on their square.
pub fn position_at_sample(state: &GameState, piece: &Piece, time: u64) -> FixedPos {
    match state.moves.get(&piece.id) {
        Some(mv) => position_on_move(mv, time),
        None => piece.square.into(),
    }
}

/// Interpolated position of a piece at a tick boundary.
pub fn get_interpolated_position(state: &GameState, piece_id: PieceId, tick: u64) -> Option<FixedPos> {
    let piece = state.piece(piece_id)?;
    Some(position_at_sample(state, piece, tick_to_sample(tick)))
}

/// Closed inequality: a distance of exactly `CAPTURE_DISTANCE` collides.
pub fn within_capture_distance(a: FixedPos, b: FixedPos) -> bool {
    a.distance_sq(b) <= CAPTURE_DISTANCE * CAPTURE_DISTANCE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionOutcome {
    Captures { attacker: PieceId, victim: PieceId },
    /// Both pieces are removed.
    Mutual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    /// Lower piece id of the pair.
    pub first: PieceId,
    pub second: PieceId,
    pub position_first: FixedPos,
    pub position_second: FixedPos,
    pub outcome: CollisionOutcome,
}

impl Collision {
    /// Victims with the position each one was hit at.
    pub fn victims(&self) -> Vec<(PieceId, Option<PieceId>, FixedPos)> {
        match self.outcome {
            CollisionOutcome::Captures { attacker, victim } => {
                let pos = if victim == self.first { self.position_first } else { self.position_second };
                vec![(victim, Some(attacker), pos)]
            }
            CollisionOutcome::Mutual => vec![
                (self.first, Some(self.second), self.position_first),
                (self.second, Some(self.first), self.position_second),
            ],
        }
    }
}

/// A knight in the air cannot touch anything until it lands.
fn is_airborne(piece: &Piece, mv: Option<&Move>, time: u64) -> bool {
    piece.piece_type == PieceType::Knight
        && mv.is_some_and(|m| time < tick_to_sample(m.completion_tick))
}

/// A pawn walking straight ahead cannot capture.
fn can_capture(state: &GameState, piece: &Piece, mv: Option<&Move>) -> bool {
    let Some(mv) = mv else {
        return true;
    };
    if piece.piece_type != PieceType::Pawn {
        return true;
    }
    let (fr, fc) = state.board_type().forward(piece.owner);
    let dest = mv.destination();
    let origin = mv.origin();
    let straight = (dest.row - origin.row) * fc == (dest.col - origin.col) * fr;
    !straight
}

/// Decide who survives a collision between `a` and `b`.
///
/// A mover beats a resting piece; between two movers the earlier start wins and identical
/// starts capture each other. Pieces unable to capture lose to pieces that can.
pub fn resolve_pair(state: &GameState, a: &Piece, b: &Piece) -> CollisionOutcome {
    let move_a = state.moves.get(&a.id);
    let move_b = state.moves.get(&b.id);
    let a_wins = CollisionOutcome::Captures { attacker: a.id, victim: b.id };
    let b_wins = CollisionOutcome::Captures { attacker: b.id, victim: a.id };

    match (can_capture(state, a, move_a), can_capture(state, b, move_b)) {
        (true, false) => return a_wins,
        (false, true) => return b_wins,
        _ => {}
    }
    match (move_a, move_b) {
        (Some(_), None) => a_wins,
        (None, Some(_)) => b_wins,
        (Some(ma), Some(mb)) if ma.start_tick < mb.start_tick => a_wins,
        (Some(ma), Some(mb)) if mb.start_tick < ma.start_tick => b_wins,
        _ => CollisionOutcome::Mutual,
    }
}

/// All collisions at sample `time` between live pieces of different owners where at least one
/// is moving. Pairs are reported in ascending id order.
pub fn detect_collisions_at(state: &GameState, time: u64) -> Vec<Collision> {
    let tracked: Vec<(&Piece, Option<&Move>, FixedPos)> = state
        .live_pieces()
        .filter_map(|piece| {
            let mv = state.moves.get(&piece.id);
            if is_airborne(piece, mv, time) {
                return None;
            }
            Some((piece, mv, position_at_sample(state, piece, time)))
        })
        .collect();

    let mut collisions = Vec::new();
    for (i, (a, move_a, pos_a)) in tracked.iter().enumerate() {
        for (b, move_b, pos_b) in &tracked[i + 1..] {
            if a.owner == b.owner || (move_a.is_none() && move_b.is_none()) {
                continue;
            }
            if within_capture_distance(*pos_a, *pos_b) {
                collisions.push(Collision {
                    first: a.id,
                    second: b.id,
                    position_first: *pos_a,
                    position_second: *pos_b,
                    outcome: resolve_pair(state, a, b),
                });
            }
        }
    }
    collisions
}

/// Collisions at a tick boundary.
pub fn detect_collisions(state: &GameState, tick: u64) -> Vec<Collision> {
    detect_collisions_at(state, tick_to_sample(tick))
}
