//! Tactical move scoring on top of the arrival field.

use serde::{Deserialize, Serialize};

use crate::ai::arrival::{ArrivalField, UNREACHABLE};
use crate::config::ai::{CENTER_BONUS, EXPOSED_PENALTY_PERCENT, PAWN_ADVANCE_BONUS, RECAPTURE_BONUS};
use crate::game::state::{GameState, MoveCommand};
use crate::game::systems::movement::move_duration;
use crate::game::types::{Piece, PieceType, Square};

/// Fixed material value, independent of the position.
pub fn capture_value(piece_type: PieceType) -> i32 {
    piece_type.rule().value
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Safety {
    Safe,
    /// An enemy can arrive while the piece is still cooling down after the move.
    Exposed,
    /// An enemy can arrive no later than the piece itself.
    Unsafe,
}

/// What a candidate move looks like once its timing is known.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub piece: &'a Piece,
    pub command: MoveCommand,
    pub target: Option<&'a Piece>,
    /// Ticks from now until arrival.
    pub duration: u64,
}

impl<'a> Candidate<'a> {
    pub fn new(state: &'a GameState, command: MoveCommand) -> Option<Self> {
        let piece = state.piece(command.piece_id)?;
        let planned = state.validate_move(command.player, command.piece_id, command.destination).ok()?;
        let target = state
            .resting_piece_at(command.destination)
            .filter(|t| t.owner != piece.owner);
        Some(Self {
            piece,
            command,
            target,
            duration: move_duration(state.speed, piece.piece_type, &planned.path),
        })
    }
}

fn enemy_arrival(field: &ArrivalField, candidate: &Candidate) -> u32 {
    field.enemy_time(
        candidate.piece.owner,
        candidate.command.destination,
        candidate.target.map(|t| t.id),
    )
}

/// Flag a move whose destination an opponent can reach first (or at the same tick).
pub fn move_safety(state: &GameState, field: &ArrivalField, candidate: &Candidate) -> Safety {
    let enemy = enemy_arrival(field, candidate);
    if enemy == UNREACHABLE {
        return Safety::Safe;
    }
    let enemy = enemy as u64;
    if enemy <= candidate.duration {
        Safety::Unsafe
    } else if enemy < candidate.duration + state.speed.cooldown_ticks() {
        Safety::Exposed
    } else {
        Safety::Safe
    }
}

/// Doubled Manhattan distance to the board centre (integer even on even-sized boards).
fn center_distance(state: &GameState, square: Square) -> i32 {
    (2 * square.row - (state.board.height - 1)).abs() + (2 * square.col - (state.board.width - 1)).abs()
}

/// Pawn progress plus centralisation of minor and major pieces.
pub fn positional_term(state: &GameState, candidate: &Candidate) -> i32 {
    let from = candidate.piece.square;
    let to = candidate.command.destination;
    match candidate.piece.piece_type {
        PieceType::Pawn => {
            let (fr, fc) = state.board_type().forward(candidate.piece.owner);
            let progress = (to.row - from.row) * fr + (to.col - from.col) * fc;
            progress * PAWN_ADVANCE_BONUS
        }
        PieceType::King => 0,
        _ => (center_distance(state, from) - center_distance(state, to)) / 2 * CENTER_BONUS,
    }
}

/// Reward for pulling a piece out of reach of an incoming attacker.
pub fn dodge_bonus(state: &GameState, field: &ArrivalField, candidate: &Candidate, safety: Safety) -> i32 {
    let threat = field.enemy_time(candidate.piece.owner, candidate.piece.square, None);
    let horizon = 2 * state.speed.ticks_per_square();
    if threat != UNREACHABLE && (threat as u64) <= horizon && safety == Safety::Safe {
        capture_value(candidate.piece.piece_type) / 2
    } else {
        0
    }
}

/// True when another own piece can retake on the destination soon after an enemy lands there.
pub fn is_defended(state: &GameState, field: &ArrivalField, candidate: &Candidate) -> bool {
    let own = field.player_time(
        candidate.piece.owner,
        candidate.command.destination,
        Some(candidate.piece.id),
    );
    let enemy = enemy_arrival(field, candidate);
    own != UNREACHABLE
        && enemy != UNREACHABLE
        && (own as u64) <= enemy as u64 + state.speed.cooldown_ticks()
}

/// Which terms a difficulty level is allowed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringTerms {
    pub safety: bool,
    pub exposure: bool,
    pub dodge: bool,
    pub recapture: bool,
}

/// `capture_value(target) - penalty_if_unsafe + positional_term`, plus the optional terms.
pub fn score_move(state: &GameState, field: Option<&ArrivalField>, candidate: &Candidate, terms: ScoringTerms) -> i32 {
    let mut score = candidate.target.map_or(0, |t| capture_value(t.piece_type));
    score += positional_term(state, candidate);

    let Some(field) = field else {
        return score;
    };
    let value = capture_value(candidate.piece.piece_type);
    let safety = move_safety(state, field, candidate);
    let defended = terms.recapture && is_defended(state, field, candidate);

    match safety {
        Safety::Unsafe if terms.safety => {
            // A defended square still loses the piece, but the trade is partly recovered.
            score -= if defended { value / 2 } else { value };
        }
        Safety::Exposed if terms.exposure => {
            score -= value * EXPOSED_PENALTY_PERCENT / 100;
        }
        _ => {}
    }
    if defended {
        score += RECAPTURE_BONUS;
    }
    if terms.dodge {
        score += dodge_bonus(state, field, candidate, safety);
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::game::GameConfig;
    use crate::config::speed::SpeedConfig;
    use crate::game::types::BoardType;

    fn active(layout: &str) -> GameState {
        let config = GameConfig::new(BoardType::Standard, SpeedConfig::Standard).with_layout(layout);
        let mut state = GameState::new(&config).expect("valid layout");
        state.start().expect("start");
        state
    }

    fn command(state: &GameState, from: Square, to: Square) -> MoveCommand {
        let piece = state.resting_piece_at(from).expect("piece");
        MoveCommand { player: piece.owner, piece_id: piece.id, destination: to }
    }

    // White queen on (4, 3); black rook on (0, 3) guarding the file; black knight on (4, 6).
    const SKIRMISH: &str = "
        ...rk...
        ........
        ........
        ........
        ...Q..n.
        ........
        ........
        K.......";

    #[test]
    fn test_capture_values() {
        assert_eq!(capture_value(PieceType::Pawn), 100);
        assert_eq!(capture_value(PieceType::Queen), 900);
        assert!(capture_value(PieceType::King) > capture_value(PieceType::Queen) * 8);
    }

    #[test]
    fn test_safety_flags_guarded_destination() {
        let state = active(SKIRMISH);
        let field = ArrivalField::compute(&state, state.tick);

        // (2, 3) is on the black rook's file: the rook arrives in 20 ticks, the queen in 20.
        let to_file = Candidate::new(&state, command(&state, Square::new(4, 3), Square::new(2, 3))).unwrap();
        assert_eq!(move_safety(&state, &field, &to_file), Safety::Unsafe);

        // (6, 1) is out of every black piece's single-move reach.
        let quiet = Candidate::new(&state, command(&state, Square::new(4, 3), Square::new(6, 1))).unwrap();
        assert_eq!(move_safety(&state, &field, &quiet), Safety::Safe);
    }

    #[test]
    fn test_captured_target_does_not_threaten() {
        let state = active(SKIRMISH);
        let field = ArrivalField::compute(&state, state.tick);
        let take_knight = Candidate::new(&state, command(&state, Square::new(4, 3), Square::new(4, 6))).unwrap();
        assert_eq!(take_knight.target.map(|t| t.piece_type), Some(PieceType::Knight));
        assert_eq!(move_safety(&state, &field, &take_knight), Safety::Safe);

        let terms = ScoringTerms { safety: true, exposure: true, dodge: false, recapture: false };
        let score = score_move(&state, Some(&field), &take_knight, terms);
        assert!(score >= capture_value(PieceType::Knight) - 50);
    }

    const ALL_TERMS: ScoringTerms = ScoringTerms { safety: true, exposure: true, dodge: true, recapture: true };

    #[test]
    fn test_exposed_destination_loses_part_of_value() {
        let mut state = active(SKIRMISH);
        let rook = state.resting_piece_at(Square::new(0, 3)).unwrap().id;
        // The rook is still cooling down: it reaches (2, 3) after the queen lands but before the
        // queen may move again.
        state.cooldowns.insert(rook, 50);
        let field = ArrivalField::compute(&state, state.tick);
        let candidate = Candidate::new(&state, command(&state, Square::new(4, 3), Square::new(2, 3))).unwrap();
        assert_eq!(move_safety(&state, &field, &candidate), Safety::Exposed);

        let lenient = ScoringTerms { exposure: false, ..ALL_TERMS };
        let penalty = score_move(&state, Some(&field), &candidate, lenient)
            - score_move(&state, Some(&field), &candidate, ALL_TERMS);
        assert_eq!(penalty, capture_value(PieceType::Queen) * EXPOSED_PENALTY_PERCENT / 100);
    }

    #[test]
    fn test_threatened_piece_rewarded_for_leaving() {
        let state = active(
            "...r...k
             ...B....
             ........
             ........
             ........
             ........
             ........
             K.......",
        );
        let field = ArrivalField::compute(&state, state.tick);
        let escape = Candidate::new(&state, command(&state, Square::new(1, 3), Square::new(2, 2))).unwrap();
        assert_eq!(move_safety(&state, &field, &escape), Safety::Safe);
        assert_eq!(dodge_bonus(&state, &field, &escape, Safety::Safe), capture_value(PieceType::Bishop) / 2);

        let no_dodge = ScoringTerms { dodge: false, ..ALL_TERMS };
        assert_eq!(
            score_move(&state, Some(&field), &escape, ALL_TERMS) - score_move(&state, Some(&field), &escape, no_dodge),
            capture_value(PieceType::Bishop) / 2
        );

        // The king is not under threat, so it gets nothing for moving.
        let king_step = Candidate::new(&state, command(&state, Square::new(7, 0), Square::new(6, 0))).unwrap();
        assert_eq!(dodge_bonus(&state, &field, &king_step, Safety::Safe), 0);
    }

    #[test]
    fn test_defended_destination_softens_penalty() {
        // SKIRMISH plus a white rook on (2, 0) that can retake on (2, 3).
        let state = active(
            "...rk...
             ........
             R.......
             ........
             ...Q..n.
             ........
             ........
             K.......",
        );
        let field = ArrivalField::compute(&state, state.tick);
        let candidate = Candidate::new(&state, command(&state, Square::new(4, 3), Square::new(2, 3))).unwrap();
        assert_eq!(move_safety(&state, &field, &candidate), Safety::Unsafe);
        assert!(is_defended(&state, &field, &candidate));

        let no_recapture = ScoringTerms { recapture: false, ..ALL_TERMS };
        let gain = score_move(&state, Some(&field), &candidate, ALL_TERMS)
            - score_move(&state, Some(&field), &candidate, no_recapture);
        assert_eq!(gain, capture_value(PieceType::Queen) / 2 + RECAPTURE_BONUS);
    }

    #[test]
    fn test_unsafe_move_is_penalised() {
        let state = active(SKIRMISH);
        let field = ArrivalField::compute(&state, state.tick);
        let terms = ScoringTerms { safety: true, exposure: false, dodge: false, recapture: false };
        let risky = Candidate::new(&state, command(&state, Square::new(4, 3), Square::new(2, 3))).unwrap();
        assert!(score_move(&state, Some(&field), &risky, terms) < -500);
        assert!(score_move(&state, None, &risky, terms) > -100);
    }
}
