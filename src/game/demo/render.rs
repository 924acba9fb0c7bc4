//! Game rendering (terminal).
//!
//! This module turns a game state into text for debugging/demo.

use crate::game::state::GameState;
use crate::game::systems::collision::get_interpolated_position;
use crate::game::types::Square;

/// Render the board: resting pieces as `<symbol><player>`, moving pieces as `*<player>` on the
/// square nearest to where they are now, removed corners blank.
pub fn render_board(state: &GameState) -> String {
    let board = &state.board;
    let mut cells: Vec<Vec<String>> = (0..board.height)
        .map(|row| {
            (0..board.width)
                .map(|col| {
                    let square = Square::new(row, col);
                    if !board.in_bounds(square) {
                        "  ".to_string()
                    } else if let Some(piece) = state.resting_piece_at(square) {
                        format!("{}{}", piece.piece_type.rule().symbol, piece.owner)
                    } else {
                        ". ".to_string()
                    }
                })
                .collect()
        })
        .collect();

    // Moving pieces go on top of empty squares only.
    for mv in state.moves.values() {
        let Some(pos) = get_interpolated_position(state, mv.piece_id, state.tick) else {
            continue;
        };
        let square = pos.nearest_square();
        if board.in_bounds(square) && state.board.occupant(square).is_none() {
            cells[square.row as usize][square.col as usize] = format!("*{}", mv.player);
        }
    }

    let mut out = String::new();
    for row in cells {
        for cell in row {
            out.push_str(&format!("{:<3}", cell));
        }
        out.push('\n');
    }
    out
}

/// One-line status summary.
pub fn render_status(state: &GameState) -> String {
    format!(
        "tick={} status={:?} pieces={} moving={}",
        state.tick,
        state.status,
        state.live_pieces().count(),
        state.moves.len()
    )
}
