//! Board geometry and occupancy.
//!
//! The board knows nothing about time: it tracks which resting piece stands on which square.
//! Moving pieces are lifted off the board when their move starts and put back on arrival.

use serde::{Deserialize, Serialize};

use crate::config::game::{FOUR_PLAYER_CORNER, FOUR_PLAYER_SIZE, STANDARD_SIZE};
use crate::game::types::{BoardType, Pattern, Piece, PieceId, PlayerId, Square};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub board_type: BoardType,
    pub width: i32,
    pub height: i32,
    /// Row-major occupancy of resting pieces.
    cells: Vec<Option<PieceId>>,
}

impl Board {
    pub fn new(board_type: BoardType) -> Self {
        let size = match board_type {
            BoardType::Standard => STANDARD_SIZE,
            BoardType::FourPlayer => FOUR_PLAYER_SIZE,
        };
        Self {
            board_type,
            width: size,
            height: size,
            cells: vec![None; (size * size) as usize],
        }
    }

    /// True when the square exists on this board (the four-player corners do not).
    pub fn in_bounds(&self, square: Square) -> bool {
        if square.row < 0 || square.col < 0 || square.row >= self.height || square.col >= self.width {
            return false;
        }
        match self.board_type {
            BoardType::Standard => true,
            BoardType::FourPlayer => {
                let far = FOUR_PLAYER_SIZE - FOUR_PLAYER_CORNER;
                let edge_row = square.row < FOUR_PLAYER_CORNER || square.row >= far;
                let edge_col = square.col < FOUR_PLAYER_CORNER || square.col >= far;
                !(edge_row && edge_col)
            }
        }
    }

    /// Every existing square, row-major.
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        (0..self.height)
            .flat_map(move |row| (0..self.width).map(move |col| Square::new(row, col)))
            .filter(move |square| self.in_bounds(*square))
    }

    pub fn index(&self, square: Square) -> usize {
        (square.row * self.width + square.col) as usize
    }

    pub fn occupant(&self, square: Square) -> Option<PieceId> {
        if !self.in_bounds(square) {
            return None;
        }
        self.cells[self.index(square)]
    }

    /// Put a piece on a square, returning whatever stood there before.
    pub fn place(&mut self, square: Square, piece_id: PieceId) -> Option<PieceId> {
        let idx = self.index(square);
        self.cells[idx].replace(piece_id)
    }

    /// Clear a square if `piece_id` stands on it.
    pub fn remove(&mut self, square: Square, piece_id: PieceId) -> bool {
        let idx = self.index(square);
        if self.cells[idx] == Some(piece_id) {
            self.cells[idx] = None;
            true
        } else {
            false
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// True when a pawn of `player` standing on `square` has reached the edge it walks toward.
    pub fn is_promotion_square(&self, player: PlayerId, square: Square) -> bool {
        match self.board_type.forward(player) {
            (-1, _) => square.row == 0,
            (1, _) => square.row == self.height - 1,
            (_, 1) => square.col == self.width - 1,
            _ => square.col == 0,
        }
    }

    /// Squares geometrically reachable by the piece in one move, ignoring timing,
    /// blocking and occupancy. An upper bound used before path validation.
    pub fn reachable_squares(&self, piece: &Piece) -> Vec<Square> {
        let origin = piece.square;
        match piece.piece_type.rule().pattern {
            Pattern::Slide(dirs) => dirs
                .iter()
                .flat_map(|&(dr, dc)| {
                    (1..)
                        .map(move |n| origin.offset(dr * n, dc * n))
                        .take_while(|square| self.in_bounds(*square))
                })
                .collect(),
            Pattern::Leap(deltas) => deltas
                .iter()
                .map(|&(dr, dc)| origin.offset(dr, dc))
                .filter(|square| self.in_bounds(*square))
                .collect(),
            Pattern::Pawn => {
                let (dr, dc) = self.board_type.forward(piece.owner);
                let mut squares = vec![origin.offset(dr, dc)];
                if !piece.moved {
                    squares.push(origin.offset(2 * dr, 2 * dc));
                }
                // Diagonals: forward plus one step to either side.
                squares.push(origin.offset(dr + dc, dc + dr));
                squares.push(origin.offset(dr - dc, dc - dr));
                squares.retain(|square| self.in_bounds(*square));
                squares
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::PieceType;

    #[test]
    fn test_four_player_corners_removed() {
        let board = Board::new(BoardType::FourPlayer);
        assert!(!board.in_bounds(Square::new(0, 0)));
        assert!(!board.in_bounds(Square::new(1, 10)));
        assert!(!board.in_bounds(Square::new(11, 11)));
        assert!(board.in_bounds(Square::new(0, 2)));
        assert!(board.in_bounds(Square::new(5, 0)));
        assert_eq!(board.squares().count(), 144 - 16);
    }

    #[test]
    fn test_place_and_remove() {
        let mut board = Board::new(BoardType::Standard);
        let square = Square::new(3, 3);
        assert_eq!(board.place(square, 7), None);
        assert_eq!(board.occupant(square), Some(7));
        assert!(!board.remove(square, 8));
        assert!(board.remove(square, 7));
        assert_eq!(board.occupant(square), None);
    }

    #[test]
    fn test_rook_reach_on_empty_board() {
        let board = Board::new(BoardType::Standard);
        let rook = Piece::new(1, PieceType::Rook, 1, Square::new(0, 0));
        let reach = board.reachable_squares(&rook);
        assert_eq!(reach.len(), 14);
        assert!(reach.contains(&Square::new(0, 7)));
        assert!(!reach.contains(&Square::new(1, 1)));
    }

    #[test]
    fn test_pawn_reach_depends_on_orientation() {
        let board = Board::new(BoardType::FourPlayer);
        let pawn = Piece::new(1, PieceType::Pawn, 2, Square::new(5, 1));
        let reach = board.reachable_squares(&pawn);
        assert!(reach.contains(&Square::new(5, 2)));
        assert!(reach.contains(&Square::new(5, 3)));
        assert!(reach.contains(&Square::new(4, 2)));
        assert!(reach.contains(&Square::new(6, 2)));
        assert_eq!(reach.len(), 4);
    }

    #[test]
    fn test_promotion_edges() {
        let board = Board::new(BoardType::FourPlayer);
        assert!(board.is_promotion_square(1, Square::new(0, 4)));
        assert!(board.is_promotion_square(2, Square::new(4, 11)));
        assert!(board.is_promotion_square(3, Square::new(11, 4)));
        assert!(board.is_promotion_square(4, Square::new(4, 0)));
        assert!(!board.is_promotion_square(1, Square::new(11, 4)));
    }
}
