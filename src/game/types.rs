use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::game::FIXED_ONE;

pub type PlayerId = u8;
pub type PieceId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub row: i32,
    pub col: i32,
}

impl Square {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self { row: self.row + d_row, col: self.col + d_col }
    }

    /// King-move distance, which is also the number of steps of a straight slide.
    pub fn chebyshev(self, other: Square) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A continuous board position in fixed-point units (`FIXED_ONE` per square).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedPos {
    pub row: i64,
    pub col: i64,
}

impl FixedPos {
    pub fn distance_sq(self, other: FixedPos) -> i64 {
        let dr = self.row - other.row;
        let dc = self.col - other.col;
        dr * dr + dc * dc
    }

    /// Nearest square, rounding halves toward the larger index.
    pub fn nearest_square(self) -> Square {
        let round = |v: i64| (v + FIXED_ONE / 2).div_euclid(FIXED_ONE) as i32;
        Square::new(round(self.row), round(self.col))
    }
}

impl From<Square> for FixedPos {
    fn from(square: Square) -> Self {
        Self {
            row: square.row as i64 * FIXED_ONE,
            col: square.col as i64 * FIXED_ONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardType {
    /// 8x8, two players.
    Standard,
    /// 12x12 with the corners cut, four players.
    FourPlayer,
}

impl BoardType {
    pub fn players(self) -> &'static [PlayerId] {
        match self {
            BoardType::Standard => &[1, 2],
            BoardType::FourPlayer => &[1, 2, 3, 4],
        }
    }

    /// Direction a pawn of `player` walks in, as `(d_row, d_col)`.
    /// Player 1 always starts on the south edge.
    pub fn forward(self, player: PlayerId) -> (i32, i32) {
        match (self, player) {
            (_, 1) => (-1, 0),
            (BoardType::Standard, _) => (1, 0),
            (BoardType::FourPlayer, 2) => (0, 1),
            (BoardType::FourPlayer, 3) => (1, 0),
            (BoardType::FourPlayer, _) => (0, -1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// How a piece type moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Any distance along these unit directions.
    Slide(&'static [(i32, i32)]),
    /// Exactly one of these offsets.
    Leap(&'static [(i32, i32)]),
    /// Forward steps and diagonal captures, relative to the owner's orientation.
    Pawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceRule {
    pub pattern: Pattern,
    /// Material value in centipawns.
    pub value: i32,
    pub symbol: char,
}

pub const ROOK_DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const QUEEN_DIRS: [(i32, i32); 8] =
    [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const KNIGHT_DELTAS: [(i32, i32); 8] =
    [(-2, -1), (-2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2), (2, -1), (2, 1)];

/// Movement pattern and value of every piece type, indexed by discriminant.
const RULES: [PieceRule; 6] = [
    PieceRule { pattern: Pattern::Pawn, value: 100, symbol: 'P' },
    PieceRule { pattern: Pattern::Leap(&KNIGHT_DELTAS), value: 300, symbol: 'N' },
    PieceRule { pattern: Pattern::Slide(&BISHOP_DIRS), value: 300, symbol: 'B' },
    PieceRule { pattern: Pattern::Slide(&ROOK_DIRS), value: 500, symbol: 'R' },
    PieceRule { pattern: Pattern::Slide(&QUEEN_DIRS), value: 900, symbol: 'Q' },
    PieceRule { pattern: Pattern::Leap(&QUEEN_DIRS), value: 10_000, symbol: 'K' },
];

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    #[inline]
    pub fn rule(self) -> &'static PieceRule {
        &RULES[self as usize]
    }

    pub fn from_symbol(symbol: char) -> Option<PieceType> {
        let upper = symbol.to_ascii_uppercase();
        PieceType::ALL.into_iter().find(|t| t.rule().symbol == upper)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub piece_type: PieceType,
    pub owner: PlayerId,
    /// Resting square, or the origin of the move while the piece is moving.
    pub square: Square,
    pub moved: bool,
    pub captured: bool,
}

impl Piece {
    pub fn new(id: PieceId, piece_type: PieceType, owner: PlayerId, square: Square) -> Self {
        Self {
            id,
            piece_type,
            owner,
            square,
            moved: false,
            captured: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.captured
    }
}
