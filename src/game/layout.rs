//! Starting positions.
//!
//! Builds the default two- and four-player setups and parses the legacy board string used by
//! scripted levels: one character per square, row-major, whitespace ignored.
//! `.` is empty, `PNBRQK` belong to player 1, `pnbrqk` to player 2, and `#` marks a removed
//! corner square of the four-player board.

use crate::config::game::{FOUR_PLAYER_CORNER, FOUR_PLAYER_SIZE, STANDARD_SIZE};
use crate::game::board::Board;
use crate::game::error::ConfigError;
use crate::game::types::{BoardType, Piece, PieceType, PlayerId, Square};

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

type Placement = (PieceType, PlayerId, Square);

/// Build the board and pieces for a game. Piece ids are indices into the returned vector,
/// assigned in row-major order of the starting squares.
pub fn build(board_type: BoardType, layout: Option<&str>) -> Result<(Board, Vec<Piece>), ConfigError> {
    let mut placements = match layout {
        Some(text) => parse_board_string(board_type, text)?,
        None => default_placements(board_type),
    };
    placements.sort_by_key(|(_, _, square)| *square);

    let mut board = Board::new(board_type);
    let pieces: Vec<Piece> = placements
        .into_iter()
        .enumerate()
        .map(|(i, (piece_type, owner, square))| {
            board.place(square, i as u32);
            Piece::new(i as u32, piece_type, owner, square)
        })
        .collect();
    Ok((board, pieces))
}

pub fn default_placements(board_type: BoardType) -> Vec<Placement> {
    match board_type {
        BoardType::Standard => standard(),
        BoardType::FourPlayer => four_player(),
    }
}

pub fn standard() -> Vec<Placement> {
    let last = STANDARD_SIZE - 1;
    let mut placements = Vec::with_capacity(32);
    for (col, piece_type) in BACK_RANK.iter().enumerate() {
        let col = col as i32;
        placements.push((*piece_type, 2, Square::new(0, col)));
        placements.push((PieceType::Pawn, 2, Square::new(1, col)));
        placements.push((PieceType::Pawn, 1, Square::new(last - 1, col)));
        placements.push((*piece_type, 1, Square::new(last, col)));
    }
    placements
}

pub fn four_player() -> Vec<Placement> {
    let last = FOUR_PLAYER_SIZE - 1;
    let mut placements = Vec::with_capacity(64);
    for (i, piece_type) in BACK_RANK.iter().enumerate() {
        let line = FOUR_PLAYER_CORNER + i as i32;
        // south
        placements.push((*piece_type, 1, Square::new(last, line)));
        placements.push((PieceType::Pawn, 1, Square::new(last - 1, line)));
        // west
        placements.push((*piece_type, 2, Square::new(line, 0)));
        placements.push((PieceType::Pawn, 2, Square::new(line, 1)));
        // north
        placements.push((*piece_type, 3, Square::new(0, line)));
        placements.push((PieceType::Pawn, 3, Square::new(1, line)));
        // east
        placements.push((*piece_type, 4, Square::new(line, last)));
        placements.push((PieceType::Pawn, 4, Square::new(line, last - 1)));
    }
    placements
}

pub fn parse_board_string(board_type: BoardType, text: &str) -> Result<Vec<Placement>, ConfigError> {
    let board = Board::new(board_type);
    let symbols: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    let expected = (board.width * board.height) as usize;
    if symbols.len() != expected {
        return Err(ConfigError::LayoutSize { expected, found: symbols.len() });
    }

    let mut placements = Vec::new();
    for (i, symbol) in symbols.into_iter().enumerate() {
        let square = Square::new(i as i32 / board.width, i as i32 % board.width);
        if !board.in_bounds(square) {
            if symbol != '#' {
                return Err(ConfigError::LayoutCorner { square, expected: '#' });
            }
            continue;
        }
        match symbol {
            '.' => {}
            '#' => return Err(ConfigError::LayoutCorner { square, expected: '.' }),
            _ => {
                let piece_type = PieceType::from_symbol(symbol)
                    .ok_or(ConfigError::LayoutSymbol { symbol, square })?;
                let owner = if symbol.is_ascii_uppercase() { 1 } else { 2 };
                placements.push((piece_type, owner, square));
            }
        }
    }

    for player in [1, 2] {
        let has_king = placements
            .iter()
            .any(|(piece_type, owner, _)| *piece_type == PieceType::King && *owner == player);
        if !has_king {
            return Err(ConfigError::MissingKing(player));
        }
    }
    Ok(placements)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINGS_ONLY: &str = "
        ....k...
        ........
        ........
        ........
        ........
        ........
        ........
        ....K...";

    #[test]
    fn test_standard_layout() {
        let (board, pieces) = build(BoardType::Standard, None).expect("default layout");
        assert_eq!(pieces.len(), 32);
        assert_eq!(board.occupied_count(), 32);
        let king = pieces.iter().find(|p| p.piece_type == PieceType::King && p.owner == 1).unwrap();
        assert_eq!(king.square, Square::new(7, 4));
        for piece in &pieces {
            assert_eq!(board.occupant(piece.square), Some(piece.id));
        }
    }

    #[test]
    fn test_four_player_layout() {
        let (board, pieces) = build(BoardType::FourPlayer, None).expect("default layout");
        assert_eq!(pieces.len(), 64);
        assert!(pieces.iter().all(|p| board.in_bounds(p.square)));
        for player in 1..=4 {
            assert_eq!(pieces.iter().filter(|p| p.owner == player).count(), 16);
        }
    }

    #[test]
    fn test_parse_board_string() {
        let (_, pieces) = build(BoardType::Standard, Some(KINGS_ONLY)).expect("valid layout");
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].owner, 2);
        assert_eq!(pieces[0].square, Square::new(0, 4));
        assert_eq!(pieces[1].owner, 1);
    }

    #[test]
    fn test_parse_rejects_bad_layouts() {
        assert!(matches!(
            parse_board_string(BoardType::Standard, "K.k"),
            Err(ConfigError::LayoutSize { expected: 64, found: 3 })
        ));
        let bad_symbol = KINGS_ONLY.replacen('.', "x", 1);
        assert!(matches!(
            parse_board_string(BoardType::Standard, &bad_symbol),
            Err(ConfigError::LayoutSymbol { symbol: 'x', .. })
        ));
        let no_white_king = KINGS_ONLY.replace('K', ".");
        assert!(matches!(
            parse_board_string(BoardType::Standard, &no_white_king),
            Err(ConfigError::MissingKing(1))
        ));
    }

    #[test]
    fn test_parse_four_player_corners() {
        let mut rows = Vec::new();
        for row in 0..12 {
            let line: String = (0..12)
                .map(|col| {
                    let corner = (row < 2 || row >= 10) && (col < 2 || col >= 10);
                    match (row, col) {
                        _ if corner => '#',
                        (0, 6) => 'k',
                        (11, 6) => 'K',
                        _ => '.',
                    }
                })
                .collect();
            rows.push(line);
        }
        let text = rows.join("\n");
        let placements = parse_board_string(BoardType::FourPlayer, &text).expect("valid layout");
        assert_eq!(placements.len(), 2);

        let broken = text.replacen('#', ".", 1);
        assert!(matches!(
            parse_board_string(BoardType::FourPlayer, &broken),
            Err(ConfigError::LayoutCorner { expected: '#', .. })
        ));
    }
}
