//! Error types reported by the engine.
//!
//! `MoveError`s are recoverable: the submission is refused and the game goes on.
//! `ConfigError`s only happen while creating a game.

use serde::Serialize;
use thiserror::Error;

use crate::game::types::{PieceId, PlayerId, Square};

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum MoveError {
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("piece {0} is on cooldown")]
    PieceOnCooldown(PieceId),
    #[error("piece {0} is already moving")]
    PieceBusy(PieceId),
    #[error("piece {piece_id} does not belong to player {player}")]
    NotOwner { player: PlayerId, piece_id: PieceId },
    #[error("game is not active")]
    GameNotActive,
}

impl MoveError {
    /// Stable code for the broadcast layer (e.g. "ILLEGAL_MOVE").
    pub fn code(&self) -> &'static str {
        match self {
            MoveError::IllegalMove(_) => "ILLEGAL_MOVE",
            MoveError::PieceOnCooldown(_) => "PIECE_ON_COOLDOWN",
            MoveError::PieceBusy(_) => "PIECE_BUSY",
            MoveError::NotOwner { .. } => "NOT_OWNER",
            MoveError::GameNotActive => "GAME_NOT_ACTIVE",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("layout has {found} squares, expected {expected}")]
    LayoutSize { expected: usize, found: usize },
    #[error("unknown layout character '{symbol}' at {square}")]
    LayoutSymbol { symbol: char, square: Square },
    #[error("layout square {square} must be '{expected}'")]
    LayoutCorner { square: Square, expected: char },
    #[error("player {0} has no king")]
    MissingKing(PlayerId),
    #[error("invalid game config: {0}")]
    Json(#[from] serde_json::Error),
}
