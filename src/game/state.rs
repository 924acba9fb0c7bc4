//! Aggregate game state.
//!
//! `GameState` owns every piece, the board, all in-flight moves and cooldowns. It is mutated
//! only through the engine operations in `game::engine`.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::config::game::GameConfig;
use crate::config::speed::SpeedConfig;
use crate::game::board::Board;
use crate::game::error::ConfigError;
use crate::game::events::ReplayMove;
use crate::game::layout;
use crate::game::types::{BoardType, Piece, PieceId, PieceType, PlayerId, Square};

/// A request to move one piece to a destination square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveCommand {
    pub player: PlayerId,
    pub piece_id: PieceId,
    pub destination: Square,
}

/// A move in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub piece_id: PieceId,
    pub player: PlayerId,
    /// Origin first, destination last.
    pub path: Vec<Square>,
    pub start_tick: u64,
    pub completion_tick: u64,
    /// Pieces this move has captured so far.
    pub captured: Vec<PieceId>,
    /// Set on a king's castling move; names the rook travelling with it.
    pub castle_rook: Option<PieceId>,
}

impl Move {
    pub fn origin(&self) -> Square {
        self.path[0]
    }

    pub fn destination(&self) -> Square {
        self.path[self.path.len() - 1]
    }

    pub fn duration(&self) -> u64 {
        self.completion_tick - self.start_tick
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub attacker: PieceId,
    pub victim: PieceId,
    pub tick: u64,
    pub square: Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    KingCaptured,
    Forfeit,
    ForcedEnd,
    /// Every remaining king fell on the same tick.
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Waiting,
    Active,
    Finished {
        winner: Option<PlayerId>,
        reason: EndReason,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub id: PlayerId,
    pub eliminated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub speed: SpeedConfig,
    pub board: Board,
    /// Indexed by `PieceId`.
    pub pieces: Vec<Piece>,
    /// In-flight moves keyed by piece id.
    pub moves: BTreeMap<PieceId, Move>,
    /// Piece id -> first tick at which it may move again.
    pub cooldowns: BTreeMap<PieceId, u64>,
    pub status: GameStatus,
    /// Number of ticks processed so far.
    pub tick: u64,
    pub history: Vec<ReplayMove>,
    pub captures: Vec<Capture>,
    pub players: Vec<PlayerSlot>,
    /// Submissions waiting for the next tick boundary.
    #[serde(skip)]
    pub(crate) pending: VecDeque<MoveCommand>,
}

impl GameState {
    /// Create a game in `Waiting` status. A malformed layout fails here and nowhere else.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        let (board, pieces) = layout::build(config.board_type, config.layout.as_deref())?;
        let players = config
            .board_type
            .players()
            .iter()
            .filter(|id| {
                pieces
                    .iter()
                    .any(|p| p.owner == **id && p.piece_type == PieceType::King)
            })
            .map(|id| PlayerSlot { id: *id, eliminated: false })
            .collect();

        Ok(GameState {
            speed: config.speed,
            board,
            pieces,
            moves: BTreeMap::new(),
            cooldowns: BTreeMap::new(),
            status: GameStatus::Waiting,
            tick: 0,
            history: Vec::new(),
            captures: Vec::new(),
            players,
            pending: VecDeque::new(),
        })
    }

    pub fn board_type(&self) -> BoardType {
        self.board.board_type
    }

    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, GameStatus::Finished { .. })
    }

    pub fn piece(&self, piece_id: PieceId) -> Option<&Piece> {
        self.pieces.get(piece_id as usize)
    }

    pub fn live_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(|p| p.is_alive())
    }

    /// The live piece resting on `square`, if any.
    pub fn resting_piece_at(&self, square: Square) -> Option<&Piece> {
        self.board.occupant(square).and_then(|id| self.piece(id))
    }

    pub fn active_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().filter(|p| !p.eliminated).map(|p| p.id)
    }

    pub fn is_player_active(&self, player: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == player && !p.eliminated)
    }

    pub fn pending_moves(&self) -> impl Iterator<Item = &MoveCommand> {
        self.pending.iter()
    }

    /// Serialized view of the whole state for the broadcast layer.
    pub fn snapshot(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
