//! Observable output of the engine: the per-tick event stream and the replay log.

use serde::{Deserialize, Serialize};

use crate::game::error::MoveError;
use crate::game::state::{EndReason, MoveCommand};
use crate::game::types::{PieceId, PieceType, PlayerId, Square};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameEvent {
    pub tick: u64,
    pub kind: GameEventType,
}

impl GameEvent {
    pub fn new(tick: u64, kind: GameEventType) -> Self {
        Self { tick, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum GameEventType {
    GameStarted,
    MoveStarted {
        piece_id: PieceId,
        player: PlayerId,
        path: Vec<Square>,
        start_tick: u64,
        completion_tick: u64,
        /// Rook id and path when the move is a castle.
        castle: Option<(PieceId, Vec<Square>)>,
    },
    MoveCompleted {
        piece_id: PieceId,
        square: Square,
    },
    Capture {
        attacker: PieceId,
        victim: PieceId,
        square: Square,
    },
    Promotion {
        piece_id: PieceId,
        piece_type: PieceType,
    },
    /// A queued submission that failed validation at the tick boundary.
    MoveRejected {
        command: MoveCommand,
        error: MoveError,
    },
    PlayerEliminated {
        player: PlayerId,
    },
    GameOver {
        winner: Option<PlayerId>,
        reason: EndReason,
    },
}

/// One accepted move command, as stored for replays. Never mutated after append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayMove {
    pub tick: u64,
    pub player: PlayerId,
    pub piece_id: PieceId,
    pub from: Square,
    pub to: Square,
}

/// Serialize a tick's events for the broadcast layer.
pub fn events_to_json(events: &[GameEvent]) -> serde_json::Result<String> {
    serde_json::to_string(events)
}
