use actix::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::game::error::MoveError;
use crate::game::events::GameEvent;
use crate::game::state::{EndReason, GameStatus, MoveCommand};
use crate::game::types::PlayerId;

/// A player's move, buffered until the next tick boundary.
#[derive(Message)]
#[rtype(result = "Result<(), MoveError>")]
pub struct SubmitMove {
    pub command: MoveCommand,
}

/// Events produced by one tick, pushed to every subscriber.
#[derive(Message, Clone, Serialize, Debug)]
#[rtype(result = "()")]
pub struct GameEventsUpdate {
    pub game_id: Uuid,
    pub tick: u64,
    pub events: Vec<GameEvent>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Subscribe(pub Recipient<GameEventsUpdate>);

#[derive(Message)]
#[rtype(result = "Result<(), MoveError>")]
pub struct Forfeit {
    pub player: PlayerId,
}

/// Sent by the external scheduler, e.g. on player inactivity.
#[derive(Message)]
#[rtype(result = "Result<(), MoveError>")]
pub struct ForceEnd {
    pub winner: Option<PlayerId>,
    pub reason: EndReason,
}

#[derive(Message)]
#[rtype(result = "GameSummary")]
pub struct GetSummary;

#[derive(Clone, Serialize, Debug)]
pub struct GameSummary {
    pub game_id: Uuid,
    pub tick: u64,
    pub status: GameStatus,
    pub moves_played: usize,
}

/// Session -> manager: the game is over and the session can be dropped.
#[derive(Message)]
#[rtype(result = "()")]
pub struct GameEnded {
    pub game_id: Uuid,
}
