use actix::prelude::*;
use std::collections::HashMap;
use actix::MessageResult;
use uuid::Uuid;
use log::{debug, info, warn};

use crate::ai::{create_ai, AiKind, AiPlayer};
use crate::config::game::GameConfig;
use crate::game::error::{ConfigError, MoveError};
use crate::game::state::GameState;
use crate::game::types::PlayerId;
use crate::server::game_session::messages::{
    ForceEnd, Forfeit, GameEnded, GameEventsUpdate, GameSummary, GetSummary, Subscribe, SubmitMove,
};
use crate::server::game_session::tick_resolution::{start_ticking, stop_ticking};

/// One running game: owns the engine state and drives it at the speed's tick rate.
pub struct GameSession {
    pub game_id: Uuid,
    pub state: GameState,
    pub ai_players: Vec<(PlayerId, Box<dyn AiPlayer>)>,
    pub subscribers: Vec<Recipient<GameEventsUpdate>>,
    pub manager: Option<Addr<GameSessionManager>>,
    pub(crate) tick_timer: Option<SpawnHandle>,
}

impl GameSession {
    pub fn new(game_id: Uuid, state: GameState) -> Self {
        Self {
            game_id,
            state,
            ai_players: Vec::new(),
            subscribers: Vec::new(),
            manager: None,
            tick_timer: None,
        }
    }

    pub fn with_ai(mut self, player: PlayerId, ai: Box<dyn AiPlayer>) -> Self {
        self.ai_players.push((player, ai));
        self
    }

    fn summary(&self) -> GameSummary {
        GameSummary {
            game_id: self.game_id,
            tick: self.state.tick,
            status: self.state.status,
            moves_played: self.state.history.len(),
        }
    }
}

impl Actor for GameSession {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        match self.state.start() {
            Ok(event) => {
                info!("[GameSession] game_id={} started", self.game_id);
                self.broadcast(vec![event]);
                start_ticking(self, ctx);
            }
            Err(err) => warn!("[GameSession] game_id={} could not start: {}", self.game_id, err),
        }
    }
}

pub struct GameSessionManager {
    sessions: HashMap<Uuid, Addr<GameSession>>,
}

#[derive(Message)]
#[rtype(result = "Result<Uuid, ConfigError>")]
pub struct CreateGame {
    pub config: GameConfig,
    /// Seats filled by AI players.
    pub ai_players: Vec<(PlayerId, AiKind)>,
    /// Seed for the AI players' random choices.
    pub seed: u64,
    pub subscribers: Vec<Recipient<GameEventsUpdate>>,
}

impl GameSessionManager {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn create_game(&mut self, msg: CreateGame, manager: Addr<GameSessionManager>) -> Result<Uuid, ConfigError> {
        let game_id = Uuid::new_v4();
        let state = GameState::new(&msg.config)?;

        let mut session = GameSession::new(game_id, state);
        for (i, (player, kind)) in msg.ai_players.into_iter().enumerate() {
            let ai = create_ai(kind, msg.config.speed, msg.seed.wrapping_add(i as u64));
            session = session.with_ai(player, ai);
        }
        session.subscribers = msg.subscribers;
        session.manager = Some(manager);

        self.sessions.insert(game_id, session.start());
        debug!("[GameSessionManager] Created game_id={} ({} active)", game_id, self.session_count());
        Ok(game_id)
    }
}

impl Default for GameSessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for GameSessionManager {
    type Context = Context<Self>;
}

impl Handler<CreateGame> for GameSessionManager {
    type Result = Result<Uuid, ConfigError>;

    fn handle(&mut self, msg: CreateGame, ctx: &mut Context<Self>) -> Self::Result {
        self.create_game(msg, ctx.address())
    }
}

#[derive(Message)]
#[rtype(result = "Result<Addr<GameSession>, String>")]
pub struct GetGameSession {
    pub game_id: Uuid,
}

impl Handler<GetGameSession> for GameSessionManager {
    type Result = Result<Addr<GameSession>, String>;

    fn handle(&mut self, msg: GetGameSession, _: &mut Context<Self>) -> Self::Result {
        self.sessions.get(&msg.game_id)
            .cloned()
            .ok_or_else(|| "Game session not found".to_string())
    }
}

impl Handler<GameEnded> for GameSessionManager {
    type Result = ();

    fn handle(&mut self, msg: GameEnded, _: &mut Context<Self>) -> Self::Result {
        if self.sessions.remove(&msg.game_id).is_some() {
            debug!("[GameSessionManager] Removed game_id={} ({} active)", msg.game_id, self.session_count());
        }
    }
}

impl Handler<SubmitMove> for GameSession {
    type Result = Result<(), MoveError>;

    fn handle(&mut self, msg: SubmitMove, _: &mut Context<Self>) -> Self::Result {
        let command = msg.command;
        // Early feedback against the current state; the engine re-validates at the boundary.
        self.state.validate_move(command.player, command.piece_id, command.destination)?;
        self.state.queue_move(command)
    }
}

impl Handler<Subscribe> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: Subscribe, _: &mut Context<Self>) -> Self::Result {
        self.subscribers.push(msg.0);
    }
}

impl Handler<Forfeit> for GameSession {
    type Result = Result<(), MoveError>;

    fn handle(&mut self, msg: Forfeit, ctx: &mut Context<Self>) -> Self::Result {
        let events = self.state.forfeit(msg.player)?;
        self.broadcast(events);
        if self.state.is_finished() {
            stop_ticking(self, ctx);
        }
        Ok(())
    }
}

impl Handler<ForceEnd> for GameSession {
    type Result = Result<(), MoveError>;

    fn handle(&mut self, msg: ForceEnd, ctx: &mut Context<Self>) -> Self::Result {
        let event = self.state.force_end(msg.winner, msg.reason)?;
        self.broadcast(vec![event]);
        stop_ticking(self, ctx);
        Ok(())
    }
}

impl Handler<GetSummary> for GameSession {
    type Result = MessageResult<GetSummary>;

    fn handle(&mut self, _: GetSummary, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::config::speed::SpeedConfig;
    use crate::game::state::{EndReason, GameStatus, MoveCommand};
    use crate::game::types::{BoardType, Square};

    struct Collector {
        updates: Vec<GameEventsUpdate>,
    }

    impl Actor for Collector {
        type Context = Context<Self>;
    }

    impl Handler<GameEventsUpdate> for Collector {
        type Result = ();

        fn handle(&mut self, msg: GameEventsUpdate, _: &mut Context<Self>) -> Self::Result {
            self.updates.push(msg);
        }
    }

    #[derive(Message)]
    #[rtype(result = "usize")]
    struct CountUpdates;

    impl Handler<CountUpdates> for Collector {
        type Result = usize;

        fn handle(&mut self, _: CountUpdates, _: &mut Context<Self>) -> Self::Result {
            self.updates.len()
        }
    }

    fn lightning() -> GameConfig {
        GameConfig::new(BoardType::Standard, SpeedConfig::Lightning)
    }

    #[actix::test]
    async fn test_session_ticks_and_accepts_moves() {
        let manager = GameSessionManager::new().start();
        let collector = Collector { updates: Vec::new() }.start();
        let game_id = manager
            .send(CreateGame {
                config: lightning(),
                ai_players: Vec::new(),
                seed: 1,
                subscribers: vec![collector.clone().recipient()],
            })
            .await
            .expect("mailbox")
            .expect("valid config");
        let session = manager.send(GetGameSession { game_id }).await.unwrap().unwrap();

        // Player 1's e-pawn (piece ids are row-major, so row 6 starts at 16).
        let pawn = MoveCommand { player: 1, piece_id: 20, destination: Square::new(4, 4) };
        assert_eq!(session.send(SubmitMove { command: pawn }).await.unwrap(), Ok(()));
        let stolen = MoveCommand { player: 2, piece_id: 20, destination: Square::new(5, 4) };
        assert!(matches!(
            session.send(SubmitMove { command: stolen }).await.unwrap(),
            Err(MoveError::NotOwner { .. })
        ));

        actix::clock::sleep(Duration::from_millis(350)).await;
        let summary = session.send(GetSummary).await.unwrap();
        assert!(summary.tick >= 2);
        assert_eq!(summary.moves_played, 1);
        assert_eq!(summary.status, GameStatus::Active);
        assert!(collector.send(CountUpdates).await.unwrap() >= 2);

        session
            .send(ForceEnd { winner: None, reason: EndReason::ForcedEnd })
            .await
            .unwrap()
            .expect("active game can be ended");
        let summary = session.send(GetSummary).await.unwrap();
        assert!(matches!(summary.status, GameStatus::Finished { winner: None, reason: EndReason::ForcedEnd }));
        assert!(matches!(
            session.send(Forfeit { player: 1 }).await.unwrap(),
            Err(MoveError::GameNotActive)
        ));
    }

    #[actix::test]
    async fn test_manager_drops_finished_games() {
        let manager = GameSessionManager::new().start();
        let game_id = manager
            .send(CreateGame {
                config: lightning(),
                ai_players: vec![(1, AiKind::Random), (2, AiKind::Heuristic { level: 1 })],
                seed: 3,
                subscribers: Vec::new(),
            })
            .await
            .unwrap()
            .unwrap();
        let session = manager.send(GetGameSession { game_id }).await.unwrap().unwrap();

        session
            .send(ForceEnd { winner: Some(1), reason: EndReason::ForcedEnd })
            .await
            .unwrap()
            .unwrap();
        actix::clock::sleep(Duration::from_millis(50)).await;
        assert!(manager.send(GetGameSession { game_id }).await.unwrap().is_err());
    }

    #[actix::test]
    async fn test_bad_layout_is_rejected_at_creation() {
        let manager = GameSessionManager::new().start();
        let result = manager
            .send(CreateGame {
                config: lightning().with_layout("K"),
                ai_players: vec![(2, AiKind::Random)],
                seed: 0,
                subscribers: Vec::new(),
            })
            .await
            .expect("mailbox");
        assert!(matches!(result, Err(ConfigError::LayoutSize { .. })));
    }
}
