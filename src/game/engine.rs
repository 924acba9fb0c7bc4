//! Tick-driven game engine.
//!
//! Every mutation of a [`GameState`] after creation goes through the operations here:
//! starting, validated move submission, tick advancement and forced termination.

use log::{debug, info, warn};

use crate::game::error::MoveError;
use crate::game::events::{GameEvent, GameEventType, ReplayMove};
use crate::game::state::{Capture, EndReason, GameState, GameStatus, Move, MoveCommand};
use crate::game::systems::collision::{detect_collisions_at, is_piece_moving, is_piece_on_cooldown, tick_to_sample};
use crate::game::systems::movement::{move_duration, plan_move, PlannedMove};
use crate::game::systems::rules::{
    apply_promotion, check_game_over, eliminate_kingless_players, eliminate_player, finish,
};
use crate::game::types::{FixedPos, PieceId, PieceType, PlayerId, Square};

impl GameState {
    /// `Waiting` -> `Active`.
    pub fn start(&mut self) -> Result<GameEvent, MoveError> {
        if self.status != GameStatus::Waiting {
            return Err(MoveError::GameNotActive);
        }
        self.status = GameStatus::Active;
        info!(
            "[Engine] Game started: board={:?} speed={:?} players={}",
            self.board_type(),
            self.speed,
            self.players.len()
        );
        Ok(GameEvent::new(self.tick, GameEventType::GameStarted))
    }

    /// Check a submission against the current state without touching it.
    pub fn validate_move(&self, player: PlayerId, piece_id: PieceId, destination: Square) -> Result<PlannedMove, MoveError> {
        if !self.is_active() {
            return Err(MoveError::GameNotActive);
        }
        let piece = self
            .piece(piece_id)
            .filter(|p| p.is_alive())
            .ok_or_else(|| MoveError::IllegalMove(format!("no live piece {piece_id}")))?;
        if piece.owner != player {
            return Err(MoveError::NotOwner { player, piece_id });
        }
        if is_piece_moving(self, piece_id) {
            return Err(MoveError::PieceBusy(piece_id));
        }
        if is_piece_on_cooldown(self, piece_id, self.tick) {
            return Err(MoveError::PieceOnCooldown(piece_id));
        }
        plan_move(self, piece, destination)
    }

    /// Validate and install a move starting at the current tick.
    /// On failure the state is left untouched.
    pub fn submit_move(&mut self, player: PlayerId, piece_id: PieceId, destination: Square) -> Result<GameEvent, MoveError> {
        let planned = self.validate_move(player, piece_id, destination)?;
        let origin = planned.path[0];

        let castle_rook = planned.castle.as_ref().map(|c| c.rook_id);
        let rook_move = planned
            .castle
            .map(|castle| self.install_move(castle.rook_id, player, castle.rook_path, None));
        let king_move = self.install_move(piece_id, player, planned.path, castle_rook);

        self.history.push(ReplayMove {
            tick: self.tick,
            player,
            piece_id,
            from: origin,
            to: destination,
        });
        debug!(
            "[Engine] tick={} player={} piece={} {} -> {} arrives at tick {}",
            self.tick, player, piece_id, origin, destination, king_move.completion_tick
        );

        Ok(GameEvent::new(
            self.tick,
            GameEventType::MoveStarted {
                piece_id,
                player,
                path: king_move.path,
                start_tick: king_move.start_tick,
                completion_tick: king_move.completion_tick,
                castle: rook_move.map(|m| (m.piece_id, m.path)),
            },
        ))
    }

    fn install_move(&mut self, piece_id: PieceId, player: PlayerId, path: Vec<Square>, castle_rook: Option<PieceId>) -> Move {
        let piece = &mut self.pieces[piece_id as usize];
        let duration = move_duration(self.speed, piece.piece_type, &path);
        piece.moved = true;
        self.board.remove(piece.square, piece_id);

        let mv = Move {
            piece_id,
            player,
            path,
            start_tick: self.tick,
            completion_tick: self.tick + duration,
            captured: Vec::new(),
            castle_rook,
        };
        self.moves.insert(piece_id, mv.clone());
        mv
    }

    /// Buffer a submission until the next tick boundary.
    pub fn queue_move(&mut self, command: MoveCommand) -> Result<(), MoveError> {
        if self.is_finished() {
            return Err(MoveError::GameNotActive);
        }
        self.pending.push_back(command);
        Ok(())
    }

    /// Advance the simulation by exactly one tick and return the events it produced, in order.
    ///
    /// Queued submissions are applied first (they start at the boundary), then collisions are
    /// resolved sample by sample through the tick, arrivals are completed, and finally the
    /// terminal condition is checked.
    pub fn advance_tick(&mut self) -> Vec<GameEvent> {
        if !self.is_active() {
            return Vec::new();
        }
        let mut events = Vec::new();

        while let Some(command) = self.pending.pop_front() {
            match self.submit_move(command.player, command.piece_id, command.destination) {
                Ok(event) => events.push(event),
                Err(error) => {
                    warn!("[Engine] Rejected queued move {:?}: {}", command, error);
                    events.push(GameEvent::new(self.tick, GameEventType::MoveRejected { command, error }));
                }
            }
        }

        let tick = self.tick + 1;
        for time in tick_to_sample(self.tick) + 1..=tick_to_sample(tick) {
            for collision in detect_collisions_at(self, time) {
                let already_taken = [collision.first, collision.second]
                    .iter()
                    .any(|id| self.pieces[*id as usize].captured);
                if already_taken {
                    continue;
                }
                for (victim, attacker, position) in collision.victims() {
                    if let Some(attacker) = attacker {
                        events.push(self.capture_piece(attacker, victim, position, tick));
                    }
                }
            }
        }
        self.tick = tick;

        let arrived: Vec<PieceId> = self
            .moves
            .values()
            .filter(|m| m.completion_tick <= tick)
            .map(|m| m.piece_id)
            .collect();
        for piece_id in arrived {
            events.extend(self.complete_move(piece_id));
        }

        events.extend(eliminate_kingless_players(self));
        events.extend(check_game_over(self, EndReason::KingCaptured));
        self.assert_invariants();
        events
    }

    fn capture_piece(&mut self, attacker: PieceId, victim: PieceId, position: FixedPos, tick: u64) -> GameEvent {
        let square = position.nearest_square();
        let victim_square = self.pieces[victim as usize].square;
        self.pieces[victim as usize].captured = true;
        if self.moves.remove(&victim).is_none() {
            self.board.remove(victim_square, victim);
        }
        if let Some(mv) = self.moves.get_mut(&attacker) {
            mv.captured.push(victim);
        }
        self.captures.push(Capture { attacker, victim, tick, square });
        debug!("[Engine] tick={} piece {} captured piece {} at {}", tick, attacker, victim, square);
        GameEvent::new(tick, GameEventType::Capture { attacker, victim, square })
    }

    fn complete_move(&mut self, piece_id: PieceId) -> Vec<GameEvent> {
        let Some(mv) = self.moves.remove(&piece_id) else {
            return Vec::new();
        };
        let destination = mv.destination();
        self.pieces[piece_id as usize].square = destination;
        if let Some(other) = self.board.place(destination, piece_id) {
            panic!("pieces {other} and {piece_id} both rest on {destination} at tick {}", self.tick);
        }
        self.cooldowns.insert(piece_id, self.tick + self.speed.cooldown_ticks());

        let mut events = vec![GameEvent::new(
            self.tick,
            GameEventType::MoveCompleted { piece_id, square: destination },
        )];
        events.extend(apply_promotion(self, piece_id));
        events
    }

    /// Resting pieces and the occupancy map must agree exactly after every tick.
    fn assert_invariants(&self) {
        let mut resting = 0;
        for piece in self.live_pieces().filter(|p| !is_piece_moving(self, p.id)) {
            resting += 1;
            assert_eq!(
                self.board.occupant(piece.square),
                Some(piece.id),
                "occupancy out of sync for piece {} at tick {}",
                piece.id,
                self.tick
            );
        }
        assert_eq!(
            self.board.occupied_count(),
            resting,
            "board holds pieces that are not resting at tick {}",
            self.tick
        );
        for mv in self.moves.values() {
            assert!(mv.path.len() >= 2, "move of piece {} has no path", mv.piece_id);
        }
    }

    /// Every `(piece, destination)` the player could submit right now.
    pub fn get_legal_moves(&self, player: PlayerId) -> Vec<MoveCommand> {
        if !self.is_active() || !self.is_player_active(player) {
            return Vec::new();
        }
        let mut legal = Vec::new();
        for piece in self.live_pieces().filter(|p| p.owner == player) {
            if is_piece_moving(self, piece.id) || is_piece_on_cooldown(self, piece.id, self.tick) {
                continue;
            }
            let mut targets = self.board.reachable_squares(piece);
            if piece.piece_type == PieceType::King && !piece.moved {
                let (fr, fc) = self.board_type().forward(player);
                targets.push(piece.square.offset(2 * fc, 2 * fr));
                targets.push(piece.square.offset(-2 * fc, -2 * fr));
            }
            for destination in targets {
                if plan_move(self, piece, destination).is_ok() {
                    legal.push(MoveCommand { player, piece_id: piece.id, destination });
                }
            }
        }
        legal
    }

    /// A player gives up; the game ends if only one player remains.
    pub fn forfeit(&mut self, player: PlayerId) -> Result<Vec<GameEvent>, MoveError> {
        if !self.is_active() {
            return Err(MoveError::GameNotActive);
        }
        let mut events: Vec<GameEvent> = eliminate_player(self, player).into_iter().collect();
        if events.is_empty() {
            return Err(MoveError::IllegalMove(format!("player {player} is not in the game")));
        }
        events.extend(check_game_over(self, EndReason::Forfeit));
        Ok(events)
    }

    /// Terminate the game from outside, e.g. on an inactivity timeout detected by the scheduler.
    pub fn force_end(&mut self, winner: Option<PlayerId>, reason: EndReason) -> Result<GameEvent, MoveError> {
        if self.is_finished() {
            return Err(MoveError::GameNotActive);
        }
        Ok(finish(self, winner, reason))
    }
}
