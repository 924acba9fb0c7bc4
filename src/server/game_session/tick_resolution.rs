/// Tick scheduling for a GameSession.
/// Runs the fixed-rate interval, lets AI players decide, advances the engine and broadcasts.

use std::time::Duration;
use actix::prelude::*;
use log::{info, warn};

use crate::game::demo::render::{render_board, render_status};
use crate::game::events::GameEvent;
use crate::server::game_session::messages::{GameEnded, GameEventsUpdate};
use crate::server::game_session::server::GameSession;

/// Start the tick interval for this session.
pub fn start_ticking(this: &mut GameSession, ctx: &mut Context<GameSession>) {
    let period = Duration::from_millis(this.state.speed.tick_ms());
    let handle = ctx.run_interval(period, |act, ctx| {
        resolve_tick(act, ctx);
    });
    this.tick_timer = Some(handle);
}

/// Let AI players queue their moves for this boundary.
fn collect_ai_moves(this: &mut GameSession) {
    let tick = this.state.tick;
    for (player, ai) in this.ai_players.iter_mut() {
        if !this.state.is_player_active(*player) || !ai.should_move(&this.state, *player, tick) {
            continue;
        }
        if let Some(command) = ai.get_move(&this.state, *player) {
            if let Err(err) = this.state.queue_move(command) {
                warn!("[GameSession] game_id={} dropped AI move {:?}: {}", this.game_id, command, err);
            }
        }
    }
}

/// Advance one tick, broadcast the events and stop the interval when the game ends.
pub fn resolve_tick(this: &mut GameSession, ctx: &mut Context<GameSession>) {
    if !this.state.is_active() {
        stop_ticking(this, ctx);
        return;
    }
    collect_ai_moves(this);
    let events = this.state.advance_tick();
    this.broadcast(events);

    if this.state.is_finished() {
        stop_ticking(this, ctx);
    }
}

/// Cancel the interval and tell the manager the game is over.
pub fn stop_ticking(this: &mut GameSession, ctx: &mut Context<GameSession>) {
    if let Some(handle) = this.tick_timer.take() {
        ctx.cancel_future(handle);
        info!(
            "[GameSession] game_id={} finished: {}\n{}",
            this.game_id,
            render_status(&this.state),
            render_board(&this.state)
        );
        if let Some(manager) = &this.manager {
            manager.do_send(GameEnded { game_id: this.game_id });
        }
    }
}

impl GameSession {
    pub fn broadcast(&self, events: Vec<GameEvent>) {
        if events.is_empty() {
            return;
        }
        let update = GameEventsUpdate {
            game_id: self.game_id,
            tick: self.state.tick,
            events,
        };
        for subscriber in &self.subscribers {
            subscriber.do_send(update.clone());
        }
    }
}
