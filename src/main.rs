//! Demo entry point.
//!
//! Starts the actor system, creates one AI-vs-AI lightning game and prints its event stream as
//! JSON until the game ends (or the demo time limit forces it to end).

use std::time::Duration;

use actix::prelude::*;
use log::{error, info};
use turnless_chess::ai::AiKind;
use turnless_chess::config::{GameConfig, SpeedConfig};
use turnless_chess::game::events::{events_to_json, GameEventType};
use turnless_chess::game::state::EndReason;
use turnless_chess::game::types::BoardType;
use turnless_chess::server::game_session::messages::{ForceEnd, GameEventsUpdate};
use turnless_chess::server::game_session::server::{CreateGame, GameSessionManager, GetGameSession};

/// Wall-clock limit for the demo game.
const DEMO_TIME_LIMIT: Duration = Duration::from_secs(180);

/// Prints every update and stops the system on game over.
struct EventPrinter;

impl Actor for EventPrinter {
    type Context = Context<Self>;
}

impl Handler<GameEventsUpdate> for EventPrinter {
    type Result = ();

    fn handle(&mut self, msg: GameEventsUpdate, _: &mut Context<Self>) -> Self::Result {
        match events_to_json(&msg.events) {
            Ok(json) => println!("{json}"),
            Err(err) => error!("Failed to serialize events: {}", err),
        }
        if msg.events.iter().any(|e| matches!(e.kind, GameEventType::GameOver { .. })) {
            System::current().stop();
        }
    }
}

/// Create the demo game and arm its time limit.
async fn start_demo(printer: Addr<EventPrinter>) -> Result<(), String> {
    let manager = GameSessionManager::new().start();
    let game_id = manager
        .send(CreateGame {
            config: GameConfig::new(BoardType::Standard, SpeedConfig::Lightning),
            ai_players: vec![(1, AiKind::Heuristic { level: 3 }), (2, AiKind::Heuristic { level: 1 })],
            seed: 2024,
            subscribers: vec![printer.recipient()],
        })
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())?;
    let session = manager
        .send(GetGameSession { game_id })
        .await
        .map_err(|e| e.to_string())??;
    info!("Demo game {} started", game_id);

    actix::spawn(async move {
        actix::clock::sleep(DEMO_TIME_LIMIT).await;
        session.do_send(ForceEnd { winner: None, reason: EndReason::ForcedEnd });
    });
    Ok(())
}

fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (e.g. RUST_LOG=info).
    env_logger::init();

    let system = System::new();
    let started = system.block_on(async {
        let printer = EventPrinter.start();
        start_demo(printer).await
    });
    if let Err(err) = started {
        error!("Could not start the demo game: {}", err);
        return Ok(());
    }
    system.run()
}
