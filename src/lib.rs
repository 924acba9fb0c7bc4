//! Real-time, turnless chess engine.
//!
//! Pieces travel continuously along their paths, capture by colliding with an opposing piece
//! and cool down after every move. The engine (`game`) is deterministic and tick-driven; `ai`
//! provides computer opponents; `server` hosts the actors that tick games in real time.

pub mod config;
pub mod game;
pub mod ai;
pub mod server;
