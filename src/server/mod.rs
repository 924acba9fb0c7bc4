// src/server/mod.rs

//! Session layer root module.
//!
//! Hosts the actors that drive games in real time:
//! - Game session manager (creates sessions, drops finished ones)
//! - Game session (ticks the engine, runs AI seats, broadcasts events)
//!
//! Network transport lives outside this crate; it talks to these actors through messages.

pub mod game_session;
