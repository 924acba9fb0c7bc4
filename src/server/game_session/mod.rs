//! Game session orchestration: one actor per game acting as the fixed-rate tick driver.

pub mod server;
pub mod messages;
pub mod tick_resolution;

pub use server::{GameSession, GameSessionManager};
