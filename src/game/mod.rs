pub mod types;
pub mod error;
pub mod board;
pub mod layout;
pub mod state;
pub mod events;
pub mod engine;
pub mod replay;

pub mod systems;
pub mod demo;
