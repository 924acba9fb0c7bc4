// Demo helpers for the game: terminal rendering used by the demo binary and session logs.
pub mod render;
