//! Uniform random mover, used to exercise the engine's mechanics.

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};

use crate::ai::AiPlayer;
use crate::game::state::{GameState, MoveCommand};
use crate::game::types::PlayerId;

const MOVE_PROBABILITY: f64 = 0.2;

pub struct RandomAi {
    rng: StdRng,
}

impl RandomAi {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl AiPlayer for RandomAi {
    fn should_move(&mut self, state: &GameState, _player: PlayerId, _tick: u64) -> bool {
        state.is_active() && self.rng.random_bool(MOVE_PROBABILITY)
    }

    fn get_move(&mut self, state: &GameState, player: PlayerId) -> Option<MoveCommand> {
        state.get_legal_moves(player).into_iter().choose(&mut self.rng)
    }
}
