//! Heuristic AI controller.
//!
//! Scores every legal move with the tactics module and picks the best one after adding noise.
//! Higher levels see more of the arrival field and add less noise.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};

use crate::ai::arrival::ArrivalField;
use crate::ai::tactics::{score_move, Candidate, ScoringTerms};
use crate::ai::AiPlayer;
use crate::config::ai::{level_index, MOVE_PROBABILITY, NOISE, THINK_INTERVAL_SQUARES, TOP_K_LEVEL_ONE};
use crate::config::speed::SpeedConfig;
use crate::game::state::{GameState, MoveCommand};
use crate::game::types::PlayerId;

pub struct HeuristicAi {
    level: u8,
    speed: SpeedConfig,
    rng: StdRng,
    last_decision: Option<u64>,
}

impl HeuristicAi {
    pub fn new(level: u8, speed: SpeedConfig, seed: u64) -> Self {
        Self {
            level,
            speed,
            rng: StdRng::seed_from_u64(seed),
            last_decision: None,
        }
    }

    fn terms(&self) -> ScoringTerms {
        ScoringTerms {
            safety: self.level >= 2,
            exposure: self.level >= 3,
            dodge: self.level >= 3,
            recapture: self.level >= 3,
        }
    }

    fn think_interval(&self) -> u64 {
        THINK_INTERVAL_SQUARES[level_index(self.level)] * self.speed.ticks_per_square()
    }
}

impl AiPlayer for HeuristicAi {
    fn should_move(&mut self, state: &GameState, _player: PlayerId, tick: u64) -> bool {
        if !state.is_active() {
            return false;
        }
        if self.last_decision.is_some_and(|last| tick < last + self.think_interval()) {
            return false;
        }
        let act = self.rng.random_bool(MOVE_PROBABILITY[level_index(self.level)]);
        if act {
            self.last_decision = Some(tick);
        }
        act
    }

    fn get_move(&mut self, state: &GameState, player: PlayerId) -> Option<MoveCommand> {
        let legal = state.get_legal_moves(player);
        if legal.is_empty() {
            return None;
        }
        let field = (self.level >= 2).then(|| ArrivalField::compute(state, state.tick));
        let terms = self.terms();
        let noise = NOISE[level_index(self.level)];

        let mut scored: Vec<(i32, MoveCommand)> = legal
            .into_iter()
            .filter_map(|command| Candidate::new(state, command))
            .map(|candidate| {
                let score = score_move(state, field.as_ref(), &candidate, terms)
                    + self.rng.random_range(-noise..=noise);
                (score, candidate.command)
            })
            .collect();
        // Stable sort keeps the legal-move order among equal scores.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let pick = if self.level <= 1 {
            scored.iter().take(TOP_K_LEVEL_ONE).choose(&mut self.rng).copied()
        } else {
            scored.first().copied()
        };
        if let Some((score, command)) = pick {
            debug!(
                "[AI] level={} player={} piece={} -> {} score={}",
                self.level, player, command.piece_id, command.destination, score
            );
        }
        pick.map(|(_, command)| command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::game::GameConfig;
    use crate::game::types::{BoardType, Square};

    fn active(layout: &str) -> GameState {
        let config = GameConfig::new(BoardType::Standard, SpeedConfig::Standard).with_layout(layout);
        let mut state = GameState::new(&config).expect("valid layout");
        state.start().expect("start");
        state
    }

    #[test]
    fn test_level_three_takes_free_queen() {
        let state = active(
            "....k...
             ........
             ........
             ...q....
             ........
             ........
             ...R....
             K.......",
        );
        let mut ai = HeuristicAi::new(3, SpeedConfig::Standard, 7);
        let command = ai.get_move(&state, 1).expect("a move");
        assert_eq!(command.destination, Square::new(3, 3));
    }

    #[test]
    fn test_should_move_respects_think_interval() {
        let state = active(
            "....k...
             ........
             ........
             ........
             ........
             ........
             ........
             K.......",
        );
        let mut ai = HeuristicAi::new(3, SpeedConfig::Standard, 1);
        let first = (0..50).find(|tick| ai.should_move(&state, 1, *tick)).expect("acts eventually");
        for tick in first + 1..first + 10 {
            assert!(!ai.should_move(&state, 1, tick));
        }
    }

    #[test]
    fn test_same_seed_same_choice() {
        let config = GameConfig::new(BoardType::Standard, SpeedConfig::Standard);
        let mut state = GameState::new(&config).expect("default layout");
        state.start().expect("start");
        let mut a = HeuristicAi::new(1, SpeedConfig::Standard, 99);
        let mut b = HeuristicAi::new(1, SpeedConfig::Standard, 99);
        assert_eq!(a.get_move(&state, 2), b.get_move(&state, 2));
    }
}
