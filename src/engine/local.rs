//! Built-in engine: two weighted brains trained by self-play.

use super::brain::{Brain, BrainPolicy};
use super::{Engine, TrainConfig, TrainReport};
use crate::games::tictactoe::{Game, GameError, Mark, Move, Outcome, choose_bot_move};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// In-process engine used when no external artifact is supplied.
///
/// The live game is owned here and only mutated through [`Engine`] calls.
#[derive(Debug, Clone)]
pub struct LocalEngine {
    game: Game,
    bot_x: Brain,
    bot_o: Brain,
    rng: SmallRng,
}

impl LocalEngine {
    /// Creates an untrained engine seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_os_rng())
    }

    /// Creates an untrained engine with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Self {
            game: Game::new(),
            bot_x: Brain::new(),
            bot_o: Brain::new(),
            rng,
        }
    }

    /// The live game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The brain that plays X.
    pub fn bot_x(&self) -> &Brain {
        &self.bot_x
    }

    /// Plays one self-play game (X opens) and returns its history.
    fn self_play(&mut self) -> (Vec<Move>, Outcome) {
        let mut game = Game::new();
        let mut mark = Mark::X;

        loop {
            let brain = match mark {
                Mark::X => &mut self.bot_x,
                Mark::O => &mut self.bot_o,
            };
            let mut policy = BrainPolicy::new(brain, &mut self.rng);
            let played = choose_bot_move(&mut policy, game.board(), mark)
                .and_then(|index| game.play(index, mark));

            match played {
                Ok(outcome) if outcome.is_over() => return (game.history().to_vec(), outcome),
                Ok(_) => mark = mark.opponent(),
                Err(_) => return (game.history().to_vec(), game.outcome()),
            }
        }
    }

    fn learn(&mut self, moves: &[Move], outcome: Outcome, config: &TrainConfig) {
        let last = moves.len().saturating_sub(1);
        let win = i64::from(config.win_boost);
        let finisher = i64::from(config.winning_move_boost);
        let loss = -i64::from(config.loose_boost);
        let tie = i64::from(config.tie_boost);

        match outcome {
            Outcome::Win(winner) => {
                let (won, lost) = match winner {
                    Mark::X => (&mut self.bot_x, &mut self.bot_o),
                    Mark::O => (&mut self.bot_o, &mut self.bot_x),
                };
                won.reinforce_history(moves, winner, |turn| {
                    if turn == last { win + finisher } else { win }
                });
                lost.reinforce_history(moves, winner.opponent(), |_| loss);
            }
            Outcome::Tie => {
                self.bot_x.reinforce_history(moves, Mark::X, |_| tie);
                self.bot_o.reinforce_history(moves, Mark::O, |_| tie);
            }
            Outcome::InProgress => {}
        }
    }
}

impl Default for LocalEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for LocalEngine {
    #[instrument(skip(self))]
    fn train(&mut self, config: &TrainConfig) -> TrainReport {
        let started = Instant::now();
        self.game.reset();
        self.bot_x = Brain::new();
        self.bot_o = Brain::new();
        if let Some(seed) = config.seed {
            self.rng = SmallRng::seed_from_u64(seed);
        }

        let mut report = TrainReport::default();
        for game in 0..config.game_count {
            let (moves, outcome) = self.self_play();
            self.learn(&moves, outcome, config);

            match outcome {
                Outcome::Win(Mark::X) => report.x_wins += 1,
                Outcome::Win(Mark::O) => report.o_wins += 1,
                Outcome::Tie => report.ties += 1,
                Outcome::InProgress => {}
            }
            report.games += 1;

            if game > 0 && game % 10_000 == 0 {
                debug!(game, "Training progress");
            }
        }

        report.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            %report,
            positions_x = self.bot_x.positions(),
            positions_o = self.bot_o.positions(),
            "Training finished"
        );
        report
    }

    fn board(&self) -> String {
        self.game.board().to_string()
    }

    fn make_move_x(&mut self, index: usize) -> Result<Outcome, GameError> {
        self.game.play(index, Mark::X)
    }

    fn make_move_o(&mut self, index: usize) -> Result<Outcome, GameError> {
        self.game.play(index, Mark::O)
    }

    #[instrument(skip(self))]
    fn make_bot_move_x(&mut self) -> Result<Outcome, GameError> {
        let mut policy = BrainPolicy::new(&mut self.bot_x, &mut self.rng);
        let index = choose_bot_move(&mut policy, self.game.board(), Mark::X)?;
        debug!(index, "Bot chose move");
        self.game.play(index, Mark::X)
    }

    fn reset_board(&mut self) {
        self.game.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_report_adds_up() {
        let mut engine = LocalEngine::with_seed(1);
        let config = TrainConfig::default().with_game_count(500).with_seed(11);

        let report = engine.train(&config);

        assert_eq!(report.games, 500);
        assert_eq!(report.x_wins + report.o_wins + report.ties, 500);
        assert!(engine.bot_x().positions() > 0);
    }

    #[test]
    fn test_train_is_reproducible_with_seed() {
        let config = TrainConfig::default().with_game_count(200).with_seed(5);

        let first = LocalEngine::with_seed(1).train(&config);
        let second = LocalEngine::with_seed(2).train(&config);

        assert_eq!(first.x_wins, second.x_wins);
        assert_eq!(first.o_wins, second.o_wins);
        assert_eq!(first.ties, second.ties);
    }

    #[test]
    fn test_train_starts_fresh_game() {
        let mut engine = LocalEngine::with_seed(3);
        engine.make_move_x(4).unwrap();

        engine.train(&TrainConfig::default().with_game_count(50));

        assert_eq!(engine.board(), "---------");
        assert!(engine.game().history().is_empty());
    }

    #[test]
    fn test_bot_fills_board_then_refuses() {
        let mut engine = LocalEngine::with_seed(9);

        for _ in 0..9 {
            engine.make_bot_move_x().unwrap();
        }

        assert_eq!(engine.board(), "XXXXXXXXX");
        assert_eq!(engine.make_bot_move_x(), Err(GameError::NoLegalMove));
    }
}
