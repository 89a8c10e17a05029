//! Compute engine contract.
//!
//! The engine decides bot moves and trains its policy. It is consumed
//! through the narrow [`Engine`] trait so the worker, the protocol and the
//! rules can be exercised against a fake without the real artifact.

mod adapter;
mod brain;
mod local;

pub use adapter::EngineAdapter;
pub use brain::{Brain, BrainPolicy};
pub use local::LocalEngine;

use crate::games::tictactoe::{GameError, Outcome};
use serde::{Deserialize, Serialize};

/// Operations a compute engine provides.
///
/// Every call runs synchronously on the worker thread. `train` may take
/// seconds to minutes and reports nothing until it finishes.
pub trait Engine: Send {
    /// Runs self-play training and replaces the current policy.
    fn train(&mut self, config: &TrainConfig) -> TrainReport;

    /// Current board, encoded.
    fn board(&self) -> String;

    /// Applies a human X move.
    fn make_move_x(&mut self, index: usize) -> Result<Outcome, GameError>;

    /// Applies a human O move.
    fn make_move_o(&mut self, index: usize) -> Result<Outcome, GameError>;

    /// Lets the engine pick and apply its own move as X.
    fn make_bot_move_x(&mut self) -> Result<Outcome, GameError>;

    /// Clears to the initial board.
    fn reset_board(&mut self);
}

/// Training parameters. Absent fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_setters::Setters)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct TrainConfig {
    /// Self-play games to run.
    pub game_count: u32,
    /// Extra weight for the move that completed a win.
    pub winning_move_boost: u32,
    /// Weight added to each move of the winner.
    pub win_boost: u32,
    /// Weight removed from each move of the loser.
    pub loose_boost: u32,
    /// Weight added to each move of a tied game.
    pub tie_boost: u32,
    /// Fixed RNG seed for reproducible runs.
    #[setters(strip_option)]
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            game_count: 20_000,
            winning_move_boost: 8,
            win_boost: 3,
            loose_boost: 1,
            tie_boost: 1,
            seed: None,
        }
    }
}

/// Summary of a training run.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_new::new,
    derive_more::Display,
)]
#[display(
    "{games} games in {elapsed_ms} ms: X won {x_wins}, O won {o_wins}, {ties} ties"
)]
pub struct TrainReport {
    /// Games played.
    pub games: u32,
    /// Games won by X.
    pub x_wins: u32,
    /// Games won by O.
    pub o_wins: u32,
    /// Tied games.
    pub ties: u32,
    /// Wall-clock duration.
    pub elapsed_ms: u64,
}
