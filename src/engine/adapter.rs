//! Typed wrapper around an [`Engine`].

use super::{Engine, TrainConfig, TrainReport};
use crate::games::tictactoe::{Board, GameError, Mark, Outcome, decode};
use tracing::{debug, error, info, instrument, warn};

/// Wraps an engine and re-derives a consistent board view after each call.
///
/// The engine only speaks text and loosely typed outcomes; the adapter
/// decodes its board, recomputes the outcome from it, and checks that
/// failed moves left the board alone.
#[derive(Debug)]
pub struct EngineAdapter<E> {
    engine: E,
}

impl<E: Engine> EngineAdapter<E> {
    /// Wraps a loaded engine.
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Borrows the wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Runs a training session. Blocks until it finishes.
    #[instrument(skip(self))]
    pub fn train(&mut self, config: &TrainConfig) -> TrainReport {
        info!("Training started");
        let report = self.engine.train(config);
        info!(%report, "Training complete");
        report
    }

    /// Current board, decoded.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Format`] if the engine produced a bad encoding.
    pub fn board(&self) -> Result<Board, GameError> {
        decode(&self.engine.board())
            .inspect_err(|e| error!(error = %e, "Engine returned a malformed board"))
    }

    /// Applies a human move for `mark`.
    ///
    /// # Errors
    ///
    /// Propagates [`GameError::IllegalMove`] from the engine.
    #[instrument(skip(self))]
    pub fn make_move(&mut self, mark: Mark, index: usize) -> Result<Outcome, GameError> {
        let before = self.engine.board();
        let result = match mark {
            Mark::X => self.engine.make_move_x(index),
            Mark::O => self.engine.make_move_o(index),
        };
        self.settle(before, result)
    }

    /// Lets the engine play its own move as X.
    ///
    /// # Errors
    ///
    /// Propagates [`GameError::NoLegalMove`] from the engine.
    #[instrument(skip(self))]
    pub fn make_bot_move_x(&mut self) -> Result<Outcome, GameError> {
        let before = self.engine.board();
        let result = self.engine.make_bot_move_x();
        self.settle(before, result)
    }

    /// Clears to the initial board.
    #[instrument(skip(self))]
    pub fn reset_board(&mut self) {
        self.engine.reset_board();
        match self.board() {
            Ok(board) if board == Board::new() => debug!("Board reset"),
            Ok(board) => warn!(%board, "Board not empty after reset"),
            Err(_) => {}
        }
    }

    fn settle(
        &self,
        before: String,
        result: Result<Outcome, GameError>,
    ) -> Result<Outcome, GameError> {
        let reported = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                let after = self.engine.board();
                if after != before {
                    error!(%before, %after, error = %e, "Engine changed the board on a failed move");
                }
                return Err(e);
            }
        };

        let board = self.board()?;
        let outcome = Outcome::evaluate(&board);
        if outcome != reported {
            warn!(%board, %reported, %outcome, "Engine outcome disagrees with board");
        }
        debug!(%board, %outcome, "Move settled");
        Ok(outcome)
    }
}
