//! Owned game state.

use super::rules::{self, Outcome};
use super::{Board, GameError, Mark, Move};
use tracing::{debug, instrument};

/// A board plus the moves that produced it.
///
/// Whoever owns a `Game` is its only mutator; readers get copies of the
/// board. Turn order is not enforced here.
#[derive(Debug, Clone, Default)]
pub struct Game {
    board: Board,
    history: Vec<Move>,
    outcome: Outcome,
}

impl Game {
    /// Creates a game on an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the moves played since the last reset.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns the outcome of the current board.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Plays `mark` at `index`.
    ///
    /// # Errors
    ///
    /// Propagates [`GameError::IllegalMove`]; the board is left unchanged.
    #[instrument(level = "debug", skip(self), fields(board = %self.board))]
    pub fn play(&mut self, index: usize, mark: Mark) -> Result<Outcome, GameError> {
        let (board, outcome) = rules::apply_move(&self.board, index, mark)?;
        self.board = board;
        self.history.push(Move::new(index, mark));
        self.outcome = outcome;
        debug!(%board, %outcome, "Move applied");
        Ok(outcome)
    }

    /// Clears back to the initial board.
    pub fn reset(&mut self) {
        self.board = rules::reset();
        self.history.clear();
        self.outcome = Outcome::InProgress;
    }
}
