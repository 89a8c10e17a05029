//! Game rules for tic-tac-toe.
//!
//! Pure functions over [`Board`] values: move application, outcome
//! evaluation and bot move selection. Nothing here holds state, which keeps
//! the rules testable apart from the engine and the command channel.

pub mod draw;
pub mod win;

pub use draw::is_tie;
pub use win::{LINES, check_winner};

use super::{Board, GameError, IllegalMoveReason, Mark, Square};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Result of evaluating a board.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Outcome {
    /// No winner yet and at least one empty cell.
    #[default]
    #[display("in progress")]
    InProgress,
    /// A mark has three in a row.
    #[display("{_0} wins")]
    Win(Mark),
    /// Board is full with no three-in-a-row.
    #[display("tie")]
    Tie,
}

impl Outcome {
    /// Evaluates a board from scratch.
    pub fn evaluate(board: &Board) -> Self {
        if let Some(mark) = check_winner(board) {
            Outcome::Win(mark)
        } else if board.is_full() {
            Outcome::Tie
        } else {
            Outcome::InProgress
        }
    }

    /// Whether the game has ended.
    pub fn is_over(self) -> bool {
        self != Outcome::InProgress
    }
}

/// Places `mark` at `index`, returning the new board and its outcome.
///
/// The input board is never modified; on success exactly one cell differs.
///
/// # Errors
///
/// Returns [`GameError::IllegalMove`] if `index` is out of range or the
/// cell is occupied.
#[instrument(level = "debug", skip(board), fields(board = %board))]
pub fn apply_move(board: &Board, index: usize, mark: Mark) -> Result<(Board, Outcome), GameError> {
    let reason = match board.get(index) {
        None => Some(IllegalMoveReason::OutOfRange),
        Some(Square::Occupied(_)) => Some(IllegalMoveReason::Occupied),
        Some(Square::Empty) => None,
    };
    if let Some(reason) = reason {
        return Err(GameError::IllegalMove { index, reason });
    }

    let mut next = *board;
    if !next.set(index, Square::Occupied(mark)) {
        return Err(GameError::IllegalMove {
            index,
            reason: IllegalMoveReason::OutOfRange,
        });
    }

    Ok((next, Outcome::evaluate(&next)))
}

/// The initial, all-empty board.
pub fn reset() -> Board {
    Board::new()
}

/// Something that picks moves for a bot.
pub trait Policy {
    /// Picks a cell for `mark` to play on `board`.
    ///
    /// Returning `None` or an occupied cell is tolerated by
    /// [`choose_bot_move`], which falls back to the first empty cell.
    fn choose(&mut self, board: &Board, mark: Mark) -> Option<usize>;
}

/// Asks `policy` for a move and guarantees it targets an empty cell.
///
/// # Errors
///
/// Returns [`GameError::NoLegalMove`] if the board is full.
#[instrument(level = "debug", skip(policy, board), fields(board = %board))]
pub fn choose_bot_move<P: Policy + ?Sized>(
    policy: &mut P,
    board: &Board,
    mark: Mark,
) -> Result<usize, GameError> {
    let fallback = board.empty_cells().next().ok_or(GameError::NoLegalMove)?;

    match policy.choose(board, mark) {
        Some(index) if board.is_empty(index) => Ok(index),
        picked => {
            warn!(?picked, fallback, "Policy picked an unavailable cell");
            Ok(fallback)
        }
    }
}
