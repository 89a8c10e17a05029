//! Errors raised by the board codec and the game rules.

use serde::{Deserialize, Serialize};

/// Why a board encoding was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum FormatReason {
    /// Encoding is not exactly 9 characters long.
    #[display("expected 9 characters, found {_0}")]
    WrongLength(usize),
    /// Encoding contains a character outside `-`, `X`, `O`.
    #[display("unexpected {found:?} at position {position}")]
    BadCharacter {
        /// Offending position (0-8).
        position: usize,
        /// Offending character.
        found: char,
    },
}

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum IllegalMoveReason {
    /// Index is not in 0-8.
    #[display("index out of range (must be 0-8)")]
    OutOfRange,
    /// Cell already holds a mark.
    #[display("square is already occupied")]
    Occupied,
}

/// Error from the board codec or the game rules.
///
/// Travels inside worker responses, so it is serializable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum GameError {
    /// Malformed board encoding.
    #[display("Malformed board encoding {input:?}: {reason}")]
    Format {
        /// The rejected text.
        input: String,
        /// What was wrong with it.
        reason: FormatReason,
    },

    /// Move targets an occupied or out-of-range cell.
    #[display("Illegal move at {index}: {reason}")]
    IllegalMove {
        /// Requested index.
        index: usize,
        /// What was wrong with it.
        reason: IllegalMoveReason,
    },

    /// Bot asked to move on a full board.
    #[display("No legal move: the board is full")]
    NoLegalMove,
}

impl std::error::Error for GameError {}
