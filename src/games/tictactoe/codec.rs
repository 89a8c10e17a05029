//! Board text encoding.
//!
//! A board is written as 9 characters from `{'-', 'X', 'O'}`, row-major,
//! with no separators. This is both the wire payload and the display
//! contract, so `decode(encode(b)) == b` for every board and
//! `encode(decode(t)) == t` for every valid `t`.

use super::error::{FormatReason, GameError};
use super::types::{Board, Square};
use std::fmt;
use std::str::FromStr;
use tracing::instrument;

/// Encoding of the all-empty board.
pub const EMPTY_ENCODING: &str = "---------";

/// Parses a board encoding.
///
/// # Errors
///
/// Returns [`GameError::Format`] if the text is not 9 characters long or
/// contains anything other than `-`, `X`, `O`.
#[instrument(level = "trace")]
pub fn decode(text: &str) -> Result<Board, GameError> {
    let length = text.chars().count();
    if length != Board::SIZE {
        return Err(GameError::Format {
            input: text.to_string(),
            reason: FormatReason::WrongLength(length),
        });
    }

    let mut squares = [Square::Empty; Board::SIZE];
    for (position, (slot, c)) in squares.iter_mut().zip(text.chars()).enumerate() {
        *slot = Square::from_symbol(c).ok_or_else(|| GameError::Format {
            input: text.to_string(),
            reason: FormatReason::BadCharacter { position, found: c },
        })?;
    }

    Ok(Board::from_squares(squares))
}

/// Writes a board encoding. Never fails.
pub fn encode(board: &Board) -> String {
    board.squares().iter().map(|s| s.symbol()).collect()
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

impl FromStr for Board {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        encode(&board)
    }
}

impl TryFrom<String> for Board {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        decode(&value)
    }
}
