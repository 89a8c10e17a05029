//! Tic-tac-toe: board encoding, rules and owned game state.

mod action;
pub mod codec;
mod error;
mod game;
pub mod rules;
mod types;

pub use action::Move;
pub use codec::{EMPTY_ENCODING, decode, encode};
pub use error::{FormatReason, GameError, IllegalMoveReason};
pub use game::Game;
pub use rules::{Outcome, Policy, apply_move, choose_bot_move, reset};
pub use types::{Board, Mark, Square};
