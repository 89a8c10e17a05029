//! Weighted move tables learned through self-play.

use crate::games::tictactoe::{Board, Mark, Move, Policy};
use rand::Rng;
use std::collections::HashMap;
use tracing::trace;

/// Weight every legal cell starts with.
const INITIAL_WEIGHT: u32 = 3;

/// Per-position move weights for one side.
///
/// Each board seen gets a 9-slot weight row; occupied cells stay at 0 so
/// they can never be drawn.
#[derive(Debug, Clone, Default)]
pub struct Brain {
    weights: HashMap<Board, [u32; 9]>,
}

impl Brain {
    /// Creates an untrained brain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of positions with learned weights.
    pub fn positions(&self) -> usize {
        self.weights.len()
    }

    /// Current weights for `board`, if seen before.
    pub fn weights(&self, board: &Board) -> Option<&[u32; 9]> {
        self.weights.get(board)
    }

    fn row(&mut self, board: &Board) -> &mut [u32; 9] {
        self.weights.entry(*board).or_insert_with(|| {
            let mut row = [0; 9];
            for index in board.empty_cells() {
                row[index] = INITIAL_WEIGHT;
            }
            row
        })
    }

    /// Draws a cell with probability proportional to its weight.
    pub fn pick<R: Rng>(&mut self, board: &Board, rng: &mut R) -> Option<usize> {
        let row = self.row(board);
        let total: u32 = row.iter().sum();
        if total == 0 {
            return None;
        }

        let mut ticket = rng.random_range(0..total);
        for (index, weight) in row.iter().enumerate() {
            if ticket < *weight {
                return Some(index);
            }
            ticket -= weight;
        }
        None
    }

    /// Adjusts the weight of `index` on `board`. Never drops below 1.
    pub fn reinforce(&mut self, board: &Board, index: usize, delta: i64) {
        let row = self.row(board);
        if let Some(weight) = row.get_mut(index) {
            let next = (i64::from(*weight) + delta).max(1);
            *weight = u32::try_from(next).unwrap_or(u32::MAX);
            trace!(%board, index, weight = *weight, "Reinforced");
        }
    }

    /// Applies `delta` to every move in `moves` played by `mark`.
    ///
    /// `moves` must be the full history of a game from the empty board.
    pub(crate) fn reinforce_history(
        &mut self,
        moves: &[Move],
        mark: Mark,
        delta: impl Fn(usize) -> i64,
    ) {
        let mut board = Board::new();
        for (turn, mv) in moves.iter().enumerate() {
            if mv.mark == mark {
                self.reinforce(&board, mv.index, delta(turn));
            }
            let _ = board.set(mv.index, mv.mark.into());
        }
    }
}

/// A [`Brain`] paired with a random source, usable as a move [`Policy`].
pub struct BrainPolicy<'a, R: Rng> {
    brain: &'a mut Brain,
    rng: &'a mut R,
}

impl<'a, R: Rng> BrainPolicy<'a, R> {
    /// Borrows a brain and an RNG.
    pub fn new(brain: &'a mut Brain, rng: &'a mut R) -> Self {
        Self { brain, rng }
    }
}

impl<R: Rng> Policy for BrainPolicy<'_, R> {
    fn choose(&mut self, board: &Board, _mark: Mark) -> Option<usize> {
        self.brain.pick(board, &mut *self.rng)
    }
}
