//! Tie detection logic for tic-tac-toe.

use super::super::Board;
use super::win::check_winner;

/// A full board with no three-in-a-row.
pub fn is_tie(board: &Board) -> bool {
    board.is_full() && check_winner(board).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_not_tie() {
        assert!(!is_tie(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_tie() {
        let board: Board = "XOX-O----".parse().unwrap();
        assert!(!is_tie(&board));
    }

    #[test]
    fn test_tie_detection() {
        // X O X / O X X / O X O
        let board: Board = "XOXOXXOXO".parse().unwrap();
        assert!(is_tie(&board));
    }

    #[test]
    fn test_not_tie_if_winner() {
        let board: Board = "XXXOOXOXO".parse().unwrap();
        assert!(!is_tie(&board));
    }
}
