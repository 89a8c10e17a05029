//! Tests for move application, outcomes and bot move selection.

use brain_games::games::tictactoe::{
    Game, IllegalMoveReason, Move, Policy, apply_move, choose_bot_move, reset,
};
use brain_games::{Board, GameError, Mark, Outcome, decode};

fn board(text: &str) -> Board {
    decode(text).unwrap()
}

#[test]
fn test_apply_move_changes_one_cell() {
    let before = board("X---O----");
    let (after, outcome) = apply_move(&before, 8, Mark::X).unwrap();

    assert_eq!(after.to_string(), "X---O---X");
    assert_eq!(outcome, Outcome::InProgress);
    // Input untouched
    assert_eq!(before.to_string(), "X---O----");

    let changed = (0..9).filter(|&i| before.get(i) != after.get(i)).count();
    assert_eq!(changed, 1);
}

#[test]
fn test_apply_move_occupied_fails() {
    let before = board("X--------");
    let err = apply_move(&before, 0, Mark::O).unwrap_err();

    assert_eq!(
        err,
        GameError::IllegalMove {
            index: 0,
            reason: IllegalMoveReason::Occupied,
        }
    );
    assert_eq!(before.to_string(), "X--------");
}

#[test]
fn test_apply_move_out_of_range_fails() {
    let err = apply_move(&Board::new(), 9, Mark::X).unwrap_err();
    assert_eq!(
        err,
        GameError::IllegalMove {
            index: 9,
            reason: IllegalMoveReason::OutOfRange,
        }
    );
}

#[test]
fn test_apply_move_detects_win() {
    let (after, outcome) = apply_move(&board("XX-OO----"), 2, Mark::X).unwrap();
    assert_eq!(after.to_string(), "XXXOO----");
    assert_eq!(outcome, Outcome::Win(Mark::X));
}

#[test]
fn test_apply_move_detects_tie() {
    let (after, outcome) = apply_move(&board("XOXXOOOX-"), 8, Mark::X).unwrap();
    assert!(after.is_full());
    assert_eq!(outcome, Outcome::Tie);
}

#[test]
fn test_alternating_moves_fill_to_tie() {
    let mut game = Game::new();
    let moves = [0, 1, 2, 4, 3, 5, 7, 6, 8];
    let mut mark = Mark::X;
    let mut outcome = Outcome::InProgress;
    for index in moves {
        outcome = game.play(index, mark).unwrap();
        mark = mark.opponent();
    }

    assert_eq!(game.board().to_string(), "XOXXOOOXX");
    assert_eq!(outcome, Outcome::Tie);
    assert_eq!(game.outcome(), Outcome::Tie);
}

#[test]
fn test_win_on_last_cell_beats_tie() {
    let (_, outcome) = apply_move(&board("OXOXXOO-X"), 7, Mark::X).unwrap();
    assert_eq!(outcome, Outcome::Win(Mark::X));
}

#[test]
fn test_turn_is_not_enforced() {
    let (after, _) = apply_move(&board("X--------"), 1, Mark::X).unwrap();
    assert_eq!(after.to_string(), "XX-------");
    assert_eq!(after.next_turn(), Mark::O);
}

#[test]
fn test_reset_is_empty() {
    assert_eq!(reset(), Board::new());
    assert_eq!(reset().to_string(), "---------");
}

struct Fixed(Option<usize>);

impl Policy for Fixed {
    fn choose(&mut self, _board: &Board, _mark: Mark) -> Option<usize> {
        self.0
    }
}

#[test]
fn test_choose_bot_move_keeps_valid_pick() {
    let index = choose_bot_move(&mut Fixed(Some(5)), &board("X---O----"), Mark::X).unwrap();
    assert_eq!(index, 5);
}

#[test]
fn test_choose_bot_move_falls_back_on_occupied_pick() {
    let index = choose_bot_move(&mut Fixed(Some(0)), &board("XO-------"), Mark::X).unwrap();
    assert_eq!(index, 2);
}

#[test]
fn test_choose_bot_move_falls_back_on_no_pick() {
    let index = choose_bot_move(&mut Fixed(None), &board("XOX------"), Mark::X).unwrap();
    assert_eq!(index, 3);
}

#[test]
fn test_choose_bot_move_full_board() {
    let err = choose_bot_move(&mut Fixed(Some(0)), &board("XOXXOOOXX"), Mark::X).unwrap_err();
    assert_eq!(err, GameError::NoLegalMove);
}

#[test]
fn test_game_records_history() {
    let mut game = Game::new();
    assert_eq!(game.play(4, Mark::X).unwrap(), Outcome::InProgress);
    assert_eq!(game.play(0, Mark::O).unwrap(), Outcome::InProgress);
    assert!(game.play(4, Mark::O).is_err());

    assert_eq!(
        game.history(),
        &[Move::new(4, Mark::X), Move::new(0, Mark::O)]
    );
    assert_eq!(game.board().to_string(), "O---X----");

    game.reset();
    assert!(game.history().is_empty());
    assert_eq!(*game.board(), Board::new());
}
