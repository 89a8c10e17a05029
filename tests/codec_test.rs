//! Tests for the board text encoding.

use brain_games::games::tictactoe::{EMPTY_ENCODING, FormatReason};
use brain_games::{Board, GameError, Mark, Square, decode, encode};

#[test]
fn test_empty_board_encoding() {
    assert_eq!(encode(&Board::new()), EMPTY_ENCODING);
    assert_eq!(decode(EMPTY_ENCODING).unwrap(), Board::new());
}

#[test]
fn test_decode_places_marks_row_major() {
    let board = decode("X---O---X").unwrap();
    assert_eq!(board.get(0), Some(Square::Occupied(Mark::X)));
    assert_eq!(board.get(4), Some(Square::Occupied(Mark::O)));
    assert_eq!(board.get(8), Some(Square::Occupied(Mark::X)));
    assert_eq!(board.empty_cells().count(), 6);
}

#[test]
fn test_every_encoding_survives_decode() {
    const SYMBOLS: [char; 3] = ['-', 'X', 'O'];

    for mut n in 0..3usize.pow(9) {
        let text: String = (0..9)
            .map(|_| {
                let symbol = SYMBOLS[n % 3];
                n /= 3;
                symbol
            })
            .collect();
        assert_eq!(encode(&decode(&text).unwrap()), text);
    }
}

#[test]
fn test_decode_rejects_wrong_length() {
    let err = decode("XO").unwrap_err();
    assert_eq!(
        err,
        GameError::Format {
            input: "XO".to_string(),
            reason: FormatReason::WrongLength(2),
        }
    );

    assert!(decode("----------").is_err());
    assert!(decode("").is_err());
}

#[test]
fn test_decode_rejects_bad_character() {
    match decode("XO-?-----") {
        Err(GameError::Format {
            reason: FormatReason::BadCharacter { position, found },
            ..
        }) => {
            assert_eq!(position, 3);
            assert_eq!(found, '?');
        }
        other => panic!("expected bad character error, got {other:?}"),
    }
}

#[test]
fn test_decode_is_case_sensitive() {
    assert!(decode("x--------").is_err());
}

#[test]
fn test_board_display_and_parse() {
    let board: Board = "--X-O----".parse().unwrap();
    assert_eq!(board.to_string(), "--X-O----");
}

#[test]
fn test_board_serializes_as_encoding() {
    let board = decode("XO-------").unwrap();
    assert_eq!(serde_json::to_string(&board).unwrap(), "\"XO-------\"");

    let back: Board = serde_json::from_str("\"XO-------\"").unwrap();
    assert_eq!(back, board);
    assert!(serde_json::from_str::<Board>("\"XO\"").is_err());
}
