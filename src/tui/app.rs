//! Application state and logic.
//!
//! The app never talks to the client itself. Keys become [`Intent`]s that
//! the event loop runs as background calls, and each finished call comes
//! back as a [`Completion`]. Controls stay disabled in between.

use crate::engine::TrainReport;
use crate::games::tictactoe::{Board, Mark, Outcome};
use crossterm::event::KeyCode;
use tracing::debug;

const TITLE_START: &str = "Can you beat me?";
const TITLE_TRAINING: &str = "Let me practice for a bit.";
const TITLE_TRAINED: &str = "Now I am ready!";

/// Who plays which mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Two people share the keyboard; marks alternate.
    #[default]
    HotSeat,
    /// The bot plays X and answers every O move.
    VsBot,
}

/// Background work the app asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Place `mark` at `index`, then let the bot answer if asked.
    Play {
        /// Mark to place.
        mark: Mark,
        /// Cell index.
        index: usize,
        /// Follow up with a bot X move.
        bot_replies: bool,
    },
    /// Bot opens the game as X.
    BotFirst,
    /// Clear the board and run a training session.
    Train,
    /// Clear the board.
    Reset,
    /// Leave the UI.
    Quit,
}

/// Result of a finished background call.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// A move (and possibly the bot's answer) was applied.
    Moved {
        /// Board after the moves.
        board: Board,
        /// Outcome after the moves.
        outcome: Outcome,
    },
    /// Training finished.
    Trained {
        /// Training summary.
        report: TrainReport,
        /// Board after training.
        board: Board,
    },
    /// The board was cleared.
    Reset {
        /// Board after the reset.
        board: Board,
    },
    /// The call failed.
    Failed {
        /// Error text for the status line.
        error: String,
    },
}

/// What the app is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Busy {
    /// A training run, with whole seconds elapsed.
    Training(u64),
    /// Any other call.
    Waiting,
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    board: Board,
    outcome: Outcome,
    mode: Mode,
    title: String,
    status: String,
    trained: bool,
    busy: Option<Busy>,
    last_report: Option<TrainReport>,
}

impl App {
    /// Creates the app showing `board`.
    pub fn new(board: Board) -> Self {
        Self {
            board,
            outcome: Outcome::evaluate(&board),
            mode: Mode::default(),
            title: TITLE_START.to_string(),
            status: "Press 1-9 to move, b to let me start".to_string(),
            trained: false,
            busy: None,
            last_report: None,
        }
    }

    /// Board on display.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Headline.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Pending work, if any.
    pub fn busy(&self) -> Option<Busy> {
        self.busy
    }

    /// Most recent training summary.
    pub fn last_report(&self) -> Option<&TrainReport> {
        self.last_report.as_ref()
    }

    /// Turns a key press into an intent. Returns `None` for keys that do
    /// nothing right now.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<Intent> {
        if matches!(key, KeyCode::Char('q') | KeyCode::Esc) {
            return Some(Intent::Quit);
        }
        if self.busy.is_some() {
            debug!(?key, "Ignoring key while busy");
            return None;
        }

        let intent = match key {
            KeyCode::Char('t') => {
                self.title = TITLE_TRAINING.to_string();
                self.busy = Some(Busy::Training(0));
                Intent::Train
            }
            KeyCode::Char('r') => Intent::Reset,
            KeyCode::Char('b') => {
                if self.board != Board::new() {
                    self.status = "I only open on an empty board. Press r to reset".to_string();
                    return None;
                }
                self.mode = Mode::VsBot;
                Intent::BotFirst
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                self.play(index)?
            }
            _ => return None,
        };

        if self.busy.is_none() {
            self.busy = Some(Busy::Waiting);
        }
        debug!(?intent, "Dispatching");
        Some(intent)
    }

    fn play(&mut self, index: usize) -> Option<Intent> {
        if self.outcome.is_over() {
            self.status = "Game over. Press r to play again".to_string();
            return None;
        }
        if !self.board.is_empty(index) {
            self.status = format!("Square {} is taken", index + 1);
            return None;
        }

        let mark = match self.mode {
            Mode::HotSeat => self.board.next_turn(),
            Mode::VsBot => Mark::O,
        };
        Some(Intent::Play {
            mark,
            index,
            bot_replies: self.mode == Mode::VsBot,
        })
    }

    /// Applies a finished call and re-enables the controls.
    pub fn complete(&mut self, completion: Completion) {
        debug!(?completion, "Call complete");
        self.busy = None;

        match completion {
            Completion::Moved { board, outcome } => {
                self.board = board;
                self.outcome = outcome;
                self.status = match outcome {
                    Outcome::InProgress => format!("{} to move", self.to_move()),
                    _ => "Press r to play again".to_string(),
                };
                if outcome.is_over() {
                    self.title = self.verdict();
                }
            }
            Completion::Trained { report, board } => {
                self.start_over(board);
                self.trained = true;
                self.title = TITLE_TRAINED.to_string();
                self.status = report.to_string();
                self.last_report = Some(report);
            }
            Completion::Reset { board } => {
                self.start_over(board);
                self.title = TITLE_START.to_string();
                self.status = "Press 1-9 to move, b to let me start".to_string();
            }
            Completion::Failed { error } => {
                if self.title == TITLE_TRAINING {
                    self.title = TITLE_START.to_string();
                }
                self.status = error;
            }
        }
    }

    /// Advances the training clock.
    pub fn tick(&mut self) {
        if let Some(Busy::Training(secs)) = &mut self.busy {
            *secs += 1;
        }
    }

    fn start_over(&mut self, board: Board) {
        self.board = board;
        self.outcome = Outcome::evaluate(&board);
        self.mode = Mode::HotSeat;
    }

    fn to_move(&self) -> Mark {
        match self.mode {
            Mode::HotSeat => self.board.next_turn(),
            Mode::VsBot => Mark::O,
        }
    }

    fn verdict(&self) -> String {
        match (self.outcome, self.mode) {
            (Outcome::Tie, _) => "A tie! Well played!".to_string(),
            (Outcome::Win(mark), Mode::HotSeat) => format!("{mark} wins!"),
            (Outcome::Win(Mark::O), Mode::VsBot) if self.trained => "You win!".to_string(),
            (Outcome::Win(Mark::O), Mode::VsBot) => "Wait! I wasn't ready.".to_string(),
            (Outcome::Win(Mark::X), Mode::VsBot) if self.trained => {
                "Gotcha! Well played".to_string()
            }
            (Outcome::Win(Mark::X), Mode::VsBot) => "Wow, I wasn't even trying!".to_string(),
            (Outcome::InProgress, _) => self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::decode;

    fn board(s: &str) -> Board {
        decode(s).unwrap()
    }

    #[test]
    fn test_digits_alternate_marks_in_hot_seat() {
        let mut app = App::new(Board::new());
        assert_eq!(
            app.handle_key(KeyCode::Char('5')),
            Some(Intent::Play {
                mark: Mark::X,
                index: 4,
                bot_replies: false
            })
        );

        app.complete(Completion::Moved {
            board: board("----X----"),
            outcome: Outcome::InProgress,
        });
        assert_eq!(
            app.handle_key(KeyCode::Char('1')),
            Some(Intent::Play {
                mark: Mark::O,
                index: 0,
                bot_replies: false
            })
        );
    }

    #[test]
    fn test_controls_disabled_until_completion() {
        let mut app = App::new(Board::new());
        assert_eq!(app.handle_key(KeyCode::Char('t')), Some(Intent::Train));
        assert_eq!(app.busy(), Some(Busy::Training(0)));
        assert_eq!(app.title(), TITLE_TRAINING);

        assert_eq!(app.handle_key(KeyCode::Char('1')), None);
        assert_eq!(app.handle_key(KeyCode::Char('r')), None);
        assert_eq!(app.handle_key(KeyCode::Char('q')), Some(Intent::Quit));

        app.tick();
        app.tick();
        assert_eq!(app.busy(), Some(Busy::Training(2)));

        app.complete(Completion::Trained {
            report: TrainReport::new(10, 5, 3, 2, 1),
            board: Board::new(),
        });
        assert_eq!(app.busy(), None);
        assert_eq!(app.title(), TITLE_TRAINED);
        assert!(app.last_report().is_some());
    }

    #[test]
    fn test_failure_reenables_controls() {
        let mut app = App::new(Board::new());
        app.handle_key(KeyCode::Char('t'));
        app.complete(Completion::Failed {
            error: "Command channel closed".to_string(),
        });

        assert_eq!(app.busy(), None);
        assert_eq!(app.title(), TITLE_START);
        assert_eq!(app.status(), "Command channel closed");
        assert_eq!(app.handle_key(KeyCode::Char('r')), Some(Intent::Reset));
    }

    #[test]
    fn test_taken_square_is_refused_locally() {
        let mut app = App::new(board("X--------"));
        assert_eq!(app.handle_key(KeyCode::Char('1')), None);
        assert_eq!(app.busy(), None);
        assert!(app.status().contains("taken"));
    }

    #[test]
    fn test_bot_opens_only_on_empty_board() {
        let mut app = App::new(board("X--------"));
        assert_eq!(app.handle_key(KeyCode::Char('b')), None);

        let mut app = App::new(Board::new());
        assert_eq!(app.handle_key(KeyCode::Char('b')), Some(Intent::BotFirst));
        assert_eq!(app.mode(), Mode::VsBot);

        app.complete(Completion::Moved {
            board: board("X--------"),
            outcome: Outcome::InProgress,
        });
        assert_eq!(
            app.handle_key(KeyCode::Char('9')),
            Some(Intent::Play {
                mark: Mark::O,
                index: 8,
                bot_replies: true
            })
        );
    }

    #[test]
    fn test_untrained_bot_loss_has_excuse() {
        let mut app = App::new(Board::new());
        app.handle_key(KeyCode::Char('b'));
        app.complete(Completion::Moved {
            board: board("XX-OOOX--"),
            outcome: Outcome::Win(Mark::O),
        });

        assert_eq!(app.title(), "Wait! I wasn't ready.");
        assert_eq!(app.handle_key(KeyCode::Char('3')), None);
    }
}
