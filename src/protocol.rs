//! Wire schema shared by the client proxy and the worker dispatcher.
//!
//! Requests carry a unique `id` that the matching response echoes, so any
//! number of calls, including several of the same action, can be in flight.
//!
//! ```text
//! -> {"id":3,"action":"PLAY_X","payload":4}
//! <- {"id":3,"status":"PLAY_X_COMPLETE","payload":{"Ok":{"kind":"outcome","value":"InProgress"}}}
//! <- {"status":"READY"}
//! ```

use crate::engine::{TrainConfig, TrainReport};
use crate::games::tictactoe::{GameError, Outcome};
use serde::{Deserialize, Serialize};

/// Correlation identifier, unique per client.
pub type RequestId = u64;

/// Which operation a command requests.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Run self-play training.
    Train,
    /// Read the board.
    GetBoard,
    /// Human plays X.
    PlayX,
    /// Engine plays X.
    PlayBotX,
    /// Human plays O.
    PlayO,
    /// Clear the board.
    ResetBoard,
}

impl Action {
    /// Completion status the worker answers this action with.
    pub fn completion(self) -> Status {
        match self {
            Action::Train => Status::TrainComplete,
            Action::GetBoard => Status::GetBoardComplete,
            Action::PlayX => Status::PlayXComplete,
            Action::PlayBotX => Status::PlayBotXComplete,
            Action::PlayO => Status::PlayOComplete,
            Action::ResetBoard => Status::ResetBoardComplete,
        }
    }
}

/// Status tag carried by a response.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Reply to [`Action::Train`].
    TrainComplete,
    /// Reply to [`Action::GetBoard`].
    GetBoardComplete,
    /// Reply to [`Action::PlayX`].
    PlayXComplete,
    /// Reply to [`Action::PlayBotX`].
    PlayBotXComplete,
    /// Reply to [`Action::PlayO`].
    PlayOComplete,
    /// Reply to [`Action::ResetBoard`].
    ResetBoardComplete,
    /// Reply to a frame the worker could not turn into a command.
    Rejected,
}

/// An action plus its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Train with the given parameters.
    Train(TrainConfig),
    /// Read the encoded board.
    GetBoard,
    /// Human X move at an index.
    PlayX(usize),
    /// Engine move as X.
    PlayBotX,
    /// Human O move at an index.
    PlayO(usize),
    /// Clear the board.
    ResetBoard,
}

impl Command {
    /// The action tag of this command.
    pub fn action(&self) -> Action {
        match self {
            Command::Train(_) => Action::Train,
            Command::GetBoard => Action::GetBoard,
            Command::PlayX(_) => Action::PlayX,
            Command::PlayBotX => Action::PlayBotX,
            Command::PlayO(_) => Action::PlayO,
            Command::ResetBoard => Action::ResetBoard,
        }
    }
}

/// A command tagged with its correlation id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct Request {
    /// Correlation id echoed by the response.
    pub id: RequestId,
    /// What to do.
    #[serde(flatten)]
    pub command: Command,
}

/// Successful result of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Payload {
    /// Training summary.
    Report(TrainReport),
    /// Encoded board, as text on the wire.
    Board(String),
    /// Outcome after a move.
    Outcome(Outcome),
    /// Nothing to report.
    Empty,
}

impl Payload {
    /// Short name for logs and desync reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Report(_) => "report",
            Payload::Board(_) => "board",
            Payload::Outcome(_) => "outcome",
            Payload::Empty => "empty",
        }
    }
}

/// Why the worker could not serve a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum Fault {
    /// The engine rejected the command.
    #[display("{_0}")]
    Game(GameError),
    /// The action tag is not one the worker knows.
    #[display("Unrecognized action {_0:?}")]
    UnknownAction(String),
    /// The frame could not be decoded.
    #[display("Malformed request: {_0}")]
    Malformed(String),
}

impl std::error::Error for Fault {}

impl From<GameError> for Fault {
    fn from(err: GameError) -> Self {
        Fault::Game(err)
    }
}

/// Reply to exactly one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct Response {
    /// Id of the request being answered.
    pub id: RequestId,
    /// Completion tag matching the request's action.
    pub status: Status,
    /// Result of the command.
    pub payload: Result<Payload, Fault>,
}

/// Lifecycle signals from the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    /// Engine loaded; sent once before any request is served.
    Ready,
    /// Engine failed to load; the worker serves nothing.
    Failed {
        /// Load error.
        reason: String,
    },
}

/// Anything the worker sends to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkerMessage {
    /// Reply to a request.
    Response(Response),
    /// Lifecycle signal.
    Signal(Signal),
}

/// A frame that could not become a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    /// Id recovered from the frame, if any.
    pub id: Option<RequestId>,
    /// What went wrong.
    pub fault: Fault,
}

impl Rejected {
    /// Response to send back, when an id was recovered.
    pub fn into_response(self) -> Option<Response> {
        let id = self.id?;
        Some(Response::new(id, Status::Rejected, Err(self.fault)))
    }
}

/// Parses one JSON request frame.
///
/// Unknown action tags are reported distinctly from other decode failures
/// so the worker can answer instead of dropping the frame. A `TRAIN` frame
/// without a payload trains with default parameters.
///
/// # Errors
///
/// Returns [`Rejected`] carrying whatever id could be recovered.
pub fn parse_request(frame: &str) -> Result<Request, Rejected> {
    let mut value: serde_json::Value = serde_json::from_str(frame).map_err(|e| Rejected {
        id: None,
        fault: Fault::Malformed(e.to_string()),
    })?;
    let id = value.get("id").and_then(serde_json::Value::as_u64);

    if let Some(tag) = value.get("action").cloned() {
        match serde_json::from_value::<Action>(tag.clone()) {
            Err(_) => {
                return Err(Rejected {
                    id,
                    fault: Fault::UnknownAction(tag.to_string()),
                });
            }
            // Every training parameter has a default
            Ok(Action::Train) => {
                if let Some(fields) = value.as_object_mut()
                    && fields.get("payload").is_none_or(serde_json::Value::is_null)
                {
                    fields.insert("payload".to_string(), serde_json::json!({}));
                }
            }
            Ok(_) => {}
        }
    }

    serde_json::from_value(value).map_err(|e| Rejected {
        id,
        fault: Fault::Malformed(e.to_string()),
    })
}
