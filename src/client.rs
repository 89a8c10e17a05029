//! Client proxy: one typed async method per action.
//!
//! Each call registers a one-shot handler under a fresh request id, sends
//! the command, and suspends until the response with that id arrives. A
//! background router task delivers responses to their handlers, so calls
//! never block the host thread and any number may be in flight.

use crate::channel::{ChannelError, ChannelState, CommandChannel, WorkerHandle};
use crate::engine::{TrainConfig, TrainReport};
use crate::games::tictactoe::{Board, GameError, Outcome, decode};
use crate::protocol::{
    Action, Command, Fault, Payload, Request, RequestId, Response, WorkerMessage,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Client-side settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct ClientConfig {
    /// Give up on a call after this many milliseconds. `None` waits forever.
    call_timeout_ms: Option<u64>,
}

impl ClientConfig {
    /// Config with a per-call timeout, kept to millisecond precision.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            call_timeout_ms: Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)),
        }
    }

    /// Per-call timeout, if any.
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }
}

/// Error from a client call.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum ClientError {
    /// The channel could not be established or went away.
    #[display("{_0}")]
    Channel(ChannelError),
    /// The engine rejected the command (illegal move, full board, bad board).
    #[display("{_0}")]
    Game(GameError),
    /// The worker could not read the command.
    #[display("{_0}")]
    Rejected(Fault),
    /// The response did not fit the call it answered.
    #[display("Channel desync on {action}: {detail}")]
    Desync {
        /// Action of the call.
        action: Action,
        /// What did not match.
        detail: String,
    },
    /// The call's own deadline passed. The worker may still be running it.
    #[display("{action} timed out after {after:?}")]
    TimedOut {
        /// Action of the call.
        action: Action,
        /// Configured deadline.
        after: Duration,
    },
}

impl std::error::Error for ClientError {}

impl From<ChannelError> for ClientError {
    fn from(err: ChannelError) -> Self {
        ClientError::Channel(err)
    }
}

impl From<GameError> for ClientError {
    fn from(err: GameError) -> Self {
        ClientError::Game(err)
    }
}

impl From<Fault> for ClientError {
    fn from(fault: Fault) -> Self {
        match fault {
            Fault::Game(e) => ClientError::Game(e),
            other => ClientError::Rejected(other),
        }
    }
}

struct Pending {
    action: Action,
    reply: oneshot::Sender<Response>,
}

/// Calls awaiting a response, plus whether the router has stopped.
#[derive(Default)]
struct Calls {
    open: HashMap<RequestId, Pending>,
    closed: bool,
}

type PendingMap = Arc<Mutex<Calls>>;

fn lock(pending: &PendingMap) -> MutexGuard<'_, Calls> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes a pending entry when its call finishes or is abandoned.
struct Registration<'a> {
    pending: &'a PendingMap,
    id: RequestId,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        lock(self.pending).open.remove(&self.id);
    }
}

/// Typed front for a background worker.
pub struct GameClient {
    outbound: mpsc::UnboundedSender<Request>,
    pending: PendingMap,
    next_id: AtomicU64,
    state: watch::Receiver<ChannelState>,
    config: ClientConfig,
    router: JoinHandle<()>,
    _worker: Option<WorkerHandle>,
}

impl std::fmt::Debug for GameClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameClient")
            .field("state", &*self.state.borrow())
            .field("pending", &lock(&self.pending).open.len())
            .field("config", &self.config)
            .finish()
    }
}

impl GameClient {
    /// Waits for the worker to become ready and starts routing responses.
    ///
    /// Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Channel`] if the engine fails to load or the
    /// worker disappears before signalling readiness.
    #[instrument(skip(channel))]
    pub async fn connect(
        mut channel: CommandChannel,
        config: ClientConfig,
    ) -> Result<Self, ClientError> {
        channel.wait_ready().await?;
        let parts = channel.into_parts();

        let pending = PendingMap::default();
        let router = tokio::spawn(route(parts.inbound, Arc::clone(&pending)));
        info!("Client connected");

        Ok(Self {
            outbound: parts.outbound,
            pending,
            next_id: AtomicU64::new(1),
            state: parts.state,
            config,
            router,
            _worker: parts.worker,
        })
    }

    /// Channel lifecycle state.
    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    /// Whether a call of `action` is waiting for its response.
    pub fn is_pending(&self, action: Action) -> bool {
        lock(&self.pending).open.values().any(|p| p.action == action)
    }

    /// Number of calls waiting for responses.
    pub fn in_flight(&self) -> usize {
        lock(&self.pending).open.len()
    }

    /// Runs self-play training. May take minutes.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on channel failure or timeout.
    pub async fn train(&self, config: TrainConfig) -> Result<TrainReport, ClientError> {
        match self.call(Command::Train(config)).await? {
            Payload::Report(report) => Ok(report),
            other => Err(unexpected(Action::Train, &other)),
        }
    }

    /// Reads the current board.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Game`] with a format error if the worker sent
    /// a malformed encoding.
    pub async fn get_board(&self) -> Result<Board, ClientError> {
        match self.call(Command::GetBoard).await? {
            Payload::Board(text) => Ok(decode(&text)?),
            other => Err(unexpected(Action::GetBoard, &other)),
        }
    }

    /// Plays X at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Game`] for an illegal move.
    pub async fn play_x(&self, index: usize) -> Result<Outcome, ClientError> {
        self.outcome(Command::PlayX(index)).await
    }

    /// Lets the engine play X.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Game`] if the board is full.
    pub async fn play_bot_x(&self) -> Result<Outcome, ClientError> {
        self.outcome(Command::PlayBotX).await
    }

    /// Plays O at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Game`] for an illegal move.
    pub async fn play_o(&self, index: usize) -> Result<Outcome, ClientError> {
        self.outcome(Command::PlayO(index)).await
    }

    /// Clears the board.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on channel failure or timeout.
    pub async fn reset_board(&self) -> Result<(), ClientError> {
        match self.call(Command::ResetBoard).await? {
            Payload::Empty => Ok(()),
            other => Err(unexpected(Action::ResetBoard, &other)),
        }
    }

    async fn outcome(&self, command: Command) -> Result<Outcome, ClientError> {
        let action = command.action();
        match self.call(command).await? {
            Payload::Outcome(outcome) => Ok(outcome),
            other => Err(unexpected(action, &other)),
        }
    }

    #[instrument(skip(self), fields(action = %command.action()))]
    async fn call(&self, command: Command) -> Result<Payload, ClientError> {
        let action = command.action();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (reply, response) = oneshot::channel();

        {
            let mut calls = lock(&self.pending);
            // No router left to deliver a response
            if calls.closed {
                return Err(ChannelError::Closed.into());
            }
            calls.open.insert(id, Pending { action, reply });
        }
        let _registration = Registration {
            pending: &self.pending,
            id,
        };

        self.outbound
            .send(Request::new(id, command))
            .map_err(|_| ChannelError::Closed)?;
        debug!(id, "Request sent");

        let response = match self.config.call_timeout() {
            Some(after) => tokio::time::timeout(after, response)
                .await
                .map_err(|_| {
                    warn!(id, ?after, "Call timed out");
                    ClientError::TimedOut { action, after }
                })?,
            None => response.await,
        }
        .map_err(|_| ChannelError::Closed)?;

        if response.status != action.completion() {
            return Err(ClientError::Desync {
                action,
                detail: format!(
                    "expected {}, received {}",
                    action.completion(),
                    response.status
                ),
            });
        }

        debug!(id, "Response received");
        Ok(response.payload?)
    }
}

impl Drop for GameClient {
    fn drop(&mut self) {
        self.router.abort();
    }
}

fn unexpected(action: Action, payload: &Payload) -> ClientError {
    ClientError::Desync {
        action,
        detail: format!("unexpected {} payload", payload.kind()),
    }
}

/// Delivers each response to the call registered under its id.
async fn route(mut inbound: mpsc::UnboundedReceiver<WorkerMessage>, pending: PendingMap) {
    while let Some(message) = inbound.recv().await {
        match message {
            WorkerMessage::Response(response) => {
                let waiting = lock(&pending).open.remove(&response.id);
                match waiting {
                    Some(call) => {
                        if call.reply.send(response).is_err() {
                            debug!("Caller stopped waiting");
                        }
                    }
                    None => warn!(
                        id = response.id,
                        status = %response.status,
                        "Dropping response with no pending call"
                    ),
                }
            }
            WorkerMessage::Signal(signal) => warn!(?signal, "Unexpected signal after readiness"),
        }
    }

    info!("Worker channel closed");
    let mut calls = lock(&pending);
    calls.closed = true;
    calls.open.clear();
}
