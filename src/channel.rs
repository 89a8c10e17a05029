//! Bidirectional command channel between a client and one worker.
//!
//! The channel moves [`Request`]s one way and [`WorkerMessage`]s the other,
//! in order, exactly once. Two transports are provided: a dedicated worker
//! thread in this process, and a child process speaking JSON lines over
//! stdio. Both look the same to the client.

use crate::engine::Engine;
use crate::protocol::{Request, Signal, WorkerMessage};
use crate::worker::Dispatcher;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};

/// Channel lifecycle. There is no closed state; teardown follows the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ChannelState {
    /// No worker attached yet.
    Uninitialized,
    /// Worker is loading its engine.
    Initializing,
    /// Worker signalled readiness.
    Ready,
}

/// Error establishing the channel.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ChannelError {
    /// The worker reported an engine load failure.
    #[display("Engine failed to load: {_0}")]
    EngineLoad(String),
    /// The worker could not be started.
    #[display("Failed to start worker: {_0}")]
    Spawn(String),
    /// The worker went away.
    #[display("Command channel closed")]
    Closed,
}

impl std::error::Error for ChannelError {}

/// Worker side of a channel.
#[derive(Debug)]
pub struct WorkerEndpoint {
    requests: mpsc::UnboundedReceiver<Request>,
    messages: mpsc::UnboundedSender<WorkerMessage>,
}

impl WorkerEndpoint {
    /// Blocks the current thread until the next request arrives.
    ///
    /// Returns `None` once the client side is gone. Must not be called
    /// from inside an async runtime.
    pub fn next_request(&mut self) -> Option<Request> {
        self.requests.blocking_recv()
    }

    /// Async variant of [`WorkerEndpoint::next_request`].
    pub async fn recv(&mut self) -> Option<Request> {
        self.requests.recv().await
    }

    /// Posts a message to the client. Returns `false` if nobody is listening.
    pub fn post(&self, message: WorkerMessage) -> bool {
        self.messages.send(message).is_ok()
    }
}

/// Keeps a spawned worker alive for as long as the channel's owner lives.
#[derive(Debug)]
pub enum WorkerHandle {
    /// In-process worker thread.
    Thread(std::thread::JoinHandle<()>),
    /// Child process, killed on drop.
    Process(Child),
}

/// Client side of a channel.
#[derive(Debug)]
pub struct CommandChannel {
    outbound: mpsc::UnboundedSender<Request>,
    inbound: mpsc::UnboundedReceiver<WorkerMessage>,
    state: watch::Sender<ChannelState>,
    worker: Option<WorkerHandle>,
}

/// Parts of a ready channel, handed to the client proxy.
#[derive(Debug)]
pub(crate) struct ChannelParts {
    pub(crate) outbound: mpsc::UnboundedSender<Request>,
    pub(crate) inbound: mpsc::UnboundedReceiver<WorkerMessage>,
    pub(crate) state: watch::Receiver<ChannelState>,
    pub(crate) worker: Option<WorkerHandle>,
}

impl CommandChannel {
    /// Creates a connected client/worker pair with no worker running.
    pub fn pair() -> (Self, WorkerEndpoint) {
        let (outbound, requests) = mpsc::unbounded_channel();
        let (messages, inbound) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(ChannelState::Uninitialized);

        let channel = Self {
            outbound,
            inbound,
            state,
            worker: None,
        };
        (channel, WorkerEndpoint { requests, messages })
    }

    /// Starts a worker thread that loads an engine with `load` and serves it.
    ///
    /// A load failure is reported as a [`Signal::Failed`] and the thread exits.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Spawn`] if the thread cannot be created.
    #[instrument(skip(load))]
    pub fn spawn_thread<E, F>(load: F) -> Result<Self, ChannelError>
    where
        E: Engine + 'static,
        F: FnOnce() -> anyhow::Result<E> + Send + 'static,
    {
        let (mut channel, endpoint) = Self::pair();
        channel.state.send_replace(ChannelState::Initializing);

        let handle = std::thread::Builder::new()
            .name("brain-games-worker".to_string())
            .spawn(move || {
                let engine = match load() {
                    Ok(engine) => engine,
                    Err(e) => {
                        error!(error = %e, "Engine load failed");
                        endpoint.post(WorkerMessage::Signal(Signal::Failed {
                            reason: e.to_string(),
                        }));
                        return;
                    }
                };
                Dispatcher::new(engine).run(endpoint);
            })
            .map_err(|e| ChannelError::Spawn(e.to_string()))?;

        info!("Worker thread started");
        channel.worker = Some(WorkerHandle::Thread(handle));
        Ok(channel)
    }

    /// Spawns `program args...` and talks to it over stdin/stdout.
    ///
    /// Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Spawn`] if the process cannot be started.
    #[instrument]
    pub fn spawn_process(program: &str, args: &[String]) -> Result<Self, ChannelError> {
        info!("Starting worker process");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ChannelError::Spawn(e.to_string()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ChannelError::Spawn("Failed to capture stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ChannelError::Spawn("Failed to capture stdout".to_string()))?;

        let (mut channel, endpoint) = Self::pair();
        channel.state.send_replace(ChannelState::Initializing);
        let WorkerEndpoint { requests, messages } = endpoint;

        tokio::spawn(write_frames(requests, stdin));
        tokio::spawn(read_frames(stdout, messages));

        channel.worker = Some(WorkerHandle::Process(child));
        Ok(channel)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    /// Waits for the worker's one-time readiness signal.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::EngineLoad`] if the worker reports a load
    /// failure, or [`ChannelError::Closed`] if it disappears first.
    #[instrument(skip(self))]
    pub async fn wait_ready(&mut self) -> Result<(), ChannelError> {
        if self.state() == ChannelState::Ready {
            return Ok(());
        }
        self.state.send_replace(ChannelState::Initializing);

        while let Some(message) = self.inbound.recv().await {
            match message {
                WorkerMessage::Signal(Signal::Ready) => {
                    self.state.send_replace(ChannelState::Ready);
                    info!("Worker ready");
                    return Ok(());
                }
                WorkerMessage::Signal(Signal::Failed { reason }) => {
                    return Err(ChannelError::EngineLoad(reason));
                }
                WorkerMessage::Response(response) => {
                    warn!(id = response.id, status = %response.status, "Response before readiness");
                }
            }
        }
        Err(ChannelError::Closed)
    }

    pub(crate) fn into_parts(self) -> ChannelParts {
        ChannelParts {
            outbound: self.outbound,
            inbound: self.inbound,
            state: self.state.subscribe(),
            worker: self.worker,
        }
    }
}

async fn write_frames(
    mut requests: mpsc::UnboundedReceiver<Request>,
    mut stdin: tokio::process::ChildStdin,
) {
    while let Some(request) = requests.recv().await {
        let mut frame = match serde_json::to_string(&request) {
            Ok(frame) => frame,
            Err(e) => {
                error!(id = request.id, error = %e, "Failed to encode request");
                continue;
            }
        };
        frame.push('\n');
        debug!(id = request.id, "Writing request frame");

        if let Err(e) = stdin.write_all(frame.as_bytes()).await {
            error!(error = %e, "Worker stdin closed");
            break;
        }
        if let Err(e) = stdin.flush().await {
            error!(error = %e, "Failed to flush worker stdin");
            break;
        }
    }
}

async fn read_frames(
    stdout: tokio::process::ChildStdout,
    messages: mpsc::UnboundedSender<WorkerMessage>,
) {
    let mut lines = BufReader::new(stdout).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("Worker stdout closed");
                break;
            }
            Err(e) => {
                error!(error = %e, "Failed to read worker stdout");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<WorkerMessage>(&line) {
            Ok(message) => {
                if messages.send(message).is_err() {
                    break;
                }
            }
            Err(e) => warn!(error = %e, frame = %line, "Dropping undecodable worker frame"),
        }
    }
}
