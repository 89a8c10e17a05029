//! Worker dispatcher: turns requests into engine calls.
//!
//! The dispatcher owns the engine and therefore the only mutable board.
//! It handles one request at a time; a second request is only read after
//! the first one's response has been posted.

use crate::channel::WorkerEndpoint;
use crate::engine::{Engine, EngineAdapter};
use crate::games::tictactoe::Mark;
use crate::protocol::{
    Command, Fault, Payload, Request, Response, Signal, WorkerMessage, parse_request,
};
use std::io::{BufRead, Write};
use tracing::{debug, info, instrument, warn};

/// Serves requests against one engine.
#[derive(Debug)]
pub struct Dispatcher<E> {
    adapter: EngineAdapter<E>,
    handled: u64,
}

impl<E: Engine> Dispatcher<E> {
    /// Wraps a loaded engine.
    pub fn new(engine: E) -> Self {
        Self {
            adapter: EngineAdapter::new(engine),
            handled: 0,
        }
    }

    /// Number of requests answered so far.
    pub fn handled(&self) -> u64 {
        self.handled
    }

    /// Runs one request to completion and builds its response.
    #[instrument(skip(self, request), fields(id = request.id, action = %request.command.action()))]
    pub fn dispatch(&mut self, request: Request) -> Response {
        let action = request.command.action();
        let payload = match request.command {
            Command::Train(config) => Ok(Payload::Report(self.adapter.train(&config))),
            Command::GetBoard => self
                .adapter
                .board()
                .map(|board| Payload::Board(board.to_string())),
            Command::PlayX(index) => self.adapter.make_move(Mark::X, index).map(Payload::Outcome),
            Command::PlayBotX => self.adapter.make_bot_move_x().map(Payload::Outcome),
            Command::PlayO(index) => self.adapter.make_move(Mark::O, index).map(Payload::Outcome),
            Command::ResetBoard => {
                self.adapter.reset_board();
                Ok(Payload::Empty)
            }
        };

        self.handled += 1;
        match &payload {
            Ok(payload) => debug!(kind = payload.kind(), "Request served"),
            Err(e) => info!(error = %e, "Request rejected by engine"),
        }
        Response::new(request.id, action.completion(), payload.map_err(Fault::from))
    }

    /// Signals readiness, then serves requests until the client hangs up.
    ///
    /// Blocks the calling thread.
    #[instrument(skip_all)]
    pub fn run(mut self, mut endpoint: WorkerEndpoint) {
        if !endpoint.post(WorkerMessage::Signal(Signal::Ready)) {
            warn!("Client gone before readiness");
            return;
        }

        while let Some(request) = endpoint.next_request() {
            let response = self.dispatch(request);
            if !endpoint.post(WorkerMessage::Response(response)) {
                break;
            }
        }
        info!(handled = self.handled, "Worker loop finished");
    }

    /// Serves JSON-line requests from `reader`, writing replies to `writer`.
    ///
    /// Frames with an unknown action or bad shape are answered with a
    /// `REJECTED` response when their id can be recovered.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from either stream.
    #[instrument(skip_all)]
    pub fn serve_lines<R: BufRead, W: Write>(
        mut self,
        reader: R,
        mut writer: W,
    ) -> std::io::Result<()> {
        write_frame(&mut writer, &WorkerMessage::Signal(Signal::Ready))?;

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let response = match parse_request(&line) {
                Ok(request) => Some(self.dispatch(request)),
                Err(rejected) => {
                    warn!(id = ?rejected.id, fault = %rejected.fault, "Rejecting frame");
                    rejected.into_response()
                }
            };

            if let Some(response) = response {
                write_frame(&mut writer, &WorkerMessage::Response(response))?;
            }
        }

        info!(handled = self.handled, "Input closed");
        Ok(())
    }
}

/// Writes one message as a JSON line and flushes.
pub(crate) fn write_frame<W: Write>(writer: &mut W, message: &WorkerMessage) -> std::io::Result<()> {
    let frame = serde_json::to_string(message).map_err(std::io::Error::other)?;
    writeln!(writer, "{frame}")?;
    writer.flush()
}

/// Loads an engine and serves it over stdin/stdout.
///
/// # Errors
///
/// Returns the load error after reporting it as a `FAILED` signal, or any
/// I/O error from the streams.
pub fn serve_stdio<E, F>(load: F) -> anyhow::Result<()>
where
    E: Engine,
    F: FnOnce() -> anyhow::Result<E>,
{
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    let engine = match load() {
        Ok(engine) => engine,
        Err(e) => {
            write_frame(
                &mut stdout,
                &WorkerMessage::Signal(Signal::Failed {
                    reason: e.to_string(),
                }),
            )?;
            return Err(e);
        }
    };

    info!("Worker serving on stdio");
    Dispatcher::new(engine).serve_lines(stdin.lock(), stdout.lock())?;
    Ok(())
}
