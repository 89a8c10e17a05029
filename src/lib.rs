//! Brain Games library - tic-tac-toe behind an asynchronous command channel
//!
//! A worker owns the game engine and serves one request at a time; a
//! client proxy turns each engine operation into an async call.
//!
//! # Architecture
//!
//! - **Games**: board codec and the pure tic-tac-toe rules
//! - **Engine**: the compute engine contract plus a built-in self-play bot
//! - **Protocol**: request, response and readiness frames
//! - **Channel**: in-process thread or child-process (JSON lines) transport
//! - **Client / Worker**: the two ends of the channel
//!
//! # Example
//!
//! ```no_run
//! use brain_games::{ClientConfig, CommandChannel, GameClient, LocalEngine};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let channel = CommandChannel::spawn_thread(|| Ok(LocalEngine::new()))?;
//! let client = GameClient::connect(channel, ClientConfig::default()).await?;
//!
//! client.play_x(4).await?;
//! let board = client.get_board().await?;
//! assert_eq!(board.to_string(), "----X----");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod channel;
pub mod client;
pub mod config;
pub mod engine;
pub mod games;
pub mod protocol;
pub mod tui;
pub mod worker;

// Crate-level exports - Transport and client
pub use channel::{ChannelError, ChannelState, CommandChannel, WorkerEndpoint, WorkerHandle};
pub use client::{ClientConfig, ClientError, GameClient};

// Crate-level exports - Worker
pub use worker::{Dispatcher, serve_stdio};

// Crate-level exports - Configuration
pub use config::{AppConfig, ConfigError, TuiConfig, WorkerConfig};

// Crate-level exports - Engine
pub use engine::{Engine, EngineAdapter, LocalEngine, TrainConfig, TrainReport};

// Crate-level exports - Wire protocol
pub use protocol::{
    Action, Command, Fault, Payload, Request, RequestId, Response, Signal, Status, WorkerMessage,
    parse_request,
};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{Board, GameError, Mark, Outcome, Square, decode, encode};
