//! Command-line interface for brain_games.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Brain Games - tic-tac-toe against a self-trained bot
#[derive(Parser, Debug)]
#[command(name = "brain_games")]
#[command(about = "Tic-tac-toe against a bot that learns by self-play", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Tui {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Run the engine in a child process (space-separated command line)
        /// instead of an in-process worker thread
        #[arg(long)]
        worker_command: Option<String>,
    },

    /// Serve the engine over stdin/stdout as JSON lines
    Worker {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run one training session and print the report
    Train {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the number of self-play games
        #[arg(short, long)]
        games: Option<u32>,
    },
}
