//! Brain Games - Unified CLI
//!
//! Interactive play, a stdio worker, and headless training.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use brain_games::{AppConfig, CommandChannel, GameClient, LocalEngine, WorkerConfig, serve_stdio};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,brain_games=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Worker { config } => run_worker(config),
        Command::Tui {
            config,
            worker_command,
        } => runtime()?.block_on(run_tui(config, worker_command)),
        Command::Train { config, games } => runtime()?.block_on(run_train(config, games)),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

/// Engine loader shared by every transport.
fn load_engine(worker: &WorkerConfig) -> impl FnOnce() -> Result<LocalEngine> + Send + 'static {
    let seed = *worker.seed();
    move || {
        Ok(match seed {
            Some(seed) => LocalEngine::with_seed(seed),
            None => LocalEngine::new(),
        })
    }
}

/// Serve the engine on stdio. Stdout carries frames, so logs go to stderr.
fn run_worker(config: Option<PathBuf>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = AppConfig::load(config.as_deref())?;
    info!("Starting stdio worker");
    serve_stdio(load_engine(config.worker()))
}

/// Run the terminal UI.
async fn run_tui(config: Option<PathBuf>, worker_command: Option<String>) -> Result<()> {
    let config = AppConfig::load(config.as_deref())?;

    // Log to a file so the terminal stays clean
    let log_file = std::fs::File::create(config.tui().log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    let channel = open_channel(&config, worker_command.as_deref())?;
    brain_games::tui::run(channel, &config).await
}

/// Run one training session through the client proxy.
#[instrument(skip(config))]
async fn run_train(config: Option<PathBuf>, games: Option<u32>) -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();

    let config = AppConfig::load(config.as_deref())?;
    let mut train = *config.train();
    if let Some(games) = games {
        train = train.with_game_count(games);
    }

    let channel = open_channel(&config, None)?;
    let client = GameClient::connect(channel, config.client().clone()).await?;

    info!(games = train.game_count, "Training");
    let report = client.train(train).await?;
    println!("{report}");
    Ok(())
}

fn open_channel(config: &AppConfig, worker_command: Option<&str>) -> Result<CommandChannel> {
    let channel = match worker_command {
        Some(command) => {
            let mut parts = command.split_whitespace().map(str::to_string);
            let program = parts
                .next()
                .ok_or_else(|| anyhow::anyhow!("Empty worker command"))?;
            let args: Vec<String> = parts.collect();
            CommandChannel::spawn_process(&program, &args)?
        }
        None => CommandChannel::spawn_thread(load_engine(config.worker()))?,
    };
    Ok(channel)
}
