//! Terminal UI for Brain Games.
//!
//! Hosts a [`GameClient`]. Every client call runs as a spawned task so the
//! draw loop keeps redrawing (and the training clock keeps ticking) while
//! the worker is busy.

mod app;
mod ui;

pub use app::{App, Busy, Completion, Intent, Mode};

use crate::channel::CommandChannel;
use crate::client::{ClientError, GameClient};
use crate::config::AppConfig;
use crate::engine::TrainConfig;
use crate::games::tictactoe::{Mark, Outcome};
use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Connects to the worker behind `channel` and runs the UI until quit.
pub async fn run(channel: CommandChannel, config: &AppConfig) -> Result<()> {
    info!("Starting Brain Games TUI");

    println!("Waiting for the engine...");
    let client = Arc::new(GameClient::connect(channel, config.client().clone()).await?);
    let board = client.get_board().await?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = event_loop(&mut terminal, client, App::new(board), *config.train()).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "UI loop error");
    }
    res
}

#[instrument(skip_all)]
async fn event_loop(
    terminal: &mut Term,
    client: Arc<GameClient>,
    mut app: App,
    train: TrainConfig,
) -> Result<()> {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let mut events = EventStream::new();
    let mut clock = tokio::time::interval(Duration::from_secs(1));

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match app.handle_key(key.code) {
                        Some(Intent::Quit) => {
                            info!("User quit");
                            return Ok(());
                        }
                        Some(intent) => {
                            let client = Arc::clone(&client);
                            let done = done_tx.clone();
                            tokio::spawn(async move {
                                let completion = perform(&client, intent, train).await;
                                let _ = done.send(completion);
                            });
                        }
                        None => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            Some(completion) = done_rx.recv() => app.complete(completion),
            _ = clock.tick() => app.tick(),
        }
    }
}

/// Runs an intent's client calls; any error becomes [`Completion::Failed`].
async fn perform(client: &GameClient, intent: Intent, train: TrainConfig) -> Completion {
    let result = match intent {
        Intent::Play {
            mark,
            index,
            bot_replies,
        } => play(client, mark, index, bot_replies).await,
        Intent::BotFirst => bot_first(client).await,
        Intent::Train => retrain(client, train).await,
        Intent::Reset => reset(client).await,
        Intent::Quit => return Completion::Failed {
            error: "Quit is handled by the UI loop".to_string(),
        },
    };

    result.unwrap_or_else(|e| {
        error!(error = %e, ?intent, "Client call failed");
        Completion::Failed {
            error: e.to_string(),
        }
    })
}

async fn play(
    client: &GameClient,
    mark: Mark,
    index: usize,
    bot_replies: bool,
) -> Result<Completion, ClientError> {
    let mut outcome = match mark {
        Mark::X => client.play_x(index).await?,
        Mark::O => client.play_o(index).await?,
    };
    if bot_replies && outcome == Outcome::InProgress {
        outcome = client.play_bot_x().await?;
    }
    let board = client.get_board().await?;
    Ok(Completion::Moved { board, outcome })
}

async fn bot_first(client: &GameClient) -> Result<Completion, ClientError> {
    let outcome = client.play_bot_x().await?;
    let board = client.get_board().await?;
    Ok(Completion::Moved { board, outcome })
}

async fn retrain(client: &GameClient, train: TrainConfig) -> Result<Completion, ClientError> {
    let report = client.train(train).await?;
    let board = client.get_board().await?;
    Ok(Completion::Trained { report, board })
}

async fn reset(client: &GameClient) -> Result<Completion, ClientError> {
    client.reset_board().await?;
    let board = client.get_board().await?;
    Ok(Completion::Reset { board })
}
