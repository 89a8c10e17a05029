//! UI rendering using ratatui.

mod board;

use super::app::{App, Busy, Mode};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

pub use board::render_board;

/// Draws the main UI.
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new(app.title())
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Brain Games"));
    f.render_widget(title, chunks[0]);

    render_board(f, chunks[1], app.board(), app.busy().is_some());

    let status_text = match app.busy() {
        Some(Busy::Training(secs)) => format!("Training... {secs}s"),
        Some(Busy::Waiting) => "Thinking...".to_string(),
        None => app.status().to_string(),
    };
    let status = Paragraph::new(status_text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[2]);

    let mode = match app.mode() {
        Mode::HotSeat => "Hot seat",
        Mode::VsBot => "You are O",
    };
    let help = Paragraph::new(format!(
        "{mode} | 1-9: Move | B: Bot starts | T: Train | R: Reset | Q: Quit"
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}
