//! UI module for Mimica
//!
//! One render function per screen plus shared widgets (stat cards, the
//! key-hint bar and the status line).

mod api_key;
mod generator;
mod helpers;
mod play;
mod setup;
mod stats;

use std::time::Instant;

use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::{App, StatusKind};
use crate::models::Screen;
use crate::theme::{AMBER_WARNING, BG_PRIMARY, CYAN_PRIMARY, RED_ERROR, TEXT_PRIMARY};

fn key_hints(app: &App) -> &'static str {
    match app.screen {
        Screen::Setup if app.is_editing() => {
            " type name | Enter: add team (empty: start) | Tab/↑↓: field | F3 generator | F4 stats | F5 API key | Ctrl+C quit "
        }
        Screen::Setup => {
            " Tab/↑↓: field | ←→/Space: change | x: remove team | Enter: start | g/t/k: screens | q: quit "
        }
        Screen::Play => {
            " d: draw | Space: start | Enter/+: point | 1-9: team point | p: pass | e: end | v: show card | i: AI card | s: setup | q: quit "
        }
        Screen::Generator => {
            " ←→: category | ↑↓: difficulty | +/-: count | Enter: batch | i: single | a: accept | x: discard | Esc: back "
        }
        Screen::Stats => " e: export JSON | Esc: back | q: quit ",
        Screen::ApiKey => " type key | Enter: validate and save | Ctrl+D: remove key | Esc: cancel ",
    }
}

fn render_bottom_bar(frame: &mut Frame, area: Rect, app: &App) {
    let bar = match &app.status {
        Some(status) => {
            let fg = match status.kind {
                StatusKind::Info => CYAN_PRIMARY,
                StatusKind::Warning => AMBER_WARNING,
                StatusKind::Error => RED_ERROR,
            };
            Paragraph::new(format!(" {} ", status.text))
                .style(Style::default().fg(Color::Black).bg(fg))
        }
        None => Paragraph::new(key_hints(app)).style(Style::default().fg(Color::Black).bg(CYAN_PRIMARY)),
    };
    frame.render_widget(bar, area);
}

fn render_screen(frame: &mut Frame, area: Rect, app: &App, screen: Screen, now: Instant) {
    match screen {
        Screen::Setup | Screen::ApiKey => setup::render(frame, area, app),
        Screen::Play => play::render(frame, area, app, now),
        Screen::Generator => generator::render(frame, area, app),
        Screen::Stats => stats::render(frame, area, app),
    }
}

/// Draw the whole UI for the current screen
pub fn draw(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();
    frame.render_widget(
        Paragraph::new("").style(Style::default().bg(BG_PRIMARY).fg(TEXT_PRIMARY)),
        area,
    );

    // Create main layout: content area + bottom bar
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Main content area
            Constraint::Length(1), // Bottom bar (single line)
        ])
        .split(area);

    let content_area = main_layout[0];
    let bottom_bar_area = main_layout[1];

    if app.screen == Screen::ApiKey {
        // Modal over the screen it was opened from
        render_screen(frame, content_area, app, app.underlying_screen(), now);
        api_key::render(frame, content_area, app);
    } else {
        render_screen(frame, content_area, app, app.screen, now);
    }

    render_bottom_bar(frame, bottom_bar_area, app);
}
