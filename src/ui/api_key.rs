//! API key modal

use ratatui::{
    prelude::*,
    widgets::{Clear, Paragraph, Wrap},
};

use super::helpers::{centered_rect, mask_secret, panel};
use crate::app::App;
use crate::theme::{
    get_pulse_color, CYAN_DIM, CYAN_PRIMARY, GREEN_SUCCESS, RED_ERROR, TEXT_MUTED, TEXT_PRIMARY,
    TEXT_SECONDARY, VIOLET_ACCENT,
};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let modal = centered_rect(60, 11, area);
    frame.render_widget(Clear, modal);

    let game = &app.game;
    let saved = &game.settings().gemini_api_key;

    let mut lines = vec![
        Line::from(Span::styled(
            "Paste a Gemini API key to enable AI cards.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Key: ", Style::default().fg(TEXT_MUTED)),
            Span::styled(mask_secret(&app.api_key_input), Style::default().fg(TEXT_PRIMARY)),
            Span::styled("█", Style::default().fg(CYAN_PRIMARY)),
        ]),
        Line::from(""),
    ];

    if game.is_validating_key() {
        lines.push(Line::from(Span::styled(
            "Validating...",
            Style::default().fg(get_pulse_color(app.animation_tick, VIOLET_ACCENT, CYAN_DIM)),
        )));
    } else if let Some(error) = game.key_error() {
        lines.push(Line::from(Span::styled(error.to_string(), Style::default().fg(RED_ERROR))));
    }

    let saved_line = if saved.is_empty() {
        Span::styled("No key saved", Style::default().fg(TEXT_MUTED))
    } else {
        Span::styled(
            format!("Saved key: {}", mask_secret(saved)),
            Style::default().fg(GREEN_SUCCESS),
        )
    };
    lines.push(Line::from(saved_line));

    frame.render_widget(
        Paragraph::new(lines)
            .block(panel("Gemini API key", CYAN_PRIMARY))
            .wrap(Wrap { trim: false }),
        modal,
    );
}
