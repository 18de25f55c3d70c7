//! Play screen: scoreboard, card face, countdown and turn history

use std::time::Instant;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, Wrap},
};

use super::helpers::{panel, wrap_text};
use crate::app::App;
use crate::models::TurnPhase;
use crate::theme::{
    category_color, get_pulse_color, timer_color, AMBER_WARNING, BG_SECONDARY, BG_TERTIARY,
    BORDER_SUBTLE, CYAN_DIM, CYAN_PRIMARY, GREEN_ACTIVE, GREEN_SUCCESS, RED_ERROR,
    ROUNDED_BORDERS, TEXT_MUTED, TEXT_PRIMARY, TEXT_SECONDARY, VIOLET_ACCENT,
};
use crate::utils::{format_seconds, format_timestamp};

const HISTORY_ROWS: usize = 8;

fn phase_label(phase: TurnPhase) -> (&'static str, Color) {
    match phase {
        TurnPhase::Idle => ("waiting for a card", TEXT_MUTED),
        TurnPhase::CardDrawn => ("card ready", AMBER_WARNING),
        TurnPhase::Running => ("miming!", GREEN_ACTIVE),
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let game = &app.game;
    let team = game.current_team().map(|t| t.name.as_str()).unwrap_or("-");
    let (phase, phase_color) = phase_label(game.phase());
    let line = Line::from(vec![
        Span::styled(" Turn: ", Style::default().fg(TEXT_MUTED)),
        Span::styled(
            team.to_string(),
            Style::default().fg(VIOLET_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ·  ", Style::default().fg(TEXT_MUTED)),
        Span::styled(phase, Style::default().fg(phase_color)),
        Span::styled(
            format!("  ·  first to {} points", game.settings().target_points),
            Style::default().fg(TEXT_MUTED),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).block(panel("Mimica", BORDER_SUBTLE)), area);
}

fn render_scoreboard(frame: &mut Frame, area: Rect, app: &App) {
    let game = &app.game;
    let target = game.settings().target_points;
    let active = game.turn().current_team_index;
    let winner_id = game.winner().map(|t| t.id.clone());

    let mut lines = Vec::new();
    for (i, team) in game.teams().iter().enumerate() {
        let (indicator, indicator_color) = if i == active {
            ("●", get_pulse_color(app.animation_tick, GREEN_ACTIVE, CYAN_DIM))
        } else {
            ("○", TEXT_MUTED)
        };
        let name_style = if winner_id.as_deref() == Some(team.id.as_str()) {
            Style::default().fg(GREEN_SUCCESS).add_modifier(Modifier::BOLD)
        } else if i == active {
            Style::default().fg(CYAN_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_SECONDARY)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", indicator), Style::default().fg(indicator_color)),
            Span::styled(format!("{} ", i + 1), Style::default().fg(TEXT_MUTED)),
            Span::styled(team.name.clone(), name_style),
            Span::styled(
                format!("  {}/{}", team.points, target),
                Style::default().fg(TEXT_PRIMARY),
            ),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).block(panel("Score", BORDER_SUBTLE)), area);
}

fn render_card(frame: &mut Frame, area: Rect, app: &App) {
    let game = &app.game;
    let Some(card) = game.current_card() else {
        let hint = if game.is_draw_pending() {
            "Generating a card..."
        } else {
            "Press d to draw a card"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(TEXT_MUTED)))
                .alignment(Alignment::Center)
                .block(panel("Card", BORDER_SUBTLE)),
            area,
        );
        return;
    };

    let color = category_color(card.category);
    let block = Block::default()
        .title(format!(" {} ", card.category.label()))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_set(ROUNDED_BORDERS)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(BG_TERTIARY));

    if !app.card_visible {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("▒▒▒ hidden ▒▒▒", Style::default().fg(TEXT_MUTED))),
                Line::from(Span::styled("v: reveal", Style::default().fg(TEXT_MUTED))),
            ])
            .alignment(Alignment::Center)
            .block(block),
            area,
        );
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let mut lines = Vec::new();
    for prompt in &card.prompts {
        for (i, part) in wrap_text(prompt, width.saturating_sub(2)).into_iter().enumerate() {
            let bullet = if i == 0 { "• " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(bullet, Style::default().fg(color)),
                Span::styled(part, Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD)),
            ]));
        }
    }
    if card.is_generated() {
        lines.push(Line::from(Span::styled("AI", Style::default().fg(VIOLET_ACCENT))));
    }
    let points = game.turn().current_card_points;
    lines.push(Line::from(Span::styled(
        format!("{} / {} points on this card", points, game.settings().max_points_per_card),
        Style::default().fg(TEXT_MUTED),
    )));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn render_timer(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
    let turn = app.game.turn();
    let total = app.game.settings().round_seconds.max(1);
    // Smooth the bar between whole-second ticks
    let elapsed_fraction = if turn.is_running {
        app.ticker_progress(now)
    } else {
        0.0
    };
    let ratio = ((turn.remaining as f64 - elapsed_fraction) / total as f64).clamp(0.0, 1.0);
    let color = timer_color(turn.remaining, total);

    let gauge = Gauge::default()
        .block(panel("Time", BORDER_SUBTLE))
        .gauge_style(Style::default().fg(color).bg(BG_SECONDARY))
        .ratio(ratio)
        .label(Span::styled(
            format_seconds(turn.remaining),
            Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(gauge, area);
}

fn render_history(frame: &mut Frame, area: Rect, app: &App) {
    let game = &app.game;
    let rows: Vec<Row> = game
        .history()
        .iter()
        .rev()
        .take(HISTORY_ROWS)
        .map(|item| {
            let team = game
                .teams()
                .iter()
                .find(|t| t.id == item.team_id)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| "?".to_string());
            let card = game
                .card(&item.card_id)
                .map(|c| c.summary(28))
                .unwrap_or_else(|| item.card_id.clone());
            let (result, color) = if item.passed {
                ("pass".to_string(), AMBER_WARNING)
            } else {
                (format!("+{}", item.correct), GREEN_SUCCESS)
            };
            Row::new(vec![
                Cell::from(format_timestamp(item.timestamp)).style(Style::default().fg(TEXT_MUTED)),
                Cell::from(team).style(Style::default().fg(TEXT_PRIMARY)),
                Cell::from(card).style(Style::default().fg(TEXT_SECONDARY)),
                Cell::from(result).style(Style::default().fg(color)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Length(14),
            Constraint::Min(10),
            Constraint::Length(5),
        ],
    )
    .block(panel("History", BORDER_SUBTLE));
    frame.render_widget(table, area);
}

fn render_quick_panel(frame: &mut Frame, area: Rect, app: &App) {
    let game = &app.game;
    let deck = game.deck();
    let ai = game.ai_generation();

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Deck ", Style::default().fg(TEXT_MUTED)),
            Span::styled(deck.len().to_string(), Style::default().fg(CYAN_PRIMARY)),
            Span::styled("  Discard ", Style::default().fg(TEXT_MUTED)),
            Span::styled(deck.discard.len().to_string(), Style::default().fg(TEXT_SECONDARY)),
        ]),
    ];

    if game.settings().use_ai {
        let status = if ai.is_generating {
            Span::styled("AI generating...", Style::default().fg(VIOLET_ACCENT))
        } else {
            Span::styled("AI ready (i: new card)", Style::default().fg(TEXT_SECONDARY))
        };
        lines.push(Line::from(status));
    }
    if let Some(error) = &ai.error {
        lines.push(Line::from(Span::styled(
            format!("AI error: {} (c: clear)", error),
            Style::default().fg(RED_ERROR),
        )));
    }
    if let Some(card) = game.last_generated_card() {
        let width = area.width.saturating_sub(10) as usize;
        lines.push(Line::from(vec![
            Span::styled("Last AI: ", Style::default().fg(TEXT_MUTED)),
            Span::styled(card.summary(width), Style::default().fg(VIOLET_ACCENT)),
        ]));
    }
    if let Some(winner) = game.winner() {
        lines.push(Line::from(Span::styled(
            format!("🏆 {} wins! (r: new match)", winner.name),
            Style::default().fg(GREEN_SUCCESS).add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(panel("Match", BORDER_SUBTLE))
            .wrap(Wrap { trim: true }),
        area,
    );
}

pub fn render(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Score + card
            Constraint::Length(3), // Timer
            Constraint::Length(HISTORY_ROWS as u16 + 2),
        ])
        .split(area);

    render_header(frame, rows[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(7)])
        .split(middle[0]);

    render_scoreboard(frame, left[0], app);
    render_quick_panel(frame, left[1], app);
    render_card(frame, middle[1], app);
    render_timer(frame, rows[2], app, now);
    render_history(frame, rows[3], app);
}
