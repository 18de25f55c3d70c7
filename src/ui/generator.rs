//! AI card generator screen

use ratatui::{
    prelude::*,
    widgets::{List, ListItem, Paragraph, Wrap},
};

use super::helpers::panel;
use crate::app::App;
use crate::theme::{
    category_color, get_pulse_color, BORDER_SUBTLE, CYAN_DIM, CYAN_PRIMARY, GREEN_SUCCESS,
    RED_ERROR, TEXT_MUTED, TEXT_PRIMARY, TEXT_SECONDARY, VIOLET_ACCENT,
};

fn option_line(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), Style::default().fg(TEXT_MUTED)),
        Span::styled(
            format!("‹ {} ›", value),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

fn render_options(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.generator;
    let game = &app.game;
    let settings = game.settings();

    let mut lines = vec![
        option_line("Category", form.category.label().to_string(), category_color(form.category)),
        Line::from(Span::styled(
            format!("            {}", form.category.description(settings.ai_language)),
            Style::default().fg(TEXT_SECONDARY),
        )),
        option_line("Difficulty", form.difficulty.label().to_string(), CYAN_PRIMARY),
        option_line("Count", form.count.to_string(), CYAN_PRIMARY),
        option_line("Language", settings.ai_language.label().to_string(), TEXT_PRIMARY),
        Line::from(""),
    ];

    let ai = game.ai_generation();
    if !settings.has_api_key() {
        lines.push(Line::from(Span::styled(
            "No API key configured. Press F5 to add one.",
            Style::default().fg(RED_ERROR),
        )));
    } else if ai.is_generating {
        lines.push(Line::from(Span::styled(
            "Generating...",
            Style::default().fg(get_pulse_color(app.animation_tick, VIOLET_ACCENT, CYAN_DIM)),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Ready",
            Style::default().fg(GREEN_SUCCESS),
        )));
    }
    if let Some(error) = &ai.error {
        lines.push(Line::from(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(RED_ERROR),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(panel("Generate", BORDER_SUBTLE))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_preview(frame: &mut Frame, area: Rect, app: &App) {
    let preview = app.game.preview();
    let items: Vec<ListItem> = if preview.is_empty() {
        vec![ListItem::new(Span::styled(
            "Generated cards show up here for review",
            Style::default().fg(TEXT_MUTED),
        ))]
    } else {
        preview
            .iter()
            .enumerate()
            .map(|(i, card)| {
                let prompt = card.prompts.first().cloned().unwrap_or_default();
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(TEXT_MUTED)),
                    Span::styled(prompt, Style::default().fg(TEXT_PRIMARY)),
                ]))
            })
            .collect()
    };
    let border = if preview.is_empty() { BORDER_SUBTLE } else { VIOLET_ACCENT };
    let title = format!("Preview ({}) a: accept, x: discard", preview.len());
    frame.render_widget(List::new(items).block(panel(&title, border)), area);
}

fn render_library(frame: &mut Frame, area: Rect, app: &App) {
    let game = &app.game;
    let summary = game.generation_log().summary();
    let width = area.width.saturating_sub(4) as usize;

    let mut lines = vec![Line::from(vec![
        Span::styled("Library ", Style::default().fg(TEXT_MUTED)),
        Span::styled(
            game.generated_cards().len().to_string(),
            Style::default().fg(VIOLET_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ·  generated ", Style::default().fg(TEXT_MUTED)),
        Span::styled(summary.total_generated.to_string(), Style::default().fg(CYAN_PRIMARY)),
    ])];
    for card in game.generated_cards().iter().take(area.height.saturating_sub(3) as usize) {
        lines.push(Line::from(Span::styled(
            card.summary(width),
            Style::default().fg(category_color(card.category)),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(panel("AI cards", BORDER_SUBTLE)), area);
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Min(4)])
        .split(columns[0]);

    render_options(frame, left[0], app);
    render_library(frame, left[1], app);
    render_preview(frame, columns[1], app);
}
