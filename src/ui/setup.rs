//! Setup screen: teams and match rules

use ratatui::{
    prelude::*,
    widgets::{List, ListItem, Paragraph, Wrap},
};

use super::helpers::panel;
use crate::app::{App, SetupField};
use crate::theme::{
    AMBER_WARNING, BG_TERTIARY, BORDER_SUBTLE, CYAN_PRIMARY, GREEN_SUCCESS, TEXT_MUTED,
    TEXT_PRIMARY, TEXT_SECONDARY, VIOLET_ACCENT,
};

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

fn field_row(label: &str, value: String, focused: bool) -> ListItem<'static> {
    let marker = if focused { "› " } else { "  " };
    let (label_style, value_style) = if focused {
        (
            Style::default().fg(CYAN_PRIMARY).add_modifier(Modifier::BOLD),
            Style::default().fg(TEXT_PRIMARY).bg(BG_TERTIARY),
        )
    } else {
        (
            Style::default().fg(TEXT_SECONDARY),
            Style::default().fg(TEXT_PRIMARY),
        )
    };
    ListItem::new(Line::from(vec![
        Span::styled(marker, Style::default().fg(CYAN_PRIMARY)),
        Span::styled(format!("{:<22}", label), label_style),
        Span::styled(format!(" ‹ {} › ", value), value_style),
    ]))
}

fn render_teams(frame: &mut Frame, area: Rect, app: &App) {
    let field = app.setup.field;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    // Name input
    let editing = field == SetupField::TeamName;
    let border = if editing { CYAN_PRIMARY } else { BORDER_SUBTLE };
    let mut input = vec![Span::styled(
        app.setup.team_name.clone(),
        Style::default().fg(TEXT_PRIMARY),
    )];
    if editing {
        input.push(Span::styled("█", Style::default().fg(CYAN_PRIMARY)));
    } else if app.setup.team_name.is_empty() {
        input.push(Span::styled("team name", Style::default().fg(TEXT_MUTED)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(input)).block(panel("New team", border)),
        layout[0],
    );

    // Team list
    let teams = app.game.teams();
    let items: Vec<ListItem> = if teams.is_empty() {
        vec![ListItem::new(Span::styled(
            "No teams yet. Type a name and press Enter.",
            Style::default().fg(TEXT_MUTED),
        ))]
    } else {
        teams
            .iter()
            .enumerate()
            .map(|(i, team)| {
                let selected = field == SetupField::Teams && i == app.setup.selected_team;
                let style = if selected {
                    Style::default().fg(VIOLET_ACCENT).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(TEXT_PRIMARY)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{}. ", i + 1), Style::default().fg(TEXT_MUTED)),
                    Span::styled(team.name.clone(), style),
                    Span::styled(format!("  {} pts", team.points), Style::default().fg(TEXT_MUTED)),
                ]))
            })
            .collect()
    };
    let border = if field == SetupField::Teams { CYAN_PRIMARY } else { BORDER_SUBTLE };
    frame.render_widget(
        List::new(items).block(panel(&format!("Teams ({})", teams.len()), border)),
        layout[1],
    );
}

fn render_rules(frame: &mut Frame, area: Rect, app: &App) {
    let settings = app.game.settings();
    let field = app.setup.field;
    let rows = [
        (SetupField::RoundSeconds, "Round length", format!("{}s", settings.round_seconds)),
        (SetupField::TargetPoints, "Points to win", settings.target_points.to_string()),
        (
            SetupField::MaxPointsPerCard,
            "Max points per card",
            settings.max_points_per_card.to_string(),
        ),
        (
            SetupField::AutoPass,
            "Auto-pass at max",
            on_off(settings.auto_pass_on_max_points).to_string(),
        ),
        (
            SetupField::ShowCard,
            "Show card on draw",
            on_off(settings.show_card_by_default).to_string(),
        ),
        (SetupField::AiOnly, "AI-only deck", on_off(settings.ai_only_mode).to_string()),
        (
            SetupField::AiDifficulty,
            "AI difficulty",
            settings.ai_difficulty.label().to_string(),
        ),
        (
            SetupField::AiLanguage,
            "AI language",
            settings.ai_language.label().to_string(),
        ),
    ];

    let mut items: Vec<ListItem> = rows
        .into_iter()
        .map(|(row, label, value)| field_row(label, value, row == field))
        .collect();

    let key_line = if settings.has_api_key() {
        Span::styled("  AI: key configured", Style::default().fg(GREEN_SUCCESS))
    } else {
        Span::styled("  AI: no API key (k to add)", Style::default().fg(TEXT_MUTED))
    };
    items.push(ListItem::new(Line::from("")));
    items.push(ListItem::new(Line::from(key_line)));

    let focused = !matches!(field, SetupField::TeamName | SetupField::Teams);
    let border = if focused { CYAN_PRIMARY } else { BORDER_SUBTLE };
    frame.render_widget(List::new(items).block(panel("Rules", border)), area);
}

fn render_config_notes(frame: &mut Frame, area: Rect, app: &App) {
    let check = &app.config_check;
    let mut lines: Vec<Line> = check
        .warnings
        .iter()
        .map(|w| Line::from(Span::styled(format!("⚠ {}", w), Style::default().fg(AMBER_WARNING))))
        .collect();
    lines.extend(check.suggestions.iter().map(|s| {
        Line::from(Span::styled(format!("• {}", s), Style::default().fg(TEXT_SECONDARY)))
    }));
    let border = if check.is_valid() { BORDER_SUBTLE } else { AMBER_WARNING };
    frame.render_widget(
        Paragraph::new(lines)
            .block(panel("Configuration", border))
            .wrap(Wrap { trim: true }),
        area,
    );
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let check = &app.config_check;
    let notes = check.warnings.len() + check.suggestions.len();
    let notes_height = if notes == 0 { 0 } else { notes as u16 + 2 };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(notes_height)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[0]);

    render_teams(frame, columns[0], app);
    render_rules(frame, columns[1], app);
    if notes_height > 0 {
        render_config_notes(frame, rows[1], app);
    }
}
