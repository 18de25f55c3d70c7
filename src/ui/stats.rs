//! Stat cards and the deck analytics screen

use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap},
};

use super::helpers::panel;
use crate::analytics;
use crate::app::App;
use crate::theme::{
    category_color, BG_SECONDARY, BORDER_SUBTLE, CYAN_PRIMARY, GREEN_SUCCESS, ROUNDED_BORDERS,
    TEXT_MUTED, TEXT_PRIMARY, TEXT_SECONDARY, VIOLET_ACCENT,
};

/// Render a single stat card: a big value over a small label
pub fn render_stat_card(area: Rect, value: &str, label: &str, color: Color, frame: &mut Frame) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(ROUNDED_BORDERS)
        .border_style(Style::default().fg(BORDER_SUBTLE))
        .style(Style::default().bg(BG_SECONDARY));

    let content = vec![
        Line::from(vec![Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )]),
        Line::from(vec![Span::styled(
            label.to_uppercase(),
            Style::default().fg(TEXT_MUTED),
        )]),
    ];

    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let game = &app.game;
    let report = analytics::analyze(game.pool(), game.generated_cards());
    let ai_stats = game.generation_log().summary();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Stat cards
            Constraint::Min(8),    // Charts
            Constraint::Length(8), // Recommendations
        ])
        .split(area);

    // Stat cards
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);
    render_stat_card(cards[0], &report.total_cards.to_string(), "cards", CYAN_PRIMARY, frame);
    render_stat_card(
        cards[1],
        &report.deck_composition.ai_generated.to_string(),
        "ai cards",
        VIOLET_ACCENT,
        frame,
    );
    render_stat_card(
        cards[2],
        &format!("{:.1}", report.average_prompts_per_card),
        "prompts / card",
        GREEN_SUCCESS,
        frame,
    );
    render_stat_card(
        cards[3],
        report.most_common_category.label(),
        "most common",
        category_color(report.most_common_category),
        frame,
    );

    // Charts
    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    let category_bars: Vec<Bar> = report
        .by_category
        .iter()
        .map(|stat| {
            Bar::default()
                .value(stat.count as u64)
                .label(Line::from(stat.category.label()))
                .text_value(format!("{} ({:.0}%)", stat.count, stat.percentage))
                .style(Style::default().fg(category_color(stat.category)))
        })
        .collect();
    let category_chart = BarChart::default()
        .block(panel("By category", BORDER_SUBTLE))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .value_style(Style::default().fg(TEXT_PRIMARY))
        .data(BarGroup::default().bars(&category_bars));
    frame.render_widget(category_chart, charts[0]);

    let difficulty_bars: Vec<Bar> = report
        .by_difficulty
        .iter()
        .map(|stat| {
            Bar::default()
                .value(stat.count as u64)
                .label(Line::from(stat.difficulty.label()))
                .text_value(stat.count.to_string())
                .style(Style::default().fg(CYAN_PRIMARY))
        })
        .collect();
    let difficulty_chart = BarChart::default()
        .block(panel("Estimated difficulty", BORDER_SUBTLE))
        .bar_width(6)
        .bar_gap(2)
        .value_style(Style::default().fg(Color::Black).bg(CYAN_PRIMARY))
        .data(BarGroup::default().bars(&difficulty_bars));
    frame.render_widget(difficulty_chart, charts[1]);

    // Recommendations and AI history
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[2]);

    let mut advice: Vec<Line> = analytics::balance_recommendations(&report)
        .into_iter()
        .map(|r| Line::from(Span::styled(format!("• {}", r), Style::default().fg(TEXT_PRIMARY))))
        .collect();
    let suggestions = analytics::suggested_ai_categories(&report, 3);
    if !suggestions.is_empty() {
        let names: Vec<&str> = suggestions.iter().map(|s| s.category.label()).collect();
        advice.push(Line::from(Span::styled(
            format!("Suggested AI categories: {}", names.join(", ")),
            Style::default().fg(TEXT_SECONDARY),
        )));
    }
    frame.render_widget(
        Paragraph::new(advice)
            .block(panel("Balance", BORDER_SUBTLE))
            .wrap(Wrap { trim: true }),
        bottom[0],
    );

    let mut history = vec![Line::from(vec![
        Span::styled("Generated: ", Style::default().fg(TEXT_MUTED)),
        Span::styled(
            ai_stats.total_generated.to_string(),
            Style::default().fg(VIOLET_ACCENT).add_modifier(Modifier::BOLD),
        ),
    ])];
    for (category, count) in &ai_stats.by_category {
        history.push(Line::from(vec![
            Span::styled(format!("{:<10}", category.label()), Style::default().fg(category_color(*category))),
            Span::styled(count.to_string(), Style::default().fg(TEXT_PRIMARY)),
        ]));
    }
    frame.render_widget(
        Paragraph::new(history).block(panel("AI history", BORDER_SUBTLE)),
        bottom[1],
    );
}
