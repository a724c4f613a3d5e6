//! Categories view rendering.
//!
//! Two proportion panels over the same category set: summed fault
//! duration per category and fault count per category. Each slice gets
//! a palette color, cycling when categories outnumber the palette.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::charts::{category_duration_chart, category_frequency_chart, ChartData};
use crate::data::clock::format_clock;
use crate::ui::theme::category_color;

/// Render the Categories view.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);

    let duration = category_duration_chart(&app.derived);
    let frequency = category_frequency_chart(&app.derived);

    render_proportions(
        frame,
        app,
        chunks[0],
        " Duration by Category ",
        &duration,
        |value| format_clock(value as u64),
    );
    render_proportions(frame, app, chunks[1], " Frequency by Category ", &frequency, |value| {
        format!("{}", value as u64)
    });
}

/// Render one `ChartData` payload as proportional horizontal slices.
fn render_proportions(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    chart: &ChartData,
    format_value: impl Fn(f64) -> String,
) {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if chart.is_empty() {
        let paragraph = Paragraph::new("No faults match the current filters").block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let total: f64 = chart.values().iter().sum();
    let label_width = chart.labels.iter().map(|l| l.len()).max().unwrap_or(0).min(18);
    // Room inside the borders minus label, value, percent columns.
    let bar_space = (area.width.saturating_sub(2) as usize)
        .saturating_sub(label_width + 22)
        .max(8);

    let mut lines: Vec<Line> = vec![Line::from("")];
    for (i, (label, &value)) in chart.labels.iter().zip(chart.values()).enumerate() {
        let share = if total > 0.0 { value / total } else { 0.0 };
        let filled = ((share * bar_space as f64).round() as usize).min(bar_space);

        let color = category_color(i);
        lines.push(Line::from(vec![
            Span::styled(" ■ ", Style::default().fg(color)),
            Span::raw(format!("{:<width$} ", truncate(label, 18), width = label_width)),
            Span::styled("█".repeat(filled), Style::default().fg(color)),
            Span::raw(" ".repeat(bar_space - filled)),
            Span::styled(
                format!(" {:>9}", format_value(value)),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {:>5.1}%", share * 100.0),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
