//! Overview view rendering.
//!
//! Shows the two top-10 bar charts side by side: longest faults by
//! duration and most frequent fault codes.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::charts::{duration_chart, frequency_chart, ChartData};

/// Render the Overview view.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);

    let duration = duration_chart(&app.derived);
    let frequency = frequency_chart(&app.derived);

    render_bar_chart(frame, app, chunks[0], " Top 10 by Duration (s) ", &duration);
    render_bar_chart(frame, app, chunks[1], " Top 10 by Frequency ", &frequency);
}

/// Render one `ChartData` payload as a ratatui bar chart.
///
/// Labels repeat when several top faults share a code; that is the
/// per-fault duration view, not a bug.
fn render_bar_chart(frame: &mut Frame, app: &App, area: Rect, title: &str, chart: &ChartData) {
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

    let bars: Vec<Bar> = chart
        .labels
        .iter()
        .zip(chart.values())
        .map(|(label, &value)| {
            Bar::default()
                .label(Line::from(label.clone()))
                .value(value.round() as u64)
                .style(Style::default().fg(app.theme.bar))
        })
        .collect();

    // Size bars to the available width so ten bars stay visible.
    let inner_width = area.width.saturating_sub(2) as usize;
    let count = bars.len().max(1);
    let bar_width = ((inner_width.saturating_sub(count)) / count).clamp(3, 9) as u16;

    let bar_chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1);

    frame.render_widget(bar_chart, area);
}
