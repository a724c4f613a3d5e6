//! Common UI components shared across views.
//!
//! This module contains the header bar (summary tiles), tab bar, filter
//! bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, InputMode, View};
use crate::data::clock::format_timestamp;

/// Render the header bar with the summary tiles.
///
/// Displays: load status indicator, total fault count and total duration
/// for the current filter, and the size of the loaded catalogs.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    if app.devices.is_empty() && app.faults.is_empty() {
        let line = Line::from(vec![
            Span::styled(
                " FAULTWATCH ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let (status_icon, status_style) = if app.load_error.is_some() {
        ("●", Style::default().fg(app.theme.error))
    } else {
        ("●", Style::default().fg(app.theme.ok))
    };

    let summary = &app.derived.summary;

    let line = Line::from(vec![
        Span::styled(format!(" {} ", status_icon), status_style),
        Span::styled("FAULTWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            format!("{}", summary.total_faults),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" faults │ total "),
        Span::styled(
            summary.formatted_duration(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ catalog: {} devices, {} faults",
            app.devices.len(),
            app.faults.len()
        )),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Overview "),
        Line::from(" 2:Categories "),
        Line::from(" 3:Faults "),
    ];

    let selected = match app.current_view {
        View::Overview => 0,
        View::Categories => 1,
        View::Faults => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the filter bar showing the active criteria.
///
/// While a field is being edited its live buffer is shown with a cursor
/// marker; otherwise each filter shows its committed value or "-".
pub fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let criteria = &app.criteria;

    let device = criteria.device_name.as_deref().unwrap_or("All");
    let range = match (criteria.start, criteria.end) {
        (None, None) => "-".to_string(),
        (start, end) => {
            let fmt = |ts: Option<chrono::DateTime<chrono::Utc>>| {
                ts.map(|t| format_timestamp(&t)).unwrap_or_else(|| "…".to_string())
            };
            let rendered = format!("{} → {}", fmt(start), fmt(end));
            if criteria.effective_range().is_none() && start.is_some() && end.is_some() {
                // Inverted range: shown, but inactive.
                format!("{} (ignored)", rendered)
            } else {
                rendered
            }
        }
    };
    let code = criteria.code.as_deref().unwrap_or("-");

    let mut spans = vec![
        Span::raw(" site:"),
        Span::styled(
            criteria.site.clone(),
            Style::default().fg(app.theme.highlight),
        ),
        Span::raw("  device:"),
        Span::styled(device.to_string(), Style::default().fg(app.theme.highlight)),
        Span::raw("  range:"),
        Span::styled(range, Style::default().fg(app.theme.highlight)),
        Span::raw("  code:"),
        Span::styled(code.to_string(), Style::default().fg(app.theme.highlight)),
    ];

    if app.input_mode != InputMode::None {
        spans.push(Span::styled(
            format!("  {}:{}_", app.input_mode.label(), app.input_buffer),
            Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// Shows: data source, time since last update, available controls.
/// Also displays temporary status messages and load errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref err) = app.load_error {
        let paragraph = Paragraph::new(format!(" Load error: {} | r:retry q:quit ", err))
            .style(Style::default().fg(app.theme.error));
        frame.render_widget(paragraph, area);
        return;
    }

    let age = app
        .last_updated
        .map(|t| format!("{:.0}s ago", t.elapsed().as_secs_f64()))
        .unwrap_or_else(|| "never".to_string());

    let controls = if app.input_mode != InputMode::None {
        "Type value | Enter:apply Esc:cancel"
    } else {
        match app.current_view {
            View::Overview | View::Categories => {
                "w:site d:device /[code []:dates c:clear Tab:switch ?:help q:quit"
            }
            View::Faults => {
                "s:sort S:reverse f:filter Enter:detail w:site d:device c:clear ?:help q:quit"
            }
        }
    };

    let status = format!(
        " {} | Updated {} | {}",
        app.source_description(),
        age,
        controls
    );

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Move table selection"),
        Line::from("  PgUp/PgDn   Previous/next page"),
        Line::from("  Home/End    First/last row"),
        Line::from("  Enter       Fault detail (Faults view)"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Filters",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  w         Cycle site"),
        Line::from("  d         Cycle device (All + site devices)"),
        Line::from("  /         Edit fault code filter"),
        Line::from("  [ / ]     Edit range start / end date"),
        Line::from("  f         Filter current table column"),
        Line::from("  c         Clear all filters"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Faults table",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  s         Cycle sort column"),
        Line::from("  S         Toggle sort direction"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Reload data"),
        Line::from("  e         Export view to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 48u16.min(area.width.saturating_sub(4));
    let help_height = 30u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
