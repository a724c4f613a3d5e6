//! Fault detail overlay rendering.
//!
//! Displays a modal overlay with the full record of the selected fault,
//! including the complete description the table may truncate.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::clock::{format_clock, format_timestamp};
use crate::data::DeviceIndex;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 46;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 12;

/// Render the fault detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if the terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(fault) = app.selected_fault() else {
        return;
    };

    let index = DeviceIndex::new(&app.devices);
    let device = index.resolve(fault.device_id);

    let overlay_width = (area.width * 70 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = (area.height * 60 / 100).clamp(MIN_OVERLAY_HEIGHT, 24);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Min(8),    // Fields
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    let device_line = match device {
        Some(d) => format!("{} ({})", d.device_name, d.asset),
        None => "unknown device".to_string(),
    };

    let field = |name: &str, value: String| {
        Line::from(vec![
            Span::styled(
                format!(" {:<12}", name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(value),
        ])
    };

    let lines = vec![
        Line::from(""),
        field("Code", fault.code.to_string()),
        field("Device", device_line),
        field("Category", fault.category.clone()),
        field("Occurred", format_timestamp(&fault.time_stamp)),
        field("Resolved", format_timestamp(&fault.resolution_time_stamp)),
        field(
            "Duration",
            format!(
                "{} ({}s)",
                format_clock(fault.duration_seconds as u64),
                fault.duration_seconds
            ),
        ),
        Line::from(""),
        field("Description", String::new()),
        Line::from(format!("   {}", fault.description)),
    ];

    let block = Block::default()
        .title(format!(" Fault {} ", fault.code))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    frame.render_widget(paragraph, chunks[0]);

    let footer = Paragraph::new(" Esc/Enter: close  ↑↓: other faults ")
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(footer, chunks[1]);
}
