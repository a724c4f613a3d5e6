//! Faults table view rendering.
//!
//! Displays the filtered fault list as a sortable, column-filterable
//! table, ten rows per page.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, InputMode};
use crate::data::{DeviceIndex, FaultColumn, TableModel, PAGE_SIZE};

/// Render the Faults view as a paginated table.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let index = DeviceIndex::new(&app.devices);
    let rows_visible = app.table.visible_rows(&app.derived.faults, &index);

    let page = app.page();
    let page_count = TableModel::page_count(rows_visible.len());
    let page_rows = TableModel::page_rows(&rows_visible, page);

    let header = Row::new(
        FaultColumn::ALL
            .iter()
            .map(|column| Cell::from(format_header(*column, app)))
            .collect::<Vec<_>>(),
    )
    .height(1)
    .style(app.theme.header);

    let body: Vec<Row> = page_rows
        .iter()
        .map(|&row| {
            let fault = &app.derived.faults[row];
            Row::new(
                FaultColumn::ALL
                    .iter()
                    .map(|column| Cell::from(column.value(fault, &index)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let widths = [
        Constraint::Length(19), // Date
        Constraint::Length(12), // Duration
        Constraint::Length(6),  // Code
        Constraint::Fill(3),    // Description - largest share
        Constraint::Fill(1),    // Device
        Constraint::Fill(1),    // Category
        Constraint::Length(19), // Resolved
    ];

    let sort_dir = if app.table.sort_ascending { "↑" } else { "↓" };

    let filter_info = if app.input_mode == InputMode::ColumnFilter {
        format!(" f:{}={}_", app.table.sort_column.label(), app.input_buffer)
    } else if app.table.has_filters() {
        let active: Vec<String> = FaultColumn::ALL
            .iter()
            .filter_map(|c| app.table.filter_for(*c).map(|t| format!("{}~{}", c.label(), t)))
            .collect();
        format!(" [{}] [c:clear]", active.join(" "))
    } else {
        String::new()
    };

    let position_info = if !rows_visible.is_empty() {
        format!(" [{}/{}]", app.selected_row + 1, rows_visible.len())
    } else {
        String::new()
    };

    let title = format!(
        " Faults ({}/{}) page {}/{} [s:sort {}{}]{}{} ",
        rows_visible.len(),
        app.derived.faults.len(),
        page + 1,
        page_count,
        app.table.sort_column.label(),
        sort_dir,
        filter_info,
        position_info
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if rows_visible.is_empty() {
        let paragraph = Paragraph::new("No faults match the current filters").block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected_row % PAGE_SIZE));

    frame.render_stateful_widget(table, area, &mut state);
}

fn format_header(column: FaultColumn, app: &App) -> Span<'static> {
    let mut label = column.label().to_string();
    if app.table.sort_column == column {
        label.push(if app.table.sort_ascending { '↑' } else { '↓' });
    }
    if app.table.filter_for(column).is_some() {
        label.push('~');
    }
    Span::raw(label)
}
