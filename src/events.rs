use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, InputMode, View};
use crate::data::PAGE_SIZE;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If the detail overlay is shown, handle overlay-specific keys
    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Allow scrolling through faults while the overlay is open
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::PageUp => app.select_prev_n(PAGE_SIZE),
            KeyCode::PageDown => app.select_next_n(PAGE_SIZE),
            KeyCode::Home => app.select_first(),
            KeyCode::End => app.select_last(),
            _ => {}
        }
        return;
    }

    // If a filter field is capturing text, handle text input
    if app.input_mode != InputMode::None {
        handle_text_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Overview),
        KeyCode::Char('2') => app.set_view(View::Categories),
        KeyCode::Char('3') => app.set_view(View::Faults),

        // Navigation (up/down for rows, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(PAGE_SIZE),
        KeyCode::PageDown => app.select_next_n(PAGE_SIZE),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Enter fault detail overlay (Faults view)
        KeyCode::Enter => app.enter_detail(),

        // Go back (Esc and Backspace)
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Filter controls
        KeyCode::Char('w') => app.cycle_site(),
        KeyCode::Char('d') => app.cycle_device(),
        KeyCode::Char('/') => app.start_input(InputMode::Code),
        KeyCode::Char('[') => app.start_input(InputMode::StartDate),
        KeyCode::Char(']') => app.start_input(InputMode::EndDate),
        KeyCode::Char('f') => {
            if app.current_view == View::Faults {
                app.start_input(InputMode::ColumnFilter);
            }
        }
        KeyCode::Char('c') => app.clear_filters(),

        // Sorting (Faults view)
        KeyCode::Char('s') => {
            if app.current_view == View::Faults {
                app.cycle_sort();
            }
        }
        KeyCode::Char('S') => {
            if app.current_view == View::Faults {
                app.toggle_sort_direction();
            }
        }

        // Reload
        KeyCode::Char('r') => app.refresh(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = std::path::PathBuf::from("faultwatch_export.json");
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input while a filter field is being edited
fn handle_text_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Commit the buffer to the field
        KeyCode::Enter => app.commit_input(),

        // Cancel without applying
        KeyCode::Esc => app.cancel_input(),

        // Clear and cancel
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.cancel_input();
        }

        // Backspace
        KeyCode::Backspace => app.input_pop(),

        // Type characters
        KeyCode::Char(c) => app.input_push(c),

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        // Scroll wheel moves the table selection
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Click to select a table row
        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            if app.current_view == View::Faults && clicked_row > content_start_row {
                let item_row = (clicked_row - content_start_row - 1) as usize;
                let page_start = app.page() * PAGE_SIZE;
                let visible = app.visible_rows().len();
                if page_start + item_row < visible.min(page_start + PAGE_SIZE) {
                    app.selected_row = page_start + item_row;
                }
            }

            // Tab clicks (row 1, after the header line)
            if clicked_row == 1 {
                let col = mouse.column;
                // Approximate tab positions: Overview, Categories, Faults
                if col < 13 {
                    app.set_view(View::Overview);
                } else if col < 28 {
                    app.set_view(View::Categories);
                } else if col < 38 {
                    app.set_view(View::Faults);
                }
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}
