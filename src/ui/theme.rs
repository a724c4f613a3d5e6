//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection,
//! plus the fixed categorical palette used by the proportion charts.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

/// Categorical palette for per-category chart slices.
///
/// Six colors; series beyond the palette cycle back to the start.
pub const CATEGORY_PALETTE: [Color; 6] = [
    Color::Red,
    Color::Blue,
    Color::Yellow,
    Color::Cyan,
    Color::Magenta,
    Color::Green,
];

/// Color for the series at `index`, cycling the palette.
pub fn category_color(index: usize) -> Color {
    CATEGORY_PALETTE[index % CATEGORY_PALETTE.len()]
}

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic selection based on the
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for error messages and load failures.
    pub error: Color,
    /// Color for nominal/OK indicators.
    pub ok: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Color for bar chart bars.
    pub bar: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            error: Color::Red,
            ok: Color::Green,
            border: Color::Gray,
            bar: Color::Cyan,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            error: Color::Red,
            ok: Color::Green,
            border: Color::DarkGray,
            bar: Color::Blue,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        assert_eq!(category_color(0), category_color(CATEGORY_PALETTE.len()));
        assert_eq!(category_color(1), category_color(7));
    }
}
