//! Terminal UI rendering using ratatui.
//!
//! This module contains all the view-specific rendering logic for the TUI.
//! Each view is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`overview`]: Top-10 bar charts (duration, frequency)
//! - [`categories`]: Per-category proportion panels with the cycled palette
//! - [`faults`]: Sortable, filterable, paginated fault table
//! - [`detail`]: Modal overlay showing the full selected fault record
//! - [`common`]: Shared components (header tiles, tabs, filter bar, status bar, help)
//! - [`theme`]: Light/dark theme support with terminal auto-detection

pub mod categories;
pub mod common;
pub mod detail;
pub mod faults;
pub mod overview;
pub mod theme;

pub use theme::{category_color, Theme, CATEGORY_PALETTE};
