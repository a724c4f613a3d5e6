// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # faultwatch
//!
//! A terminal analytics dashboard and library for device fault data.
//!
//! This crate loads two static catalogs (devices, faults) from HTTP
//! endpoints or local JSON files, filters faults by site, device, date
//! range, and fault code, and renders aggregate statistics, charts, and
//! a sortable/paginated table in an interactive terminal UI.
//!
//! ## Architecture
//!
//! The crate is organized into four main modules:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(pipeline)│    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── HttpSource | FileSource                     │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with
//!   implementations for HTTP endpoints and mtime-polled JSON files
//! - **[`data`]**: The pure core - filter criteria, the
//!   `(devices, faults, criteria) -> DerivedView` pipeline, chart payload
//!   builders, and the table model
//! - **[`ui`]**: Terminal rendering using ratatui - bar charts, category
//!   proportions, the fault table, and theme support
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Load catalogs from local JSON files
//! faultwatch --devices device.json --faults fault.json
//!
//! # Load catalogs over HTTP
//! faultwatch --url http://localhost:8080/data
//!
//! # Non-interactive: write the derived view to a file
//! faultwatch --site Colorado --export view.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use faultwatch::data::{DerivedView, FilterCriteria};
//! use faultwatch::source::{Device, Fault};
//!
//! let devices: Vec<Device> = vec![];
//! let faults: Vec<Fault> = vec![];
//! let view = DerivedView::compute(&devices, &faults, &FilterCriteria::default());
//! assert_eq!(view.summary.total_faults, 0);
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{
    ChartData, CriteriaPatch, Dataset, DerivedView, DeviceIndex, FaultColumn, FilterCriteria,
    Summary, TableModel,
};
pub use source::{DataSource, Device, Fault, FileSource, HttpSource, SourceEvent};
