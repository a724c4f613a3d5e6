//! Data models and processing for the fault dashboard.
//!
//! This module holds the pure core of the application: the filter
//! criteria, the filter-and-aggregation pipeline, and the chart/table
//! models derived from it.
//!
//! ## Submodules
//!
//! - [`clock`]: clock-duration and timestamp formatting/parsing
//! - [`charts`]: typed `{labels, datasets}` chart payload builders
//! - [`criteria`]: filter criteria and their state transitions
//! - [`pipeline`]: the `(devices, faults, criteria) -> DerivedView` pipeline
//! - [`table`]: fault table columns, sorting, filtering, pagination
//!
//! ## Data flow
//!
//! ```text
//! Vec<Device>, Vec<Fault> (source)     FilterCriteria (user input)
//!            │                                  │
//!            └────────────┬─────────────────────┘
//!                         ▼
//!            DerivedView::compute()
//!                         │
//!                         ├──▶ charts::*_chart()  (bar/proportion payloads)
//!                         ├──▶ TableModel::visible_rows()
//!                         └──▶ Summary (tiles)
//! ```

pub mod charts;
pub mod clock;
pub mod criteria;
pub mod pipeline;
pub mod table;

pub use charts::{ChartData, Dataset};
pub use criteria::{CriteriaPatch, FilterCriteria, DEFAULT_SITE, SITES};
pub use pipeline::{
    CategorySlice, DerivedView, DeviceIndex, DurationEntry, FrequencyEntry, Summary, TOP_LIMIT,
};
pub use table::{FaultColumn, TableModel, PAGE_SIZE};
