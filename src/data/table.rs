//! Table model for the fault list.
//!
//! Column descriptors with display formatting and typed comparison,
//! client-side sorting, per-column substring filters, and fixed-size
//! pagination. The UI layer renders whatever page this model exposes.

use std::cmp::Ordering;

use super::clock::format_timestamp;
use super::pipeline::DeviceIndex;
use crate::source::Fault;

/// Rows shown per table page.
pub const PAGE_SIZE: usize = 10;

/// The table columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FaultColumn {
    #[default]
    Time,
    Duration,
    Code,
    Description,
    DeviceName,
    Category,
    ResolvedAt,
}

impl FaultColumn {
    pub const ALL: [FaultColumn; 7] = [
        FaultColumn::Time,
        FaultColumn::Duration,
        FaultColumn::Code,
        FaultColumn::Description,
        FaultColumn::DeviceName,
        FaultColumn::Category,
        FaultColumn::ResolvedAt,
    ];

    /// Header label.
    pub fn label(&self) -> &'static str {
        match self {
            FaultColumn::Time => "Date",
            FaultColumn::Duration => "Duration (s)",
            FaultColumn::Code => "Code",
            FaultColumn::Description => "Description",
            FaultColumn::DeviceName => "Device",
            FaultColumn::Category => "Category",
            FaultColumn::ResolvedAt => "Resolved",
        }
    }

    /// Cycle to the next column.
    pub fn next(self) -> Self {
        let position = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(position + 1) % Self::ALL.len()]
    }

    /// Display value for a cell. Timestamps render as
    /// `YYYY-MM-DD HH:mm:ss`; the device name is derived via the join
    /// and empty for a dangling reference.
    pub fn value(&self, fault: &Fault, index: &DeviceIndex) -> String {
        match self {
            FaultColumn::Time => format_timestamp(&fault.time_stamp),
            FaultColumn::Duration => format_number(fault.duration_seconds),
            FaultColumn::Code => fault.code.to_string(),
            FaultColumn::Description => fault.description.clone(),
            FaultColumn::DeviceName => index.device_name(fault.device_id).to_string(),
            FaultColumn::Category => fault.category.clone(),
            FaultColumn::ResolvedAt => format_timestamp(&fault.resolution_time_stamp),
        }
    }

    /// Typed comparison for sorting; numeric columns compare as numbers,
    /// not strings.
    pub fn compare(&self, a: &Fault, b: &Fault, index: &DeviceIndex) -> Ordering {
        match self {
            FaultColumn::Time => a.time_stamp.cmp(&b.time_stamp),
            FaultColumn::Duration => a.duration_seconds.total_cmp(&b.duration_seconds),
            FaultColumn::Code => a.code.cmp(&b.code),
            FaultColumn::Description => a.description.cmp(&b.description),
            FaultColumn::DeviceName => {
                index.device_name(a.device_id).cmp(index.device_name(b.device_id))
            }
            FaultColumn::Category => a.category.cmp(&b.category),
            FaultColumn::ResolvedAt => a.resolution_time_stamp.cmp(&b.resolution_time_stamp),
        }
    }
}

/// Render a duration cell without trailing noise for whole seconds.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Client-side sort, filter, and pagination state for the fault table.
#[derive(Debug, Clone)]
pub struct TableModel {
    pub sort_column: FaultColumn,
    pub sort_ascending: bool,
    /// Per-column substring filters, case-insensitive.
    filters: Vec<(FaultColumn, String)>,
}

impl Default for TableModel {
    fn default() -> Self {
        Self {
            sort_column: FaultColumn::Time,
            sort_ascending: true,
            filters: Vec::new(),
        }
    }
}

impl TableModel {
    /// Set or clear the filter for a column. Empty text clears.
    pub fn set_filter(&mut self, column: FaultColumn, text: &str) {
        self.filters.retain(|(c, _)| *c != column);
        let text = text.trim();
        if !text.is_empty() {
            self.filters.push((column, text.to_lowercase()));
        }
    }

    pub fn filter_for(&self, column: FaultColumn) -> Option<&str> {
        self.filters
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, text)| text.as_str())
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Cycle the sort column through display order.
    pub fn cycle_sort(&mut self) {
        self.sort_column = self.sort_column.next();
    }

    pub fn toggle_direction(&mut self) {
        self.sort_ascending = !self.sort_ascending;
    }

    /// Apply column filters and the current sort, returning row indices
    /// into `faults`. The sort is stable with a time-stamp tie-break.
    pub fn visible_rows(&self, faults: &[Fault], index: &DeviceIndex) -> Vec<usize> {
        let mut rows: Vec<usize> = (0..faults.len())
            .filter(|&i| self.matches_filters(&faults[i], index))
            .collect();

        rows.sort_by(|&a, &b| {
            let primary = self.sort_column.compare(&faults[a], &faults[b], index);
            let primary = if self.sort_ascending {
                primary
            } else {
                primary.reverse()
            };
            if primary == Ordering::Equal {
                faults[a].time_stamp.cmp(&faults[b].time_stamp)
            } else {
                primary
            }
        });

        rows
    }

    fn matches_filters(&self, fault: &Fault, index: &DeviceIndex) -> bool {
        self.filters.iter().all(|(column, text)| {
            column.value(fault, index).to_lowercase().contains(text)
        })
    }

    /// Number of pages for `row_count` rows; at least one.
    pub fn page_count(row_count: usize) -> usize {
        row_count.div_ceil(PAGE_SIZE).max(1)
    }

    /// The slice of `rows` belonging to `page`.
    pub fn page_rows(rows: &[usize], page: usize) -> &[usize] {
        let start = page * PAGE_SIZE;
        if start >= rows.len() {
            return &[];
        }
        let end = (start + PAGE_SIZE).min(rows.len());
        &rows[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Device;

    fn devices() -> Vec<Device> {
        vec![
            Device {
                id: 1,
                asset: "Minneapolis".to_string(),
                device_name: "T1".to_string(),
            },
            Device {
                id: 2,
                asset: "Minneapolis".to_string(),
                device_name: "T2".to_string(),
            },
        ]
    }

    fn fault(device_id: i64, code: i64, duration: f64, time: &str, desc: &str) -> Fault {
        Fault {
            device_id,
            time_stamp: time.parse().unwrap(),
            resolution_time_stamp: time.parse().unwrap(),
            duration_seconds: duration,
            code,
            description: desc.to_string(),
            category: "A".to_string(),
        }
    }

    fn sample() -> Vec<Fault> {
        vec![
            fault(1, 300, 45.0, "2024-01-03T00:00:00Z", "Grid loss"),
            fault(2, 100, 90.0, "2024-01-01T00:00:00Z", "Pitch fault"),
            fault(1, 200, 10.5, "2024-01-02T00:00:00Z", "Yaw drift"),
        ]
    }

    #[test]
    fn test_default_sort_is_time_ascending() {
        let devices = devices();
        let faults = sample();
        let index = DeviceIndex::new(&devices);
        let model = TableModel::default();

        let rows = model.visible_rows(&faults, &index);
        assert_eq!(rows, vec![1, 2, 0]);
    }

    #[test]
    fn test_numeric_sort_on_duration() {
        let devices = devices();
        let faults = sample();
        let index = DeviceIndex::new(&devices);
        let mut model = TableModel::default();
        model.sort_column = FaultColumn::Duration;
        model.sort_ascending = false;

        let rows = model.visible_rows(&faults, &index);
        assert_eq!(rows, vec![1, 0, 2]);
    }

    #[test]
    fn test_column_filter_on_device_name() {
        let devices = devices();
        let faults = sample();
        let index = DeviceIndex::new(&devices);
        let mut model = TableModel::default();
        model.set_filter(FaultColumn::DeviceName, "t1");

        let rows = model.visible_rows(&faults, &index);
        assert_eq!(rows.len(), 2);
        for row in rows {
            assert_eq!(faults[row].device_id, 1);
        }
    }

    #[test]
    fn test_filter_clears_on_empty_text() {
        let mut model = TableModel::default();
        model.set_filter(FaultColumn::Code, "100");
        assert!(model.has_filters());
        model.set_filter(FaultColumn::Code, "  ");
        assert!(!model.has_filters());
    }

    #[test]
    fn test_filters_combine_across_columns() {
        let devices = devices();
        let faults = sample();
        let index = DeviceIndex::new(&devices);
        let mut model = TableModel::default();
        model.set_filter(FaultColumn::DeviceName, "t1");
        model.set_filter(FaultColumn::Description, "grid");

        let rows = model.visible_rows(&faults, &index);
        assert_eq!(rows, vec![0]);
    }

    #[test]
    fn test_pagination_fixed_page_size() {
        let rows: Vec<usize> = (0..23).collect();
        assert_eq!(TableModel::page_count(rows.len()), 3);
        assert_eq!(TableModel::page_rows(&rows, 0).len(), PAGE_SIZE);
        assert_eq!(TableModel::page_rows(&rows, 2), &[20, 21, 22]);
        assert!(TableModel::page_rows(&rows, 3).is_empty());
        assert_eq!(TableModel::page_count(0), 1);
    }

    #[test]
    fn test_cell_values_and_formats() {
        let devices = devices();
        let faults = sample();
        let index = DeviceIndex::new(&devices);

        assert_eq!(
            FaultColumn::Time.value(&faults[1], &index),
            "2024-01-01 00:00:00"
        );
        assert_eq!(FaultColumn::Duration.value(&faults[2], &index), "10.5");
        assert_eq!(FaultColumn::Duration.value(&faults[1], &index), "90");
        assert_eq!(FaultColumn::DeviceName.value(&faults[1], &index), "T2");
    }

    #[test]
    fn test_dangling_device_renders_empty_name() {
        let devices = devices();
        let index = DeviceIndex::new(&devices);
        let orphan = fault(99, 1, 1.0, "2024-01-01T00:00:00Z", "orphan");
        assert_eq!(FaultColumn::DeviceName.value(&orphan, &index), "");
    }

    #[test]
    fn test_column_cycle_wraps() {
        let mut column = FaultColumn::Time;
        for _ in 0..FaultColumn::ALL.len() {
            column = column.next();
        }
        assert_eq!(column, FaultColumn::Time);
    }
}
