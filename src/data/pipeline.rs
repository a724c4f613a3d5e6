//! The filter-and-aggregation pipeline.
//!
//! Pure functions from `(devices, faults, criteria)` to a [`DerivedView`]:
//! the filtered fault list plus the aggregate views the charts and
//! summary tiles render. Source collections are never mutated; every
//! criteria change recomputes the whole view from an explicit snapshot
//! of its inputs.

use std::collections::HashMap;

use serde::Serialize;

use super::clock::format_clock;
use super::criteria::FilterCriteria;
use crate::source::{Device, Fault};

/// How many entries the per-fault and per-code top lists carry.
pub const TOP_LIMIT: usize = 10;

/// Device lookup by id, built once per recomputation.
///
/// Faults resolve their device through this index; a linear scan per
/// fault would make filtering quadratic in the catalog size.
#[derive(Debug)]
pub struct DeviceIndex<'a> {
    by_id: HashMap<i64, &'a Device>,
}

impl<'a> DeviceIndex<'a> {
    pub fn new(devices: &'a [Device]) -> Self {
        Self {
            by_id: devices.iter().map(|d| (d.id, d)).collect(),
        }
    }

    /// Resolve a fault's device. `None` for a dangling reference.
    pub fn resolve(&self, device_id: i64) -> Option<&'a Device> {
        self.by_id.get(&device_id).copied()
    }

    /// The device name for display contexts; empty when unresolved.
    pub fn device_name(&self, device_id: i64) -> &'a str {
        self.resolve(device_id).map(|d| d.device_name.as_str()).unwrap_or("")
    }
}

/// One entry of the top-10-by-duration list.
///
/// Entries are per fault, not per code: several entries may carry the
/// same code, which shows up as repeated labels in the duration chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationEntry {
    pub code: i64,
    pub duration_seconds: f64,
}

/// One entry of the top-10-by-frequency list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    pub code: i64,
    pub count: usize,
}

/// Per-category aggregate: duration sum and fault count over the same
/// category set, feeding the two proportion charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub category: String,
    pub duration_seconds: f64,
    pub count: usize,
}

/// Scalar summary statistics over the filtered fault list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_faults: usize,
    pub total_duration_seconds: f64,
}

impl Summary {
    /// Total duration as a clock string (`HH:MM:SS`).
    pub fn formatted_duration(&self) -> String {
        format_clock(self.total_duration_seconds as u64)
    }
}

/// The complete derived state computed from one criteria snapshot.
#[derive(Debug, Clone, Default)]
pub struct DerivedView {
    /// Faults passing all filter predicates, original order preserved.
    pub faults: Vec<Fault>,
    /// Top faults by duration, descending, at most [`TOP_LIMIT`].
    pub top_by_duration: Vec<DurationEntry>,
    /// Most frequent codes, descending by count, at most [`TOP_LIMIT`].
    pub top_by_frequency: Vec<FrequencyEntry>,
    /// Per-category aggregates in first-encountered order.
    pub categories: Vec<CategorySlice>,
    /// Scalar totals over the filtered list.
    pub summary: Summary,
}

impl DerivedView {
    /// Run the pipeline over a snapshot of the loaded collections.
    pub fn compute(devices: &[Device], faults: &[Fault], criteria: &FilterCriteria) -> Self {
        let index = DeviceIndex::new(devices);

        let filtered: Vec<Fault> = faults
            .iter()
            .filter(|fault| passes_filter(fault, &index, criteria))
            .cloned()
            .collect();

        let top_by_duration = top_by_duration(&filtered);
        let top_by_frequency = top_by_frequency(&filtered);
        let categories = aggregate_categories(&filtered);

        let summary = Summary {
            total_faults: filtered.len(),
            total_duration_seconds: filtered.iter().map(|f| f.duration_seconds).sum(),
        };

        Self {
            faults: filtered,
            top_by_duration,
            top_by_frequency,
            categories,
            summary,
        }
    }
}

/// The four filter predicates of the pipeline. A fault passes iff all
/// of them hold; an unresolved device excludes the fault outright.
fn passes_filter(fault: &Fault, index: &DeviceIndex, criteria: &FilterCriteria) -> bool {
    let Some(device) = index.resolve(fault.device_id) else {
        return false;
    };

    if device.asset != criteria.site {
        return false;
    }
    if let Some(ref device_name) = criteria.device_name {
        if device.device_name != *device_name {
            return false;
        }
    }
    if let Some((start, end)) = criteria.effective_range() {
        // Inclusive on both ends.
        if fault.time_stamp < start || fault.time_stamp > end {
            return false;
        }
    }
    if let Some(ref code) = criteria.code {
        if fault.code.to_string() != *code {
            return false;
        }
    }

    true
}

/// Stable descending sort on duration; ties keep original order.
fn top_by_duration(filtered: &[Fault]) -> Vec<DurationEntry> {
    let mut ordered: Vec<&Fault> = filtered.iter().collect();
    ordered.sort_by(|a, b| b.duration_seconds.total_cmp(&a.duration_seconds));

    ordered
        .into_iter()
        .take(TOP_LIMIT)
        .map(|f| DurationEntry {
            code: f.code,
            duration_seconds: f.duration_seconds,
        })
        .collect()
}

/// Count occurrences per code; ties keep first-encountered code order.
fn top_by_frequency(filtered: &[Fault]) -> Vec<FrequencyEntry> {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    let mut order: Vec<i64> = Vec::new();

    for fault in filtered {
        let entry = counts.entry(fault.code).or_insert(0);
        if *entry == 0 {
            order.push(fault.code);
        }
        *entry += 1;
    }

    let mut entries: Vec<FrequencyEntry> = order
        .into_iter()
        .map(|code| FrequencyEntry {
            code,
            count: counts[&code],
        })
        .collect();

    // Stable sort over first-encountered order gives a deterministic
    // tie-break.
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(TOP_LIMIT);
    entries
}

/// Group by category, summing durations and counting faults.
/// Categories keep first-encountered order.
fn aggregate_categories(filtered: &[Fault]) -> Vec<CategorySlice> {
    let mut slices: Vec<CategorySlice> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for fault in filtered {
        let position = *positions.entry(fault.category.clone()).or_insert_with(|| {
            slices.push(CategorySlice {
                category: fault.category.clone(),
                duration_seconds: 0.0,
                count: 0,
            });
            slices.len() - 1
        });
        slices[position].duration_seconds += fault.duration_seconds;
        slices[position].count += 1;
    }

    slices
}
