//! Typed chart payloads.
//!
//! The rendering boundary consumes a fixed `{labels, datasets}` shape
//! with compile-time-known fields; builders here translate a
//! [`DerivedView`] into the four chart payloads the dashboard shows.

use serde::Serialize;

use super::pipeline::DerivedView;

/// One named series of values, parallel to the chart labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
}

/// Chart-ready data: one label per slot, one or more datasets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    fn single(label: &str, labels: Vec<String>, values: Vec<f64>) -> Self {
        Self {
            labels,
            datasets: vec![Dataset {
                label: label.to_string(),
                values,
            }],
        }
    }

    /// The first dataset's values; the dashboard charts carry one series.
    pub fn values(&self) -> &[f64] {
        self.datasets.first().map(|d| d.values.as_slice()).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Bar chart of the top faults by duration: one bar per fault, labeled
/// with its code. Repeated labels are expected when long faults share a
/// code.
pub fn duration_chart(view: &DerivedView) -> ChartData {
    ChartData::single(
        "Duration (seconds)",
        view.top_by_duration.iter().map(|e| e.code.to_string()).collect(),
        view.top_by_duration.iter().map(|e| e.duration_seconds).collect(),
    )
}

/// Bar chart of the most frequent fault codes.
pub fn frequency_chart(view: &DerivedView) -> ChartData {
    ChartData::single(
        "Frequency",
        view.top_by_frequency.iter().map(|e| e.code.to_string()).collect(),
        view.top_by_frequency.iter().map(|e| e.count as f64).collect(),
    )
}

/// Proportion chart of summed duration per category.
pub fn category_duration_chart(view: &DerivedView) -> ChartData {
    ChartData::single(
        "Duration",
        view.categories.iter().map(|c| c.category.clone()).collect(),
        view.categories.iter().map(|c| c.duration_seconds).collect(),
    )
}

/// Proportion chart of fault count per category.
pub fn category_frequency_chart(view: &DerivedView) -> ChartData {
    ChartData::single(
        "Frequency",
        view.categories.iter().map(|c| c.category.clone()).collect(),
        view.categories.iter().map(|c| c.count as f64).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::criteria::FilterCriteria;
    use crate::source::{Device, Fault};

    fn view() -> DerivedView {
        let devices = vec![Device {
            id: 1,
            asset: "Minneapolis".to_string(),
            device_name: "T1".to_string(),
        }];
        let fault = |code: i64, duration: f64, category: &str| Fault {
            device_id: 1,
            time_stamp: "2024-01-01T00:00:00Z".parse().unwrap(),
            resolution_time_stamp: "2024-01-01T00:10:00Z".parse().unwrap(),
            duration_seconds: duration,
            code,
            description: String::new(),
            category: category.to_string(),
        };
        let faults = vec![
            fault(100, 30.0, "Electrical"),
            fault(200, 90.0, "Mechanical"),
            fault(100, 15.0, "Electrical"),
        ];
        DerivedView::compute(&devices, &faults, &FilterCriteria::default())
    }

    #[test]
    fn test_duration_chart_labels_are_codes() {
        let chart = duration_chart(&view());
        assert_eq!(chart.labels, vec!["200", "100", "100"]);
        assert_eq!(chart.values(), &[90.0, 30.0, 15.0]);
        assert_eq!(chart.datasets[0].label, "Duration (seconds)");
    }

    #[test]
    fn test_frequency_chart() {
        let chart = frequency_chart(&view());
        assert_eq!(chart.labels, vec!["100", "200"]);
        assert_eq!(chart.values(), &[2.0, 1.0]);
    }

    #[test]
    fn test_category_charts_share_label_set() {
        let v = view();
        let duration = category_duration_chart(&v);
        let frequency = category_frequency_chart(&v);

        assert_eq!(duration.labels, frequency.labels);
        assert_eq!(duration.labels, vec!["Electrical", "Mechanical"]);
        assert_eq!(duration.values(), &[45.0, 90.0]);
        assert_eq!(frequency.values(), &[2.0, 1.0]);
    }

    #[test]
    fn test_empty_view_yields_empty_charts() {
        let empty = DerivedView::default();
        assert!(duration_chart(&empty).is_empty());
        assert!(frequency_chart(&empty).values().is_empty());
    }
}
