//! Application state and navigation logic.

use std::time::Instant;

use anyhow::Result;

use crate::data::{
    CriteriaPatch, DerivedView, DeviceIndex, FilterCriteria, TableModel, PAGE_SIZE,
};
use crate::source::{DataSource, Device, Fault, SourceEvent};
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Fault detail is shown as an overlay (controlled by
/// `App::show_detail_overlay`) rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Summary tiles plus the two top-10 bar charts.
    Overview,
    /// Per-category duration and frequency proportions.
    Categories,
    /// Sortable, filterable, paginated fault table.
    Faults,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Categories,
            View::Categories => View::Faults,
            View::Faults => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Overview => View::Faults,
            View::Categories => View::Overview,
            View::Faults => View::Categories,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Categories => "Categories",
            View::Faults => "Faults",
        }
    }
}

/// Which filter field is capturing text input, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    None,
    /// Free-text fault code filter.
    Code,
    /// Range start, `YYYY-MM-DD [HH:MM:SS]`.
    StartDate,
    /// Range end, `YYYY-MM-DD [HH:MM:SS]`.
    EndDate,
    /// Substring filter for the table's current sort column.
    ColumnFilter,
}

impl InputMode {
    pub fn label(&self) -> &'static str {
        match self {
            InputMode::None => "",
            InputMode::Code => "code",
            InputMode::StartDate => "start",
            InputMode::EndDate => "end",
            InputMode::ColumnFilter => "column",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source and loaded collections
    source: Box<dyn DataSource>,
    pub devices: Vec<Device>,
    pub faults: Vec<Fault>,
    pub load_error: Option<String>,
    pub last_updated: Option<Instant>,

    // Filter state and the view derived from it
    pub criteria: FilterCriteria,
    pub derived: DerivedView,

    // Fault table state
    pub table: TableModel,
    /// Selected index into the table's visible (filtered+sorted) rows.
    pub selected_row: usize,

    // Text input for code/date/column filters
    pub input_mode: InputMode,
    pub input_buffer: String,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App with the given data source and initial criteria.
    pub fn new(source: Box<dyn DataSource>, criteria: FilterCriteria) -> Self {
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            show_detail_overlay: false,
            source,
            devices: Vec::new(),
            faults: Vec::new(),
            load_error: None,
            last_updated: None,
            criteria,
            derived: DerivedView::default(),
            table: TableModel::default(),
            selected_row: 0,
            input_mode: InputMode::None,
            input_buffer: String::new(),
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Drain the data source, applying any arrived collections.
    ///
    /// Each collection overwrites its predecessor (last-write-wins);
    /// a load failure leaves the affected collection untouched and is
    /// surfaced through `load_error`.
    pub fn poll_source(&mut self) -> bool {
        let mut updated = false;

        while let Some(event) = self.source.poll() {
            match event {
                SourceEvent::Devices(devices) => self.devices = devices,
                SourceEvent::Faults(faults) => self.faults = faults,
            }
            updated = true;
        }

        self.load_error = self.source.error();

        if updated {
            self.last_updated = Some(Instant::now());
            self.recompute();
        }
        updated
    }

    /// Ask the source to reload both collections, then drain it once.
    pub fn refresh(&mut self) {
        self.source.request_refresh();
        self.poll_source();
    }

    /// Recompute the derived view from an explicit snapshot of
    /// `(devices, faults, criteria)`.
    fn recompute(&mut self) {
        self.derived = DerivedView::compute(&self.devices, &self.faults, &self.criteria);
        self.clamp_selection();
    }

    /// Apply a criteria patch and recompute.
    pub fn apply_patch(&mut self, patch: CriteriaPatch) {
        self.criteria = self.criteria.apply(patch);
        self.selected_row = 0;
        self.recompute();
    }

    /// Cycle to the next site in the fixed site set.
    pub fn cycle_site(&mut self) {
        let next = self.criteria.next_site();
        self.apply_patch(CriteriaPatch::site(next));
    }

    /// Device names selectable for the current site, in catalog order.
    pub fn device_options(&self) -> Vec<String> {
        let mut options: Vec<String> = Vec::new();
        for device in self.devices.iter().filter(|d| d.asset == self.criteria.site) {
            if !options.iter().any(|name| *name == device.device_name) {
                options.push(device.device_name.clone());
            }
        }
        options
    }

    /// Cycle the device filter: All -> each device of the site -> All.
    pub fn cycle_device(&mut self) {
        let options = self.device_options();
        let next = match &self.criteria.device_name {
            None => options.first().cloned(),
            Some(current) => match options.iter().position(|name| name == current) {
                Some(position) if position + 1 < options.len() => {
                    Some(options[position + 1].clone())
                }
                _ => None,
            },
        };
        self.apply_patch(CriteriaPatch::device(next));
    }

    /// Enter a text input mode, seeding the buffer with the current value.
    pub fn start_input(&mut self, mode: InputMode) {
        self.input_buffer = match mode {
            InputMode::Code => self.criteria.code.clone().unwrap_or_default(),
            InputMode::StartDate => self
                .criteria
                .start
                .map(|ts| crate::data::clock::format_timestamp(&ts))
                .unwrap_or_default(),
            InputMode::EndDate => self
                .criteria
                .end
                .map(|ts| crate::data::clock::format_timestamp(&ts))
                .unwrap_or_default(),
            InputMode::ColumnFilter => self
                .table
                .filter_for(self.table.sort_column)
                .unwrap_or_default()
                .to_string(),
            InputMode::None => String::new(),
        };
        self.input_mode = mode;
    }

    /// Exit input mode without applying the buffer.
    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::None;
        self.input_buffer.clear();
    }

    /// Append a character to the input buffer.
    pub fn input_push(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    /// Remove the last character from the input buffer.
    pub fn input_pop(&mut self) {
        self.input_buffer.pop();
    }

    /// Commit the input buffer to the field being edited.
    ///
    /// An empty buffer clears the filter. An unparseable date leaves
    /// the criteria unchanged and reports through the status bar.
    pub fn commit_input(&mut self) {
        let text = self.input_buffer.trim().to_string();
        let mode = self.input_mode;
        self.input_mode = InputMode::None;
        self.input_buffer.clear();

        match mode {
            InputMode::None => {}
            InputMode::Code => {
                let code = if text.is_empty() { None } else { Some(text) };
                self.apply_patch(CriteriaPatch::code(code));
            }
            InputMode::StartDate | InputMode::EndDate => {
                let value = if text.is_empty() {
                    Some(None)
                } else {
                    match crate::data::clock::parse_timestamp_input(&text) {
                        Ok(ts) => Some(Some(ts)),
                        Err(e) => {
                            self.set_status_message(e.to_string());
                            None
                        }
                    }
                };
                if let Some(value) = value {
                    let patch = if mode == InputMode::StartDate {
                        CriteriaPatch::start(value)
                    } else {
                        CriteriaPatch::end(value)
                    };
                    self.apply_patch(patch);
                }
            }
            InputMode::ColumnFilter => {
                let column = self.table.sort_column;
                self.table.set_filter(column, &text);
                self.selected_row = 0;
            }
        }
    }

    /// Clear the optional criteria filters and all table filters.
    pub fn clear_filters(&mut self) {
        self.table.clear_filters();
        self.apply_patch(CriteriaPatch {
            device_name: Some(None),
            start: Some(None),
            end: Some(None),
            code: Some(None),
            ..CriteriaPatch::default()
        });
    }

    /// Row indices of the fault table after filtering and sorting.
    pub fn visible_rows(&self) -> Vec<usize> {
        let index = DeviceIndex::new(&self.devices);
        self.table.visible_rows(&self.derived.faults, &index)
    }

    /// The fault behind the current table selection.
    pub fn selected_fault(&self) -> Option<&Fault> {
        let rows = self.visible_rows();
        rows.get(self.selected_row).map(|&i| &self.derived.faults[i])
    }

    /// The table page the selection sits on.
    pub fn page(&self) -> usize {
        self.selected_row / PAGE_SIZE
    }

    pub fn page_count(&self) -> usize {
        TableModel::page_count(self.visible_rows().len())
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_rows().len();
        self.selected_row = self.selected_row.min(count.saturating_sub(1));
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items (a full page for PageDown).
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.visible_rows().len().saturating_sub(1);
        self.selected_row = (self.selected_row + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_row = self.selected_row.saturating_sub(n);
    }

    /// Jump to the first row.
    pub fn select_first(&mut self) {
        self.selected_row = 0;
    }

    /// Jump to the last row.
    pub fn select_last(&mut self) {
        self.selected_row = self.visible_rows().len().saturating_sub(1);
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Cycle the table sort column (Faults view).
    pub fn cycle_sort(&mut self) {
        self.table.cycle_sort();
        self.clamp_selection();
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        self.table.toggle_direction();
    }

    /// Open the detail overlay for the selected fault.
    pub fn enter_detail(&mut self) {
        if self.current_view == View::Faults && self.selected_fault().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Navigate back: close overlays first, then return to Overview.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        if self.current_view != View::Overview {
            self.current_view = View::Overview;
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current derived view to a JSON file.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        use std::io::Write;

        let export = serde_json::json!({
            "criteria": self.criteria,
            "summary": {
                "total_faults": self.derived.summary.total_faults,
                "total_duration_seconds": self.derived.summary.total_duration_seconds,
                "total_duration": self.derived.summary.formatted_duration(),
            },
            "top_by_duration": self.derived.top_by_duration,
            "top_by_frequency": self.derived.top_by_frequency,
            "categories": self.derived.categories,
        });

        let json = serde_json::to_string_pretty(&export)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted source for exercising the app without I/O.
    #[derive(Debug)]
    struct ScriptedSource {
        events: Vec<SourceEvent>,
        error: Option<String>,
    }

    impl ScriptedSource {
        fn new(events: Vec<SourceEvent>) -> Self {
            Self {
                events,
                error: None,
            }
        }
    }

    impl DataSource for ScriptedSource {
        fn poll(&mut self) -> Option<SourceEvent> {
            if self.events.is_empty() {
                None
            } else {
                Some(self.events.remove(0))
            }
        }

        fn description(&self) -> &str {
            "scripted"
        }

        fn error(&self) -> Option<String> {
            self.error.clone()
        }

        fn request_refresh(&mut self) {}
    }

    fn device(id: i64, asset: &str, name: &str) -> Device {
        Device {
            id,
            asset: asset.to_string(),
            device_name: name.to_string(),
        }
    }

    fn fault(device_id: i64, code: i64, duration: f64, time: &str, category: &str) -> Fault {
        Fault {
            device_id,
            time_stamp: time.parse().unwrap(),
            resolution_time_stamp: time.parse().unwrap(),
            duration_seconds: duration,
            code,
            description: format!("fault {}", code),
            category: category.to_string(),
        }
    }

    fn loaded_app() -> App {
        let source = ScriptedSource::new(vec![
            SourceEvent::Devices(vec![
                device(1, "Minneapolis", "T1"),
                device(2, "Minneapolis", "T2"),
                device(3, "Colorado", "C1"),
            ]),
            SourceEvent::Faults(vec![
                fault(1, 100, 30.0, "2024-01-01T00:00:00Z", "A"),
                fault(2, 200, 90.0, "2024-01-02T00:00:00Z", "B"),
                fault(3, 300, 60.0, "2024-01-03T00:00:00Z", "A"),
            ]),
        ]);
        let mut app = App::new(Box::new(source), FilterCriteria::default());
        assert!(app.poll_source());
        app
    }

    #[test]
    fn test_poll_applies_collections_and_recomputes() {
        let app = loaded_app();
        assert_eq!(app.devices.len(), 3);
        assert_eq!(app.faults.len(), 3);
        // Only Minneapolis faults survive the default criteria.
        assert_eq!(app.derived.summary.total_faults, 2);
    }

    #[test]
    fn test_site_cycle_recomputes() {
        let mut app = loaded_app();
        app.cycle_site();
        assert_eq!(app.criteria.site, "Colorado");
        assert_eq!(app.derived.summary.total_faults, 1);
        assert_eq!(app.derived.faults[0].code, 300);
    }

    #[test]
    fn test_device_options_scoped_to_site() {
        let mut app = loaded_app();
        assert_eq!(app.device_options(), vec!["T1", "T2"]);
        app.cycle_site();
        assert_eq!(app.device_options(), vec!["C1"]);
    }

    #[test]
    fn test_device_cycle_wraps_to_all() {
        let mut app = loaded_app();
        app.cycle_device();
        assert_eq!(app.criteria.device_name.as_deref(), Some("T1"));
        app.cycle_device();
        assert_eq!(app.criteria.device_name.as_deref(), Some("T2"));
        app.cycle_device();
        assert!(app.criteria.device_name.is_none());
    }

    #[test]
    fn test_code_input_commit_and_clear() {
        let mut app = loaded_app();

        app.start_input(InputMode::Code);
        for c in "100".chars() {
            app.input_push(c);
        }
        app.commit_input();
        assert_eq!(app.criteria.code.as_deref(), Some("100"));
        assert_eq!(app.derived.summary.total_faults, 1);

        app.start_input(InputMode::Code);
        app.input_buffer.clear();
        app.commit_input();
        assert!(app.criteria.code.is_none());
        assert_eq!(app.derived.summary.total_faults, 2);
    }

    #[test]
    fn test_bad_date_input_leaves_criteria_unchanged() {
        let mut app = loaded_app();
        app.start_input(InputMode::StartDate);
        for c in "tomorrow".chars() {
            app.input_push(c);
        }
        app.commit_input();

        assert!(app.criteria.start.is_none());
        assert!(app.get_status_message().is_some());
    }

    #[test]
    fn test_date_range_inputs() {
        let mut app = loaded_app();

        app.start_input(InputMode::StartDate);
        for c in "2024-01-02".chars() {
            app.input_push(c);
        }
        app.commit_input();
        app.start_input(InputMode::EndDate);
        for c in "2024-01-02 23:59:59".chars() {
            app.input_push(c);
        }
        app.commit_input();

        assert_eq!(app.derived.summary.total_faults, 1);
        assert_eq!(app.derived.faults[0].code, 200);
    }

    #[test]
    fn test_clear_filters_resets_optional_criteria() {
        let mut app = loaded_app();
        app.apply_patch(CriteriaPatch::code(Some("100".to_string())));
        app.table.set_filter(crate::data::FaultColumn::Category, "a");

        app.clear_filters();
        assert!(app.criteria.code.is_none());
        assert!(!app.table.has_filters());
        assert_eq!(app.criteria.site, "Minneapolis");
    }

    #[test]
    fn test_selection_and_paging() {
        let source = ScriptedSource::new(vec![
            SourceEvent::Devices(vec![device(1, "Minneapolis", "T1")]),
            SourceEvent::Faults(
                (0..25)
                    .map(|i| {
                        fault(
                            1,
                            100 + i,
                            10.0,
                            &format!("2024-01-{:02}T00:00:00Z", (i % 27) + 1),
                            "A",
                        )
                    })
                    .collect(),
            ),
        ]);
        let mut app = App::new(Box::new(source), FilterCriteria::default());
        app.poll_source();

        assert_eq!(app.page_count(), 3);
        assert_eq!(app.page(), 0);

        app.select_next_n(PAGE_SIZE);
        assert_eq!(app.page(), 1);

        app.select_last();
        assert_eq!(app.selected_row, 24);
        assert_eq!(app.page(), 2);

        app.select_next();
        assert_eq!(app.selected_row, 24);
    }

    #[test]
    fn test_detail_overlay_only_on_faults_view() {
        let mut app = loaded_app();
        app.enter_detail();
        assert!(!app.show_detail_overlay);

        app.set_view(View::Faults);
        app.enter_detail();
        assert!(app.show_detail_overlay);

        app.go_back();
        assert!(!app.show_detail_overlay);
        assert_eq!(app.current_view, View::Faults);
        app.go_back();
        assert_eq!(app.current_view, View::Overview);
    }

    #[test]
    fn test_export_state() {
        let app = loaded_app();
        let file = tempfile::NamedTempFile::new().unwrap();
        app.export_state(file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["summary"]["total_faults"], 2);
        assert_eq!(value["criteria"]["site"], "Minneapolis");
        assert!(value["top_by_frequency"].is_array());
    }

    #[test]
    fn test_view_cycle() {
        assert_eq!(View::Overview.next(), View::Categories);
        assert_eq!(View::Faults.next(), View::Overview);
        assert_eq!(View::Overview.prev(), View::Faults);
    }
}
