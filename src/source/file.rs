//! File-based data source.
//!
//! Reads the device and fault collections from two local JSON files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::de::DeserializeOwned;

use super::{DataSource, Device, Fault, SourceError, SourceEvent};

/// One watched collection file with change detection and its own error
/// state, so a broken fault file does not mask a healthy device file.
#[derive(Debug)]
struct WatchedFile {
    path: PathBuf,
    last_modified: Option<SystemTime>,
    last_error: Option<String>,
}

impl WatchedFile {
    fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            last_modified: None,
            last_error: None,
        }
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    /// True when the file has never been read or its mtime advanced.
    fn changed(&self) -> bool {
        match (&self.last_modified, self.modified_time()) {
            (None, _) => true,
            (Some(_), None) => false, // file disappeared, keep prior state
            (Some(last), Some(current)) => current > *last,
        }
    }

    /// Read and parse the file if it changed, recording success or failure.
    ///
    /// Failure marks the current mtime as seen so a broken file is not
    /// re-parsed on every poll; rewriting it bumps the mtime again.
    fn poll<T: DeserializeOwned>(&mut self) -> Option<Vec<T>> {
        if !self.changed() {
            return None;
        }
        let modified = self.modified_time();
        match self.read() {
            Ok(records) => {
                self.last_modified = modified;
                self.last_error = None;
                Some(records)
            }
            Err(e) => {
                self.last_modified = modified;
                self.last_error = Some(e.to_string());
                None
            }
        }
    }

    fn read<T: DeserializeOwned>(&self) -> Result<Vec<T>, SourceError> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// A data source that reads the two catalogs from JSON files.
///
/// Each file is re-read when its modification time advances, so the
/// dashboard picks up regenerated datasets without a restart. The two
/// files are tracked independently and fail independently.
#[derive(Debug)]
pub struct FileSource {
    devices: WatchedFile,
    faults: WatchedFile,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given device and fault files.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(devices: P, faults: Q) -> Self {
        let description = format!(
            "files: {}, {}",
            devices.as_ref().display(),
            faults.as_ref().display()
        );
        Self {
            devices: WatchedFile::new(devices),
            faults: WatchedFile::new(faults),
            description,
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<SourceEvent> {
        if let Some(devices) = self.devices.poll::<Device>() {
            return Some(SourceEvent::Devices(devices));
        }
        if let Some(faults) = self.faults.poll::<Fault>() {
            return Some(SourceEvent::Faults(faults));
        }
        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        match (&self.devices.last_error, &self.faults.last_error) {
            (None, None) => None,
            (Some(e), None) => Some(format!("devices: {}", e)),
            (None, Some(e)) => Some(format!("faults: {}", e)),
            (Some(d), Some(f)) => Some(format!("devices: {}; faults: {}", d, f)),
        }
    }

    fn request_refresh(&mut self) {
        self.devices.last_modified = None;
        self.faults.last_modified = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn device_json() -> &'static str {
        r#"[{ "id": 1, "asset": "Minneapolis", "device_name": "T1" }]"#
    }

    fn fault_json() -> &'static str {
        r#"[{
            "device_id": 1,
            "time_stamp": "2024-01-01T00:00:00Z",
            "resolution_time_stamp": "2024-01-01T00:00:30Z",
            "duration_seconds": 30,
            "code": 100,
            "description": "Pitch fault",
            "category": "A"
        }]"#
    }

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_file_source_description() {
        let source = FileSource::new("/tmp/device.json", "/tmp/fault.json");
        assert_eq!(source.description(), "files: /tmp/device.json, /tmp/fault.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_loads_both_collections() {
        let devices = write_temp(device_json());
        let faults = write_temp(fault_json());
        let mut source = FileSource::new(devices.path(), faults.path());

        // First poll returns devices, second returns faults.
        let first = source.poll();
        assert!(matches!(first, Some(SourceEvent::Devices(ref d)) if d.len() == 1));
        let second = source.poll();
        assert!(matches!(second, Some(SourceEvent::Faults(ref f)) if f.len() == 1));

        // Nothing changed, so the next poll returns None.
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_refresh_rereads() {
        let devices = write_temp(device_json());
        let faults = write_temp(fault_json());
        let mut source = FileSource::new(devices.path(), faults.path());

        while source.poll().is_some() {}

        source.request_refresh();
        assert!(matches!(source.poll(), Some(SourceEvent::Devices(_))));
        assert!(matches!(source.poll(), Some(SourceEvent::Faults(_))));
    }

    #[test]
    fn test_file_source_missing_device_file_still_loads_faults() {
        let faults = write_temp(fault_json());
        let mut source = FileSource::new("/nonexistent/device.json", faults.path());

        let event = source.poll();
        assert!(matches!(event, Some(SourceEvent::Faults(_))));
        assert!(source.error().unwrap().starts_with("devices:"));
    }

    #[test]
    fn test_file_source_both_files_missing() {
        let mut source = FileSource::new("/nonexistent/device.json", "/nonexistent/fault.json");
        assert!(source.poll().is_none());

        let error = source.error().unwrap();
        assert!(error.contains("devices:"));
        assert!(error.contains("faults:"));
    }

    #[test]
    fn test_file_source_invalid_json_reported_once() {
        let devices = write_temp("not valid json");
        let faults = write_temp(fault_json());
        let mut source = FileSource::new(devices.path(), faults.path());

        assert!(matches!(source.poll(), Some(SourceEvent::Faults(_))));
        assert!(source.error().unwrap().contains("devices"));

        // The broken file is not re-parsed until it changes.
        assert!(source.poll().is_none());
    }
}
