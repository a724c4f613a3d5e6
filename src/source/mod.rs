//! Data source abstraction for loading the device and fault catalogs.
//!
//! This module provides a trait-based abstraction for retrieving the two
//! collections the dashboard consumes (devices, faults) from different
//! backends - HTTP endpoints or local JSON files.

mod error;
mod file;
mod http;
mod records;

pub use error::SourceError;
pub use file::FileSource;
pub use http::{fetch_devices, fetch_faults, HttpSource};
pub use records::{Device, Fault};

use std::fmt::Debug;

/// A single collection arriving from a data source.
///
/// Devices and faults load independently, fail independently, and have no
/// ordering dependency on each other; each arrival is delivered on its own.
#[derive(Debug, Clone)]
pub enum SourceEvent {
    Devices(Vec<Device>),
    Faults(Vec<Fault>),
}

/// Trait for loading catalog data from various backends.
///
/// # Example
///
/// ```
/// use faultwatch::source::{DataSource, FileSource};
///
/// let mut source = FileSource::new("device.json", "fault.json");
/// while let Some(event) = source.poll() {
///     // apply the collection to application state
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the next loaded collection.
    ///
    /// Returns `Some(event)` if a collection has arrived since the last
    /// poll, `None` otherwise. This method must be non-blocking; it is
    /// called from the UI loop.
    fn poll(&mut self) -> Option<SourceEvent>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// The most recent load failure, if any.
    ///
    /// A failed collection leaves prior state untouched; the error is
    /// reported here so the UI can surface it without crashing.
    fn error(&self) -> Option<String>;

    /// Ask the source to reload both collections.
    ///
    /// Sources for which reloading is implicit (e.g. file polling) may
    /// use this to drop their change-detection state.
    fn request_refresh(&mut self);
}
