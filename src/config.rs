//! Optional configuration file and environment overrides.
//!
//! Settings resolve in order: command line, then `FAULTWATCH_*`
//! environment variables, then the optional TOML config file, then the
//! built-in defaults. Every field is optional; main.rs fills the gaps.

use std::path::{Path, PathBuf};

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Settings loadable from a config file or the environment.
///
/// ```toml
/// # faultwatch.toml
/// url = "http://localhost:8080/data"
/// refresh = 10
/// site = "Colorado"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Base URL serving `device.json` and `fault.json`.
    pub url: Option<String>,
    /// Path to the device catalog file (file mode).
    pub devices: Option<PathBuf>,
    /// Path to the fault catalog file (file mode).
    pub faults: Option<PathBuf>,
    /// Poll interval in seconds.
    pub refresh: Option<u64>,
    /// Initial site selection.
    pub site: Option<String>,
}

/// Load settings from an optional file plus `FAULTWATCH_*` variables.
pub fn load(path: Option<&Path>) -> Result<Settings> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path));
    }
    let config = builder
        .add_source(Environment::with_prefix("FAULTWATCH").try_parsing(true))
        .build()?;

    Ok(config.try_deserialize()?)
}
