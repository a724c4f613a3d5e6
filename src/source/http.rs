//! HTTP-based data source.
//!
//! Fetches the device and fault collections from two read-only GET
//! endpoints, each returning a JSON array. The two fetches run as
//! independent background tasks; whichever finishes later simply
//! overwrites earlier state (last-write-wins).

use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, error};

use super::{DataSource, Device, Fault, SourceError, SourceEvent};

/// Fetch the device collection from `url`.
pub async fn fetch_devices(client: &reqwest::Client, url: &str) -> Result<Vec<Device>, SourceError> {
    let response = client.get(url).send().await?.error_for_status()?;
    let devices = response.json().await?;
    Ok(devices)
}

/// Fetch the fault collection from `url`.
pub async fn fetch_faults(client: &reqwest::Client, url: &str) -> Result<Vec<Fault>, SourceError> {
    let response = client.get(url).send().await?.error_for_status()?;
    let faults = response.json().await?;
    Ok(faults)
}

/// A data source that loads the two catalogs over HTTP.
///
/// `spawn` kicks off one background task per collection on the provided
/// runtime handle; results are delivered through a channel and picked up
/// by `poll()` from the UI loop. Each collection fails independently and
/// keeps its own error slot.
#[derive(Debug)]
pub struct HttpSource {
    receiver: mpsc::Receiver<SourceEvent>,
    sender: mpsc::Sender<SourceEvent>,
    handle: Handle,
    client: reqwest::Client,
    devices_url: String,
    faults_url: String,
    description: String,
    device_error: Arc<Mutex<Option<String>>>,
    fault_error: Arc<Mutex<Option<String>>>,
}

impl HttpSource {
    /// Create the source and start the initial pair of fetches.
    ///
    /// `base_url` is the common prefix of the two endpoints, e.g.
    /// `http://host/data` serving `data/device.json` and `data/fault.json`.
    pub fn spawn(handle: Handle, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let (tx, rx) = mpsc::channel(4);

        let mut source = Self {
            receiver: rx,
            sender: tx,
            handle,
            client: reqwest::Client::new(),
            devices_url: format!("{}/device.json", base),
            faults_url: format!("{}/fault.json", base),
            description: format!("http: {}", base),
            device_error: Arc::new(Mutex::new(None)),
            fault_error: Arc::new(Mutex::new(None)),
        };
        source.request_refresh();
        source
    }

    fn spawn_device_fetch(&self) {
        let client = self.client.clone();
        let url = self.devices_url.clone();
        let tx = self.sender.clone();
        let error_slot = self.device_error.clone();

        self.handle.spawn(async move {
            match fetch_devices(&client, &url).await {
                Ok(devices) => {
                    debug!(count = devices.len(), %url, "loaded device collection");
                    *error_slot.lock().unwrap() = None;
                    let _ = tx.send(SourceEvent::Devices(devices)).await;
                }
                Err(e) => {
                    error!(%url, "device load failed: {}", e);
                    *error_slot.lock().unwrap() = Some(e.to_string());
                }
            }
        });
    }

    fn spawn_fault_fetch(&self) {
        let client = self.client.clone();
        let url = self.faults_url.clone();
        let tx = self.sender.clone();
        let error_slot = self.fault_error.clone();

        self.handle.spawn(async move {
            match fetch_faults(&client, &url).await {
                Ok(faults) => {
                    debug!(count = faults.len(), %url, "loaded fault collection");
                    *error_slot.lock().unwrap() = None;
                    let _ = tx.send(SourceEvent::Faults(faults)).await;
                }
                Err(e) => {
                    error!(%url, "fault load failed: {}", e);
                    *error_slot.lock().unwrap() = Some(e.to_string());
                }
            }
        });
    }
}

impl DataSource for HttpSource {
    fn poll(&mut self) -> Option<SourceEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(_) => None,
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        let device = self.device_error.lock().unwrap().clone();
        let fault = self.fault_error.lock().unwrap().clone();
        match (device, fault) {
            (None, None) => None,
            (Some(e), None) => Some(format!("devices: {}", e)),
            (None, Some(e)) => Some(format!("faults: {}", e)),
            (Some(d), Some(f)) => Some(format!("devices: {}; faults: {}", d, f)),
        }
    }

    fn request_refresh(&mut self) {
        self.spawn_device_fetch();
        self.spawn_fault_fetch();
    }
}
