//! Shared record types for the two catalog collections.
//!
//! These types match the JSON arrays served by the device and fault
//! endpoints. They are the common data format between the data source
//! producers and the filter/aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A monitored asset belonging to exactly one site.
///
/// Devices are immutable reference data: loaded once per session and
/// looked up by [`Device::id`] when resolving fault records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Unique device identifier, referenced by [`Fault::device_id`].
    pub id: i64,
    /// Name of the site this device belongs to (e.g. "Minneapolis").
    pub asset: String,
    /// Human-readable device name (e.g. "T1").
    pub device_name: String,
}

/// A timestamped fault event attributed to one device.
///
/// A fault may reference a device that is absent from the device
/// collection; consumers must tolerate the dangling reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fault {
    /// Foreign key into the device collection. May dangle.
    pub device_id: i64,
    /// When the fault occurred.
    pub time_stamp: DateTime<Utc>,
    /// When the fault was resolved.
    pub resolution_time_stamp: DateTime<Utc>,
    /// Fault duration in seconds. Non-negative.
    pub duration_seconds: f64,
    /// Numeric fault code.
    pub code: i64,
    /// Free-text fault description.
    pub description: String,
    /// Fault category (e.g. "Electrical").
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_device_array() {
        let json = r#"[
            { "id": 1, "asset": "Minneapolis", "device_name": "T1" },
            { "id": 2, "asset": "Colorado", "device_name": "T9" }
        ]"#;

        let devices: Vec<Device> = serde_json::from_str(json).unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].id, 1);
        assert_eq!(devices[0].asset, "Minneapolis");
        assert_eq!(devices[1].device_name, "T9");
    }

    #[test]
    fn test_deserialize_fault_array() {
        let json = r#"[
            {
                "device_id": 1,
                "time_stamp": "2024-01-01T00:00:00Z",
                "resolution_time_stamp": "2024-01-01T00:30:00Z",
                "duration_seconds": 1800,
                "code": 100,
                "description": "Gearbox oil pressure low",
                "category": "Mechanical"
            }
        ]"#;

        let faults: Vec<Fault> = serde_json::from_str(json).unwrap();
        assert_eq!(faults.len(), 1);

        let fault = &faults[0];
        assert_eq!(fault.device_id, 1);
        assert_eq!(fault.code, 100);
        assert_eq!(fault.duration_seconds, 1800.0);
        assert_eq!(fault.category, "Mechanical");
        assert_eq!(
            fault.resolution_time_stamp - fault.time_stamp,
            chrono::Duration::minutes(30)
        );
    }

    #[test]
    fn test_fault_roundtrip_keeps_timestamps() {
        let fault = Fault {
            device_id: 7,
            time_stamp: "2024-03-05T12:00:00Z".parse().unwrap(),
            resolution_time_stamp: "2024-03-05T12:01:40Z".parse().unwrap(),
            duration_seconds: 100.0,
            code: 42,
            description: "Yaw misalignment".to_string(),
            category: "Control".to_string(),
        };

        let json = serde_json::to_string(&fault).unwrap();
        let back: Fault = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fault);
    }
}
