//! Data model shared between the sync engine and the presentation layer.
//!
//! Fields use `camelCase` serialization to match the JSON convention of the
//! monitoring backend. Numeric readings that the backend may omit carry
//! `#[serde(default)]` so a missing or null field becomes zero instead of a
//! deserialization error.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a monitored host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    Online,
    Warning,
    Offline,
}

/// Latest-known headline metrics attached to a host list entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostMetrics {
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub memory: f64,
    /// Upload rate in MB/s.
    #[serde(default)]
    pub upload: f64,
    /// Download rate in MB/s.
    #[serde(default)]
    pub download: f64,
}

/// A monitored remote machine as returned by the host list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    /// Opaque identifier, stable across polls.
    pub id: String,
    pub name: String,
    pub ip: String,
    pub status: HostStatus,
    pub os: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_heartbeat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_metrics: Option<HostMetrics>,
}

/// Instantaneous readings for a single host, all rates in MB/s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricReadings {
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub memory: f64,
    #[serde(default)]
    pub disk_read: f64,
    #[serde(default)]
    pub disk_write: f64,
    #[serde(default)]
    pub network_in: f64,
    #[serde(default)]
    pub network_out: f64,
}

/// Static host facts shown on the detail screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostInfo {
    #[serde(default)]
    pub cpu_cores: u32,
    /// Total memory in MB.
    #[serde(default)]
    pub total_memory: f64,
    /// Used memory in MB.
    #[serde(default)]
    pub used_memory: f64,
    /// Uptime in seconds.
    #[serde(default)]
    pub uptime: f64,
}

/// Full detail response for a single host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostDetail {
    pub id: String,
    pub name: String,
    pub ip: String,
    pub status: HostStatus,
    pub os: String,
    pub location: String,
    #[serde(default)]
    pub metrics: MetricReadings,
    #[serde(default)]
    pub info: HostInfo,
}

/// One timestamped set of metric readings, as returned by the history
/// endpoint. The backend returns a complete window each time, not a delta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub memory: f64,
    #[serde(default)]
    pub disk_read: f64,
    #[serde(default)]
    pub disk_write: f64,
    #[serde(default)]
    pub network_in: f64,
    #[serde(default)]
    pub network_out: f64,
}

/// A mounted filesystem on a host. Sizes in MB.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disk {
    pub name: String,
    pub mount_point: String,
    pub fs_type: String,
    #[serde(default)]
    pub total_size: f64,
    #[serde(default)]
    pub used_size: f64,
    #[serde(default)]
    pub available_size: f64,
    #[serde(default)]
    pub usage_percent: f64,
}

/// A running process on a host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub pid: u32,
    pub name: String,
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub memory: f64,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub status: String,
}

/// A network interface on a host. Rates in MB/s, totals in MB.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    pub name: String,
    #[serde(rename = "type", default)]
    pub interface_type: String,
    #[serde(default)]
    pub upload_speed: f64,
    #[serde(default)]
    pub download_speed: f64,
    #[serde(default)]
    pub total_upload: f64,
    #[serde(default)]
    pub total_download: f64,
    #[serde(default)]
    pub status: String,
}

/// Sort key for the process list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Cpu,
    Memory,
}

impl SortKey {
    /// Query-parameter value expected by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Cpu => "cpu",
            SortKey::Memory => "memory",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&HostStatus::Online).unwrap(), "\"online\"");
        assert_eq!(serde_json::to_string(&HostStatus::Warning).unwrap(), "\"warning\"");
        assert_eq!(serde_json::to_string(&HostStatus::Offline).unwrap(), "\"offline\"");
    }

    #[test]
    fn host_deserializes_from_backend_json() {
        let json = r#"{
            "id": "s1",
            "name": "web-01",
            "ip": "10.0.0.5",
            "status": "online",
            "os": "Ubuntu 22.04",
            "location": "eu-west",
            "currentMetrics": { "cpu": 41.5, "memory": 62.0, "upload": 0.8 }
        }"#;

        let host: Host = serde_json::from_str(json).unwrap();
        assert_eq!(host.id, "s1");
        assert_eq!(host.status, HostStatus::Online);
        assert!(host.last_heartbeat.is_none());

        let metrics = host.current_metrics.unwrap();
        assert!((metrics.cpu - 41.5).abs() < 0.001);
        // download was absent → defaults to zero, never null
        assert_eq!(metrics.download, 0.0);
    }

    #[test]
    fn metric_sample_missing_readings_default_to_zero() {
        let json = r#"{ "timestamp": "2026-08-23T10:00:00Z", "cpu": 12.0 }"#;
        let sample: MetricSample = serde_json::from_str(json).unwrap();
        assert!((sample.cpu - 12.0).abs() < 0.001);
        assert_eq!(sample.memory, 0.0);
        assert_eq!(sample.disk_read, 0.0);
        assert_eq!(sample.network_out, 0.0);
    }

    #[test]
    fn host_detail_tolerates_missing_metrics_block() {
        let json = r#"{
            "id": "s1",
            "name": "web-01",
            "ip": "10.0.0.5",
            "status": "warning",
            "os": "Debian 12",
            "location": "us-east"
        }"#;

        let detail: HostDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.metrics.cpu, 0.0);
        assert_eq!(detail.info.cpu_cores, 0);
    }

    #[test]
    fn network_interface_type_field_rename() {
        let json = r#"{ "name": "eth0", "type": "ethernet", "uploadSpeed": 5.5 }"#;
        let iface: NetworkInterface = serde_json::from_str(json).unwrap();
        assert_eq!(iface.interface_type, "ethernet");
        assert!((iface.upload_speed - 5.5).abs() < 0.001);
        assert_eq!(iface.total_download, 0.0);
    }

    #[test]
    fn sort_key_query_values() {
        assert_eq!(SortKey::Cpu.as_str(), "cpu");
        assert_eq!(SortKey::Memory.as_str(), "memory");
        assert_eq!(serde_json::to_string(&SortKey::Memory).unwrap(), "\"memory\"");
    }
}
