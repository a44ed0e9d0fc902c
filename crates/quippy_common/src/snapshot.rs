//! Scan data model
//!
//! `RawReadings` is what a system provider hands back (bytes, float load).
//! `SystemSnapshot` is the normalized, rounded view that the classifier,
//! the prompt builder and the HTTP API work with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// CPU section of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    /// Utilization percentage, 0-100
    pub usage: u32,
    /// Package temperature in degrees Celsius, when a sensor reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Memory section of a snapshot (totals in MB)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total: u64,
    pub free: u64,
    pub usage: u32,
}

/// Disk section of a snapshot (totals in GB)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskInfo {
    pub total: u64,
    pub free: u64,
    pub usage: u32,
}

/// One point-in-time read of CPU, memory and main-disk utilization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub os: String,
    pub cpu: CpuInfo,
    pub memory: MemoryInfo,
    #[serde(rename = "diskSpace")]
    pub disk_space: DiskInfo,
}

impl SystemSnapshot {
    /// Build a snapshot from bare percentages (totals zeroed)
    pub fn from_usage(os: impl Into<String>, cpu: u32, memory: u32, disk: u32) -> Self {
        Self {
            os: os.into(),
            cpu: CpuInfo {
                usage: cpu,
                temperature: None,
            },
            memory: MemoryInfo {
                total: 0,
                free: 0,
                usage: memory,
            },
            disk_space: DiskInfo {
                total: 0,
                free: 0,
                usage: disk,
            },
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.cpu.temperature = Some(temperature);
        self
    }
}

/// A mounted filesystem as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemReading {
    pub mount_point: String,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

/// Raw provider output, before any rounding or unit conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReadings {
    pub os_distro: String,
    pub os_release: String,
    /// Instantaneous load across all cores, in percent
    pub cpu_load_percent: f64,
    pub cpu_temperature: Option<f32>,
    pub memory_total_bytes: u64,
    pub memory_available_bytes: u64,
    /// Filesystems in provider order; only the first one is used for disk usage
    pub filesystems: Vec<FilesystemReading>,
}

/// A user's problem description together with the scan taken for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemReport {
    pub description: String,
    pub snapshot: SystemSnapshot,
    pub submitted_at: DateTime<Utc>,
}

impl ProblemReport {
    pub fn new(description: impl Into<String>, snapshot: SystemSnapshot) -> Self {
        Self {
            description: description.into(),
            snapshot,
            submitted_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_wire_shape() {
        let snapshot = SystemSnapshot {
            os: "Arch Linux rolling".to_string(),
            cpu: CpuInfo {
                usage: 12,
                temperature: None,
            },
            memory: MemoryInfo {
                total: 16384,
                free: 8192,
                usage: 50,
            },
            disk_space: DiskInfo {
                total: 512,
                free: 128,
                usage: 75,
            },
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["os"], "Arch Linux rolling");
        assert_eq!(json["cpu"]["usage"], 12);
        assert!(json["cpu"].get("temperature").is_none());
        assert_eq!(json["memory"]["total"], 16384);
        assert_eq!(json["diskSpace"]["usage"], 75);
        assert!(json.get("disk_space").is_none());
    }

    #[test]
    fn test_snapshot_parses_browser_payload() {
        let payload = r#"{
            "os": "Windows 10",
            "cpu": { "usage": 85, "temperature": 71.5 },
            "memory": { "total": 8192, "free": 410, "usage": 95 },
            "diskSpace": { "total": 256, "free": 20, "usage": 92 }
        }"#;

        let snapshot: SystemSnapshot = serde_json::from_str(payload).unwrap();
        assert_eq!(snapshot.cpu.usage, 85);
        assert_eq!(snapshot.cpu.temperature, Some(71.5));
        assert_eq!(snapshot.memory.usage, 95);
        assert_eq!(snapshot.disk_space.free, 20);
    }

    #[test]
    fn test_problem_report_keeps_full_description() {
        let long = "x".repeat(5000);
        let report = ProblemReport::new(long.clone(), SystemSnapshot::from_usage("Linux", 1, 2, 3));
        assert_eq!(report.description.len(), 5000);
        assert_eq!(report.snapshot.disk_space.usage, 3);
    }
}
