//! Metrics normalizer
//!
//! Turns provider readings into the rounded percentages and MB/GB totals
//! of a `SystemSnapshot`. Pure function, no I/O.

use crate::snapshot::{CpuInfo, DiskInfo, MemoryInfo, RawReadings, SystemSnapshot};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Normalization failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("{0} total reported as zero")]
    ZeroTotal(&'static str),

    #[error("provider reported no filesystems")]
    NoFilesystem,
}

/// Normalize raw readings into a snapshot.
///
/// Disk figures come from the first filesystem in the provider's list
/// (usually the main drive). Other volumes are ignored.
pub fn normalize(raw: &RawReadings) -> Result<SystemSnapshot, NormalizeError> {
    let memory_usage = usage_percent(raw.memory_total_bytes, raw.memory_available_bytes)
        .ok_or(NormalizeError::ZeroTotal("memory"))?;

    let main_disk = raw.filesystems.first().ok_or(NormalizeError::NoFilesystem)?;
    let disk_usage = usage_percent(main_disk.total_bytes, main_disk.available_bytes)
        .ok_or(NormalizeError::ZeroTotal("disk"))?;

    Ok(SystemSnapshot {
        os: os_label(&raw.os_distro, &raw.os_release),
        cpu: CpuInfo {
            usage: clamp_percent(raw.cpu_load_percent),
            temperature: raw
                .cpu_temperature
                .filter(|t| t.is_finite() && *t > 0.0),
        },
        memory: MemoryInfo {
            total: to_mb(raw.memory_total_bytes),
            free: to_mb(raw.memory_available_bytes),
            usage: memory_usage,
        },
        disk_space: DiskInfo {
            total: to_gb(main_disk.total_bytes),
            free: to_gb(main_disk.available_bytes),
            usage: disk_usage,
        },
    })
}

/// round(100 * (total - available) / total), or None when total is zero
pub fn usage_percent(total: u64, available: u64) -> Option<u32> {
    if total == 0 {
        return None;
    }
    let used = total.saturating_sub(available);
    Some(clamp_percent(used as f64 * 100.0 / total as f64))
}

fn clamp_percent(value: f64) -> u32 {
    // NaN casts to 0
    value.round().clamp(0.0, 100.0) as u32
}

fn os_label(distro: &str, release: &str) -> String {
    format!("{} {}", distro.trim(), release.trim()).trim().to_string()
}

pub fn to_mb(bytes: u64) -> u64 {
    (bytes as f64 / BYTES_PER_MB).round() as u64
}

pub fn to_gb(bytes: u64) -> u64 {
    (bytes as f64 / BYTES_PER_GB).round() as u64
}
