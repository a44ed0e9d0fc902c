//! System providers
//!
//! A provider returns one `RawReadings` per call. The real one asks the OS
//! through sysinfo; the simulated one makes numbers up; the fixed one
//! replays a canned reading for tests.

use quippy_common::{FilesystemReading, RawReadings};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use sysinfo::{Components, CpuRefreshKind, Disks, MemoryRefreshKind, RefreshKind, System};
use tracing::debug;

/// Provider failures; the scanner collapses all of these into one message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("system information unavailable: {0}")]
    Unavailable(String),

    #[error("malformed system information: {0}")]
    Malformed(String),
}

/// Source of raw system readings. Blocking; runs on the blocking pool.
pub trait SystemProvider: Send + Sync {
    fn read(&self) -> Result<RawReadings, ProviderError>;
}

// ============================================================================
// Real
// ============================================================================

/// Component labels that identify a CPU temperature sensor
const CPU_SENSOR_LABELS: &[&str] = &["cpu", "package", "core", "tctl", "tdie", "k10temp"];

/// Real readings via sysinfo
#[derive(Debug, Default)]
pub struct SysinfoProvider;

impl SysinfoProvider {
    pub fn new() -> Self {
        Self
    }

    fn cpu_temperature() -> Option<f32> {
        let components = Components::new_with_refreshed_list();
        components
            .list()
            .iter()
            .filter(|c| {
                let label = c.label().to_lowercase();
                CPU_SENSOR_LABELS.iter().any(|l| label.contains(l))
            })
            .map(|c| c.temperature())
            .filter(|t| t.is_finite())
            .reduce(f32::max)
    }
}

impl SystemProvider for SysinfoProvider {
    fn read(&self) -> Result<RawReadings, ProviderError> {
        let mut sys = System::new_with_specifics(
            RefreshKind::new()
                .with_cpu(CpuRefreshKind::new().with_cpu_usage())
                .with_memory(MemoryRefreshKind::new().with_ram()),
        );

        // CPU usage is a delta between two refreshes
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_cpu();

        if sys.cpus().is_empty() {
            return Err(ProviderError::Unavailable("no CPUs reported".to_string()));
        }

        let disks = Disks::new_with_refreshed_list();
        let filesystems: Vec<FilesystemReading> = disks
            .list()
            .iter()
            .map(|d| FilesystemReading {
                mount_point: d.mount_point().to_string_lossy().into_owned(),
                total_bytes: d.total_space(),
                available_bytes: d.available_space(),
            })
            .collect();

        let readings = RawReadings {
            os_distro: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_release: System::os_version().unwrap_or_default(),
            cpu_load_percent: sys.global_cpu_info().cpu_usage() as f64,
            cpu_temperature: Self::cpu_temperature(),
            memory_total_bytes: sys.total_memory(),
            memory_available_bytes: sys.available_memory(),
            filesystems,
        };
        debug!(
            "sysinfo read: {} cpus, {} filesystems",
            sys.cpus().len(),
            readings.filesystems.len()
        );
        Ok(readings)
    }
}

// ============================================================================
// Simulated
// ============================================================================

const SIMULATED_MEMORY_BYTES: u64 = 16 * 1024 * 1024 * 1024;
const SIMULATED_DISK_BYTES: u64 = 512 * 1024 * 1024 * 1024;

/// Random usage figures in [0, 100) behind the same interface as the real scan
pub struct SimulatedProvider {
    rng: Mutex<StdRng>,
    delay: Duration,
}

impl SimulatedProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            delay,
        }
    }

    /// Deterministic sequence, no delay
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            delay: Duration::ZERO,
        }
    }

    fn used_bytes(total: u64, percent: u64) -> u64 {
        total / 100 * percent
    }
}

impl SystemProvider for SimulatedProvider {
    fn read(&self) -> Result<RawReadings, ProviderError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let (cpu, memory, disk) = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| ProviderError::Unavailable("simulator state poisoned".to_string()))?;
            (
                rng.gen_range(0..100u64),
                rng.gen_range(0..100u64),
                rng.gen_range(0..100u64),
            )
        };

        Ok(RawReadings {
            os_distro: "Windows".to_string(),
            os_release: "10".to_string(),
            cpu_load_percent: cpu as f64,
            cpu_temperature: None,
            memory_total_bytes: SIMULATED_MEMORY_BYTES,
            memory_available_bytes: SIMULATED_MEMORY_BYTES
                - Self::used_bytes(SIMULATED_MEMORY_BYTES, memory),
            filesystems: vec![FilesystemReading {
                mount_point: "C:\\".to_string(),
                total_bytes: SIMULATED_DISK_BYTES,
                available_bytes: SIMULATED_DISK_BYTES
                    - Self::used_bytes(SIMULATED_DISK_BYTES, disk),
            }],
        })
    }
}

// ============================================================================
// Fixed
// ============================================================================

/// Replays one reading (or one failure) forever
pub struct FixedProvider {
    result: Result<RawReadings, ProviderError>,
}

impl FixedProvider {
    pub fn new(readings: RawReadings) -> Self {
        Self { result: Ok(readings) }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self { result: Err(error) }
    }
}

impl SystemProvider for FixedProvider {
    fn read(&self) -> Result<RawReadings, ProviderError> {
        self.result.clone()
    }
}
