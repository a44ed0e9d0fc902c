//! Scanner: provider read + normalization, with every failure collapsed
//! into one generic error. The underlying cause only goes to the log.

use crate::provider::SystemProvider;
use quippy_common::{normalize, SystemSnapshot};
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Failed to scan system information")]
pub struct ScanError;

#[derive(Clone)]
pub struct Scanner {
    provider: Arc<dyn SystemProvider>,
}

impl Scanner {
    pub fn new(provider: Arc<dyn SystemProvider>) -> Self {
        Self { provider }
    }

    pub async fn scan(&self) -> Result<SystemSnapshot, ScanError> {
        let provider = Arc::clone(&self.provider);

        let raw = tokio::task::spawn_blocking(move || provider.read())
            .await
            .map_err(|e| {
                error!("Error scanning system: scan task failed: {}", e);
                ScanError
            })?
            .map_err(|e| {
                error!("Error scanning system: {}", e);
                ScanError
            })?;

        let snapshot = normalize(&raw).map_err(|e| {
            error!("Error scanning system: {}", e);
            ScanError
        })?;

        debug!(
            "Scan: cpu {}% mem {}% disk {}%",
            snapshot.cpu.usage, snapshot.memory.usage, snapshot.disk_space.usage
        );
        Ok(snapshot)
    }
}
