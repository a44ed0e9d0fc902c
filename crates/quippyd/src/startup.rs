//! Daemon startup: logging and wiring of providers and backends from config

use crate::provider::{SimulatedProvider, SysinfoProvider, SystemProvider};
use crate::scanner::Scanner;
use crate::server::AppState;
use anyhow::{anyhow, Result};
use quippy_common::llm::backend_from_settings;
use quippy_common::{Analyzer, LlmBackend, QuippyConfig, ScannerMode};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialize logging; RUST_LOG takes precedence over the configured level
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub fn build_provider(config: &QuippyConfig) -> Arc<dyn SystemProvider> {
    match config.scanner.mode {
        ScannerMode::Real => Arc::new(SysinfoProvider::new()),
        ScannerMode::Simulated => Arc::new(SimulatedProvider::new(Duration::from_millis(
            config.scanner.simulated_delay_ms,
        ))),
    }
}

/// Fails when the language model is enabled but no API key is available
pub fn build_backend(config: &QuippyConfig) -> Result<Arc<dyn LlmBackend>> {
    let backend = backend_from_settings(&config.llm).map_err(|e| {
        anyhow!(
            "{}. Export {} or disable the language model (--offline / [llm] enabled = false)",
            e,
            config.llm.api_key_env
        )
    })?;
    Ok(Arc::from(backend))
}

pub fn build_state(config: &QuippyConfig) -> Result<AppState> {
    let backend = build_backend(config)?;
    let provider = build_provider(config);

    info!(
        "Scanner: {}, language model: {}",
        config.scanner.mode.as_str(),
        if config.llm.enabled {
            config.llm.model.as_str()
        } else {
            "disabled"
        }
    );

    Ok(AppState::new(
        Scanner::new(provider),
        Analyzer::new(backend),
        config.scanner.mode,
        config.llm.enabled,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_config_needs_no_key() {
        let mut config = QuippyConfig::default();
        config.llm.enabled = false;
        config.llm.api_key_env = "QUIPPY_STARTUP_TEST_UNSET".to_string();
        let state = build_state(&config).unwrap();
        assert!(!state.llm_enabled);
        assert_eq!(state.analyzer.backend_name(), "disabled");
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let mut config = QuippyConfig::default();
        config.llm.api_key_env = "QUIPPY_STARTUP_TEST_UNSET".to_string();
        let err = build_state(&config).err().unwrap();
        let message = err.to_string();
        assert!(message.contains("QUIPPY_STARTUP_TEST_UNSET"));
        assert!(message.contains("--offline"));
    }

    #[test]
    fn test_simulated_mode_selected() {
        let mut config = QuippyConfig::default();
        config.llm.enabled = false;
        config.scanner.mode = ScannerMode::Simulated;
        let state = build_state(&config).unwrap();
        assert_eq!(state.scanner_mode, ScannerMode::Simulated);
    }
}
