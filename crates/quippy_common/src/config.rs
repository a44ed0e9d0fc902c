//! Configuration for quippyd.
//!
//! Loads settings from a TOML file or uses defaults. Lookup order:
//! explicit path (`--config` / `QUIPPY_CONFIG`), `/etc/quippy/config.toml`,
//! then `$XDG_CONFIG_HOME/quippy/config.toml`.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// System-wide config file
pub const SYSTEM_CONFIG_PATH: &str = "/etc/quippy/config.toml";

/// Env var naming an explicit config file
pub const CONFIG_ENV: &str = "QUIPPY_CONFIG";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("API key env var {0} is not set")]
    MissingCredential(String),
}

// ============================================================================
// Sections
// ============================================================================

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:7878".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Where scan data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScannerMode {
    #[default]
    Real,
    Simulated,
}

impl ScannerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScannerMode::Real => "real",
            ScannerMode::Simulated => "simulated",
        }
    }
}

/// Scanner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default)]
    pub mode: ScannerMode,

    /// Artificial delay of the simulated scanner, in milliseconds
    #[serde(default = "default_simulated_delay")]
    pub simulated_delay_ms: u64,
}

fn default_simulated_delay() -> u64 {
    1000
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            mode: ScannerMode::Real,
            simulated_delay_ms: default_simulated_delay(),
        }
    }
}

/// Language-model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// When false, every answer comes from the keyword classifier
    #[serde(default = "default_llm_enabled")]
    pub enabled: bool,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout; unset means the HTTP client's default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_llm_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash-lite".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            enabled: default_llm_enabled(),
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: None,
        }
    }
}

impl LlmSettings {
    /// Read the API key from the configured environment variable
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        match env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(ConfigError::MissingCredential(self.api_key_env.clone())),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides it
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================================================
// Full config
// ============================================================================

/// Full daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuippyConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub scanner: ScannerConfig,

    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub log: LogConfig,
}

impl QuippyConfig {
    /// Load config. An explicit path must exist and parse; otherwise the
    /// standard locations are tried and defaults are used if none exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Self::load_from_path(Path::new(&path));
        }

        for path in search_paths() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        warn!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Config locations tried when no explicit path is given
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("quippy").join("config.toml"));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = QuippyConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:7878");
        assert_eq!(config.scanner.mode, ScannerMode::Real);
        assert_eq!(config.scanner.simulated_delay_ms, 1000);
        assert!(config.llm.enabled);
        assert_eq!(config.llm.model, "gemini-2.0-flash-lite");
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert!(config.llm.timeout_secs.is_none());
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
[scanner]
mode = "simulated"

[llm]
model = "gemini-1.5-flash"
timeout_secs = 15
"#;
        let config = QuippyConfig::parse(toml_str).unwrap();
        assert_eq!(config.scanner.mode, ScannerMode::Simulated);
        assert_eq!(config.scanner.simulated_delay_ms, 1000);
        assert_eq!(config.llm.model, "gemini-1.5-flash");
        assert_eq!(config.llm.timeout_secs, Some(15));
        // Defaults for missing fields
        assert!(config.llm.enabled);
        assert_eq!(config.server.bind, "127.0.0.1:7878");
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        let toml_str = "[scanner]\nmode = \"random\"\n";
        assert!(QuippyConfig::parse(toml_str).is_err());
    }

    #[test]
    fn test_toml_roundtrip_sections() {
        let toml_str = QuippyConfig::default().to_toml().unwrap();
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[scanner]"));
        assert!(toml_str.contains("[llm]"));
        assert!(toml_str.contains("[log]"));
    }

    #[test]
    fn test_rendered_overrides_parse_back() {
        let mut config = QuippyConfig::default();
        config.server.bind = "0.0.0.0:9000".to_string();
        config.scanner.mode = ScannerMode::Simulated;
        config.llm.timeout_secs = Some(15);

        let parsed = QuippyConfig::parse(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.server.bind, "0.0.0.0:9000");
        assert_eq!(parsed.scanner.mode, ScannerMode::Simulated);
        assert_eq!(parsed.llm.timeout_secs, Some(15));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nbind = \"0.0.0.0:9000\"\n[llm]\nenabled = false").unwrap();

        let config = QuippyConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert!(!config.llm.enabled);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = QuippyConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nbind = ").unwrap();
        let err = QuippyConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_credential() {
        let settings = LlmSettings {
            api_key_env: "QUIPPY_TEST_CONFIG_KEY_UNSET".to_string(),
            ..Default::default()
        };
        let err = settings.resolve_api_key().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingCredential(ref name) if name == "QUIPPY_TEST_CONFIG_KEY_UNSET"
        ));
    }

    #[test]
    fn test_search_paths_start_with_system() {
        let paths = search_paths();
        assert_eq!(paths[0], PathBuf::from(SYSTEM_CONFIG_PATH));
    }
}
