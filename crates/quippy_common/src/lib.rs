//! Quippy common library
//!
//! Shared between the daemon and the CLI: scan data model, metrics
//! normalizer, keyword classifier and fallback responder, language-model
//! backends, analyzer and configuration.

pub mod analyzer;
pub mod chat;
pub mod classifier;
pub mod config;
pub mod llm;
pub mod normalize;
pub mod responder;
pub mod snapshot;

pub use analyzer::{Analysis, AnalysisSource, Analyzer};
pub use chat::{ChatMessage, MessageKind};
pub use classifier::{classify, Category, CategoryRule, CATALOG};
pub use config::{ConfigError, LlmSettings, QuippyConfig, ScannerMode};
pub use llm::{DisabledBackend, FakeBackend, GeminiBackend, LlmBackend, LlmError};
pub use normalize::{normalize, NormalizeError};
pub use responder::{basic_analysis, respond, ACKNOWLEDGMENT};
pub use snapshot::{
    CpuInfo, DiskInfo, FilesystemReading, MemoryInfo, ProblemReport, RawReadings, SystemSnapshot,
};

/// Crate version, reported by the health endpoint and the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
