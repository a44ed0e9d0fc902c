//! Problem analyzer
//!
//! Asks the language model first and falls back to the keyword responder
//! on any failure or on a suspiciously short answer. Callers never see
//! an LLM error.

use crate::llm::LlmBackend;
use crate::responder;
use crate::snapshot::SystemSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Responses shorter than this (in characters, trimmed) are discarded
pub const MIN_RESPONSE_CHARS: usize = 10;

/// Which path produced an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    LanguageModel,
    Fallback,
    /// Gratitude reply; neither the model nor the catalog was consulted
    Acknowledgment,
}

/// Analysis text plus where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub text: String,
    pub source: AnalysisSource,
}

pub struct Analyzer {
    backend: Arc<dyn LlmBackend>,
}

impl Analyzer {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub async fn analyze(&self, problem: &str, snapshot: &SystemSnapshot) -> Analysis {
        if responder::is_gratitude(problem) {
            debug!("Gratitude detected, skipping analysis");
            return Analysis {
                text: responder::ACKNOWLEDGMENT.to_string(),
                source: AnalysisSource::Acknowledgment,
            };
        }

        let prompt = build_prompt(problem, snapshot);

        match self.backend.generate(&prompt).await {
            Ok(text) if text.trim().chars().count() >= MIN_RESPONSE_CHARS => {
                debug!("LLM answered with {} chars", text.len());
                Analysis {
                    text,
                    source: AnalysisSource::LanguageModel,
                }
            }
            Ok(text) => {
                warn!("LLM response too short ({:?}), using fallback", text);
                fallback(problem, snapshot)
            }
            Err(e) => {
                warn!("LLM call failed, using fallback: {}", e);
                fallback(problem, snapshot)
            }
        }
    }
}

fn fallback(problem: &str, snapshot: &SystemSnapshot) -> Analysis {
    Analysis {
        text: responder::basic_analysis(problem, snapshot).text,
        source: AnalysisSource::Fallback,
    }
}

/// Prompt sent to the language model
pub fn build_prompt(problem: &str, snapshot: &SystemSnapshot) -> String {
    format!(
        r#"You are a friendly computer helper. Given:

System Status:
- CPU Usage: {cpu}%
- Memory Usage: {memory}%
- Disk Space Used: {disk}%

User Problem: "{problem}"

Provide a simple response with:
1. What might be wrong (1-2 sentences)
2. Numbered solutions (1-4) ordered from most effective to least effective
3. Format each solution like this:

1. First solution
   - Step one
   - Step two
   - Step three

2. Second solution
   - Step one
   - Step two

etc.

Use simple language and keep the total response under 200 words."#,
        cpu = snapshot.cpu.usage,
        memory = snapshot.memory.usage,
        disk = snapshot.disk_space.usage,
        problem = problem,
    )
}
