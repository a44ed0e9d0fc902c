//! One chat turn: gratitude check, scan, analysis, reply.
//!
//! Scan and analysis run strictly in sequence. A scan failure ends the
//! turn with the generic scan message; analysis cannot fail.

use crate::scanner::Scanner;
use quippy_common::chat::{compose_reply, scan_failure_reply};
use quippy_common::responder::{is_gratitude, ACKNOWLEDGMENT};
use quippy_common::{AnalysisSource, Analyzer, ChatMessage, ProblemReport, SystemSnapshot};
use serde::{Deserialize, Serialize};
use tracing::info;

/// How a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    Acknowledged,
    Answered,
    ScanFailed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub outcome: TurnOutcome,
    pub reply: ChatMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<AnalysisSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemSnapshot>,
}

pub async fn run_turn(scanner: &Scanner, analyzer: &Analyzer, message: &str) -> ChatTurn {
    if is_gratitude(message) {
        return ChatTurn {
            outcome: TurnOutcome::Acknowledged,
            reply: ChatMessage::system(ACKNOWLEDGMENT),
            source: None,
            system: None,
        };
    }

    let snapshot = match scanner.scan().await {
        Ok(snapshot) => snapshot,
        Err(_) => {
            return ChatTurn {
                outcome: TurnOutcome::ScanFailed,
                reply: ChatMessage::system(scan_failure_reply()),
                source: None,
                system: None,
            }
        }
    };

    let report = ProblemReport::new(message, snapshot);
    let analysis = analyzer.analyze(&report.description, &report.snapshot).await;
    info!(
        "Answered problem submitted at {} via {:?}",
        report.submitted_at.to_rfc3339(),
        analysis.source
    );

    ChatTurn {
        outcome: TurnOutcome::Answered,
        reply: ChatMessage::system(compose_reply(&report.snapshot, &analysis.text)),
        source: Some(analysis.source),
        system: Some(report.snapshot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{FixedProvider, ProviderError, SimulatedProvider};
    use quippy_common::{FakeBackend, LlmError};
    use std::sync::Arc;

    fn failing_scanner() -> Scanner {
        Scanner::new(Arc::new(FixedProvider::failing(ProviderError::Unavailable(
            "unreachable".to_string(),
        ))))
    }

    #[tokio::test]
    async fn test_gratitude_skips_scan_and_llm() {
        let fake = Arc::new(FakeBackend::always("should not be used"));
        let analyzer = Analyzer::new(fake.clone());

        // a failing scanner proves no scan happens
        let turn = run_turn(&failing_scanner(), &analyzer, "Thank you!").await;
        assert_eq!(turn.outcome, TurnOutcome::Acknowledged);
        assert_eq!(turn.reply.content, "You're welcome");
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn test_scan_failure_reply() {
        let fake = Arc::new(FakeBackend::always("unused answer text"));
        let analyzer = Analyzer::new(fake.clone());

        let turn = run_turn(&failing_scanner(), &analyzer, "my pc is slow").await;
        assert_eq!(turn.outcome, TurnOutcome::ScanFailed);
        assert_eq!(
            turn.reply.content,
            "Error scanning system: Failed to scan system information"
        );
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn test_answered_turn_with_fallback() {
        let scanner = Scanner::new(Arc::new(SimulatedProvider::seeded(3)));
        let analyzer = Analyzer::new(Arc::new(FakeBackend::always_error(LlmError::Timeout)));

        let turn = run_turn(&scanner, &analyzer, "wifi keeps dropping").await;
        assert_eq!(turn.outcome, TurnOutcome::Answered);
        assert_eq!(turn.source, Some(AnalysisSource::Fallback));
        let content = &turn.reply.content;
        assert!(content.starts_with("OS: Windows 10\nCPU Usage: "));
        assert!(content.contains("Restart your router"));
        assert!(turn.system.is_some());
    }

    #[tokio::test]
    async fn test_answered_turn_with_llm() {
        let scanner = Scanner::new(Arc::new(SimulatedProvider::seeded(3)));
        let analyzer = Analyzer::new(Arc::new(FakeBackend::always(
            "Your fan may be clogged.\n\n1. Clean the vents",
        )));

        let turn = run_turn(&scanner, &analyzer, "fan is loud").await;
        assert_eq!(turn.source, Some(AnalysisSource::LanguageModel));
        assert!(turn.reply.content.ends_with("\n\nYour fan may be clogged.\n\n1. Clean the vents"));
    }
}
