//! Chat transcript types and reply composition

use crate::snapshot::SystemSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// First line Quippy says in a new conversation
pub const GREETING: &str = "Hello! What problem are you experiencing with your machine?";

/// Shown while the scan runs
pub const SCANNING_NOTICE: &str = "Scanning your system...";

/// The one message users see for any scan failure
pub const SCAN_FAILED: &str = "Failed to scan system information";

/// Display cap for echoed user input, in characters
pub const DISPLAY_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::System,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Scan summary followed by the analysis, as one chat message body
pub fn compose_reply(snapshot: &SystemSnapshot, analysis: &str) -> String {
    format!(
        "OS: {}\nCPU Usage: {}%\nMemory Usage: {}%\nDisk Usage: {}%\n\n{}",
        snapshot.os, snapshot.cpu.usage, snapshot.memory.usage, snapshot.disk_space.usage, analysis
    )
}

pub fn scan_failure_reply() -> String {
    format!("Error scanning system: {}", SCAN_FAILED)
}

/// Cut `text` to at most `limit` characters, on a char boundary
pub fn truncate_for_display(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_reply() {
        let snapshot = SystemSnapshot::from_usage("Windows 10", 12, 34, 56);
        let reply = compose_reply(&snapshot, "Try restarting.");
        assert_eq!(
            reply,
            "OS: Windows 10\nCPU Usage: 12%\nMemory Usage: 34%\nDisk Usage: 56%\n\nTry restarting."
        );
    }

    #[test]
    fn test_scan_failure_reply() {
        assert_eq!(
            scan_failure_reply(),
            "Error scanning system: Failed to scan system information"
        );
    }

    #[test]
    fn test_truncate_for_display() {
        assert_eq!(truncate_for_display("short", DISPLAY_LIMIT), "short");

        let long = "a".repeat(1500);
        assert_eq!(truncate_for_display(&long, DISPLAY_LIMIT).len(), 1000);

        // multi-byte chars are counted, not bytes
        let accents = "é".repeat(1200);
        let cut = truncate_for_display(&accents, DISPLAY_LIMIT);
        assert_eq!(cut.chars().count(), 1000);
    }

    #[test]
    fn test_message_kind_wire_names() {
        let msg = ChatMessage::system("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["kind"], "system");
        assert_eq!(json["content"], "hi");
        assert_eq!(serde_json::to_value(MessageKind::User).unwrap(), "user");
    }
}
