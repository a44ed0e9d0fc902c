//! Problem classifier
//!
//! Ordered keyword catalog. Matching is case-insensitive substring
//! containment and the first rule with a hit wins, so the order of
//! `CATALOG` is part of the behavior ("slow wifi" is a performance
//! problem because performance is checked before network).

use crate::responder;
use crate::snapshot::SystemSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Troubleshooting categories with a canned response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Performance,
    Network,
    BlueScreen,
    Storage,
    Audio,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Performance => "performance",
            Self::Network => "network",
            Self::BlueScreen => "blue_screen",
            Self::Storage => "storage",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog entry: keywords plus the template that answers them
pub struct CategoryRule {
    pub category: Category,
    /// Lower-case substrings; any hit selects the rule
    pub keywords: &'static [&'static str],
    pub render: fn(&SystemSnapshot) -> String,
}

impl CategoryRule {
    /// Does this rule fire for already lower-cased input?
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|kw| lowered.contains(kw))
    }

    /// First keyword found in already lower-cased input
    pub fn matched_keyword(&self, lowered: &str) -> Option<&'static str> {
        self.keywords.iter().copied().find(|kw| lowered.contains(kw))
    }
}

impl fmt::Debug for CategoryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryRule")
            .field("category", &self.category)
            .field("keywords", &self.keywords)
            .finish()
    }
}

/// The catalog, in evaluation order
pub static CATALOG: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Performance,
        keywords: &[
            "slow",
            "sluggish",
            "freezing",
            "crashing",
            "not responding",
            "performance",
        ],
        render: responder::performance_response,
    },
    CategoryRule {
        category: Category::Network,
        keywords: &["internet", "wifi", "network", "connection", "offline"],
        render: responder::network_response,
    },
    CategoryRule {
        category: Category::BlueScreen,
        keywords: &["blue screen", "bsod", "crash", "error screen"],
        render: responder::blue_screen_response,
    },
    CategoryRule {
        category: Category::Storage,
        keywords: &["disk", "storage", "drive", "space", "full"],
        render: responder::storage_response,
    },
    CategoryRule {
        category: Category::Audio,
        keywords: &["sound", "audio", "speaker", "headphone", "no sound"],
        render: responder::audio_response,
    },
];

/// Pick the first catalog rule matching the input, if any
pub fn classify(input: &str) -> Option<&'static CategoryRule> {
    classify_in(CATALOG, input)
}

/// Same as [`classify`] against an arbitrary ordered rule list
pub fn classify_in<'a>(rules: &'a [CategoryRule], input: &str) -> Option<&'a CategoryRule> {
    let lowered = input.to_lowercase();
    rules.iter().find(|rule| rule.matches(&lowered))
}
