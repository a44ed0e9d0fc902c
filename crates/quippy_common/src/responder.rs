//! Fallback responder
//!
//! Deterministic answers used whenever the language model is unavailable
//! or unsatisfactory: a status header with severity markers, then the
//! remediation script of the matched category (or four diagnostic
//! questions when nothing matched).

use crate::classifier::{self, Category};
use crate::snapshot::SystemSnapshot;
use tracing::debug;

/// Reply to gratitude; no scan or analysis happens for these
pub const ACKNOWLEDGMENT: &str = "You're welcome";

const GRATITUDE_PHRASE: &str = "thank you";

/// CPU usage above this is marked HIGH
pub const CPU_HIGH_THRESHOLD: u32 = 80;
/// Memory or disk usage above this is marked CRITICAL
pub const USAGE_CRITICAL_THRESHOLD: u32 = 90;
/// CPU temperature (Celsius) above this is called out
pub const TEMPERATURE_HIGH_THRESHOLD: f32 = 80.0;

/// Outcome of the deterministic responder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAnswer {
    /// None when the generic questions were used
    pub category: Option<Category>,
    pub text: String,
}

pub fn is_gratitude(input: &str) -> bool {
    input.to_lowercase().contains(GRATITUDE_PHRASE)
}

/// Full deterministic reply, including the gratitude short-circuit
pub fn respond(input: &str, snapshot: &SystemSnapshot) -> String {
    if is_gratitude(input) {
        return ACKNOWLEDGMENT.to_string();
    }
    basic_analysis(input, snapshot).text
}

/// Classify the input and render the matching template
pub fn basic_analysis(input: &str, snapshot: &SystemSnapshot) -> BasicAnswer {
    match classifier::classify(input) {
        Some(rule) => {
            let keyword = rule.matched_keyword(&input.to_lowercase()).unwrap_or_default();
            debug!("Fallback matched category {} on {:?}", rule.category, keyword);
            BasicAnswer {
                category: Some(rule.category),
                text: (rule.render)(snapshot),
            }
        }
        None => {
            debug!("Fallback found no category, asking diagnostic questions");
            BasicAnswer {
                category: None,
                text: generic_response(snapshot),
            }
        }
    }
}

/// "Current System Status" block with inline severity markers
pub fn status_header(snapshot: &SystemSnapshot) -> String {
    let cpu_mark = if snapshot.cpu.usage > CPU_HIGH_THRESHOLD {
        " (HIGH!)"
    } else {
        ""
    };
    [
        "Current System Status:".to_string(),
        format!("• CPU Usage: {}%{}", snapshot.cpu.usage, cpu_mark),
        format!(
            "• Memory Usage: {}%{}",
            snapshot.memory.usage,
            critical_mark(snapshot.memory.usage)
        ),
        format!(
            "• Disk Usage: {}%{}",
            snapshot.disk_space.usage,
            critical_mark(snapshot.disk_space.usage)
        ),
    ]
    .join("\n")
}

fn critical_mark(usage: u32) -> &'static str {
    if usage > USAGE_CRITICAL_THRESHOLD {
        " (CRITICAL!)"
    } else {
        ""
    }
}

/// Resource call-outs listed above the performance remediation steps
pub fn performance_issues(snapshot: &SystemSnapshot) -> Vec<&'static str> {
    let mut issues = Vec::new();
    if snapshot.cpu.usage > CPU_HIGH_THRESHOLD {
        issues.push("• High CPU usage detected");
    }
    if snapshot.memory.usage > USAGE_CRITICAL_THRESHOLD {
        issues.push("• Low memory available");
    }
    if snapshot
        .cpu
        .temperature
        .is_some_and(|t| t > TEMPERATURE_HIGH_THRESHOLD)
    {
        issues.push("• High temperature detected");
    }
    issues
}

/// Performance template. The "Detected issues:" heading appears only
/// when at least one call-out applies; an empty heading is never rendered.
pub fn performance_response(snapshot: &SystemSnapshot) -> String {
    let issues = performance_issues(snapshot);
    let detected = if issues.is_empty() {
        String::new()
    } else {
        format!("Detected issues:\n{}\n\n", issues.join("\n"))
    };

    format!(
        "{}\n\n{}{}",
        status_header(snapshot),
        detected,
        "Solutions (most effective first):

1. Close any programs you're not using right now
   - Open Task Manager
   - Look for programs using lots of resources
   - Close ones you don't need

2. Restart your computer
   - Save your work
   - Click Start menu
   - Choose Restart

3. Run a quick virus scan
   - Open Windows Security
   - Choose Quick Scan
   - Wait for results

4. Update your drivers
   - Open Device Manager
   - Look for yellow warning symbols
   - Update those devices"
    )
}

pub fn network_response(snapshot: &SystemSnapshot) -> String {
    format!(
        "{}\n\n{}",
        status_header(snapshot),
        "Solutions (in order of effectiveness):

1. Restart your router
   - Unplug your router
   - Wait 30 seconds
   - Plug it back in

2. Try a wired connection
   - Connect computer directly to router with cable
   - Test internet speed

3. Run Network Troubleshooter
   - Open Settings
   - Choose Network & Internet
   - Run troubleshooter

4. Check for Windows updates
   - Open Settings
   - Choose Windows Update
   - Check for updates"
    )
}

pub fn blue_screen_response(snapshot: &SystemSnapshot) -> String {
    format!(
        "{}\n\n{}",
        status_header(snapshot),
        "Solutions (most likely to help first):

1. Restart your computer
   - Save any open work
   - Click Start menu
   - Choose Restart

2. Update your drivers
   - Open Device Manager
   - Look for yellow warning symbols
   - Right-click and update drivers

3. Run Windows Memory Diagnostic
   - Type 'memory' in Start menu
   - Choose Windows Memory Diagnostic
   - Follow the prompts

4. Check for error codes
   - Write down any error codes you see
   - Take a photo of blue screen if possible"
    )
}

pub fn storage_response(snapshot: &SystemSnapshot) -> String {
    format!(
        "{}\n\n{}",
        status_header(snapshot),
        "Solutions (quickest first):

1. Empty your Recycle Bin
   - Right-click Recycle Bin
   - Choose Empty Recycle Bin
   - Confirm deletion

2. Delete unnecessary downloads
   - Open Downloads folder
   - Sort by size
   - Delete large files you don't need

3. Uninstall unused programs
   - Open Settings
   - Go to Apps
   - Remove programs you don't use

4. Move large files
   - Find large files using Storage Sense
   - Copy to external drive
   - Delete from computer"
    )
}

pub fn audio_response(snapshot: &SystemSnapshot) -> String {
    format!(
        "{}\n\n{}",
        status_header(snapshot),
        "Solutions (easiest first):

1. Check physical connections
   - Make sure speakers/headphones are plugged in
   - Try different USB ports if needed
   - Check cable connections

2. Check Windows sound settings
   - Click speaker icon in taskbar
   - Make sure not muted
   - Try increasing volume

3. Restart your computer
   - Save all work
   - Click Start menu
   - Choose Restart

4. Update audio drivers
   - Open Device Manager
   - Find Sound devices
   - Update drivers"
    )
}

/// No category matched: ask for more detail
pub fn generic_response(snapshot: &SystemSnapshot) -> String {
    format!(
        "{}\n\n{}",
        status_header(snapshot),
        "To help you better, please tell me:

1. What exactly isn't working?
   - What happens when you try?
   - Any error messages?

2. When did it start?
   - Was it working before?
   - What changed?

3. Recent system changes?
   - New programs installed?
   - Recent updates?

4. What have you tried so far?"
    )
}
