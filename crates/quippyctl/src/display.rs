//! Display helpers for quippyctl: `$` marks the user, `>` marks Quippy.

use crate::client::DaemonHealth;
use owo_colors::OwoColorize;
use quippy_common::chat::{truncate_for_display, DISPLAY_LIMIT};
use quippy_common::SystemSnapshot;

const INDENT: &str = "  ";

/// Print the user's line, capped at the display limit
pub fn print_user(text: &str) {
    println!("{} {}", "$".magenta().bold(), truncate_for_display(text, DISPLAY_LIMIT));
}

/// Print a Quippy message; continuation lines are indented under the marker
pub fn print_system(text: &str) {
    println!("{} {}", ">".green().bold(), indent_continuation(text));
}

pub fn print_prompt() {
    print!("{} ", "$".magenta().bold());
}

pub fn print_error(text: &str) {
    eprintln!("{} {}", "!".red().bold(), text);
}

pub fn indent_continuation(text: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("{}{}", INDENT, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn snapshot_lines(snapshot: &SystemSnapshot) -> Vec<String> {
    let mut lines = vec![format!("{:8} {}", "os", snapshot.os)];
    let cpu = match snapshot.cpu.temperature {
        Some(t) => format!("{}% ({:.0}°C)", snapshot.cpu.usage, t),
        None => format!("{}%", snapshot.cpu.usage),
    };
    lines.push(format!("{:8} {}", "cpu", cpu));
    lines.push(format!(
        "{:8} {}% of {} MB ({} MB free)",
        "memory", snapshot.memory.usage, snapshot.memory.total, snapshot.memory.free
    ));
    lines.push(format!(
        "{:8} {}% of {} GB ({} GB free)",
        "disk", snapshot.disk_space.usage, snapshot.disk_space.total, snapshot.disk_space.free
    ));
    lines
}

pub fn print_snapshot(snapshot: &SystemSnapshot) {
    println!("{}", "System scan".bold());
    for line in snapshot_lines(snapshot) {
        println!("{}{}", INDENT, line);
    }
}

pub fn print_health(health: &DaemonHealth, url: &str) {
    println!("{}", "quippyd".bold());
    println!("{}{:12} {}", INDENT, "url", url);
    println!("{}{:12} {}", INDENT, "status", health.status.green());
    println!("{}{:12} {}", INDENT, "version", health.version);
    println!("{}{:12} {}s", INDENT, "uptime", health.uptime_secs);
    println!("{}{:12} {}", INDENT, "scanner", health.scanner);
    let llm = if health.llm_enabled {
        health.llm_backend.clone()
    } else {
        "disabled (keyword fallback only)".to_string()
    };
    println!("{}{:12} {}", INDENT, "llm", llm);
}
