//! Text formatting shared by the badge builders.

use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::session::{GitFileStats, PrInfo, PrState};

static TICKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{2,6}-\d{1,5})").expect("valid regex"));

/// Format a duration in milliseconds: "42s", "3m 5s", "12m", "1h 4m", "2h".
pub fn format_duration(ms: i64) -> String {
    let total_seconds = ms.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        return if minutes > 0 {
            format!("{}h {}m", hours, minutes)
        } else {
            format!("{}h", hours)
        };
    }
    if minutes >= 10 || (minutes > 0 && seconds == 0) {
        return format!("{}m", minutes);
    }
    if minutes > 0 {
        return format!("{}m {}s", minutes, seconds);
    }
    format!("{}s", seconds)
}

/// Time left until `reset`: "2h 5m", "3h", "17m", or "now" once it has
/// passed. Empty when no reset time is known.
pub fn format_time_until(reset: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(reset) = reset else {
        return String::new();
    };
    let diff_ms = (reset - now).num_milliseconds();
    if diff_ms <= 0 {
        return "now".to_string();
    }
    let hours = diff_ms / 3_600_000;
    let minutes = (diff_ms % 3_600_000) / 60_000;
    match (hours, minutes) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Abbreviate a token count: "999", "1.5k", "12k".
pub fn format_token_count(n: u64) -> String {
    if n < 1000 {
        return n.to_string();
    }
    if n >= 10_000 {
        return format!("{}k", n / 1000);
    }
    // Tenths rounded half-up.
    format!("{:.1}k", ((n + 50) / 100) as f64 / 10.0)
}

/// USD cost: cents below $10, whole dollars (floored) from $10 up.
pub fn format_cost(cost: f64) -> String {
    if cost >= 10.0 {
        format!("${}", cost.floor() as u64)
    } else {
        // Cents rounded half-up.
        format!("${:.2}", (cost * 100.0).round() / 100.0)
    }
}

/// Working-tree counts as `!M+A✘D?U`, zero components omitted.
pub fn format_file_stats(stats: &GitFileStats) -> String {
    let mut out = String::new();
    for (marker, n) in [
        ('!', stats.modified),
        ('+', stats.added),
        ('✘', stats.deleted),
        ('?', stats.untracked),
    ] {
        if n > 0 {
            out.push(marker);
            out.push_str(&n.to_string());
        }
    }
    out
}

/// Keep the first `keep` characters of `s` and add an ellipsis when `s` is
/// longer than `limit` characters.
pub fn ellipsize(s: &str, limit: usize, keep: usize) -> String {
    if s.chars().count() > limit {
        let mut out: String = s.chars().take(keep).collect();
        out.push('…');
        out
    } else {
        s.to_string()
    }
}

/// Show `path` relative to `cwd`, or `~`-prefixed when under `home`.
pub fn make_relative_path(path: &str, cwd: &str, home: Option<&Path>) -> String {
    if !cwd.is_empty() {
        let prefix = if cwd.ends_with('/') {
            cwd.to_string()
        } else {
            format!("{}/", cwd)
        };
        if let Some(rest) = path.strip_prefix(&prefix) {
            return rest.to_string();
        }
    }
    if let Some(home) = home.and_then(Path::to_str).filter(|h| !h.is_empty()) {
        if let Some(rest) = path.strip_prefix(home).filter(|r| r.starts_with('/')) {
            return format!("~{}", rest);
        }
    }
    path.to_string()
}

/// Short server label for an `mcp__<server>__<action>` tool name: the last
/// distinct word of the server name.
pub fn short_mcp_name(full_name: &str) -> String {
    let parts: Vec<&str> = full_name.split("__").collect();
    if parts.len() < 3 {
        return full_name.to_string();
    }
    let server = parts[1];
    let mut words: Vec<&str> = Vec::new();
    for word in server.split(['-', '_']).filter(|w| !w.is_empty()) {
        if !words.contains(&word) {
            words.push(word);
        }
    }
    words.last().unwrap_or(&server).to_string()
}

/// Display name for a tool: builtins as-is, MCP tools as `server:action`.
pub fn tool_display_name(full_name: &str) -> String {
    if !full_name.starts_with("mcp__") {
        return full_name.to_string();
    }
    let parts: Vec<&str> = full_name.split("__").collect();
    if parts.len() < 3 {
        return full_name.to_string();
    }
    let action = parts[2..].join("_");
    let action = action.strip_prefix("browser_").unwrap_or(&action);
    format!("{}:{}", short_mcp_name(full_name), action)
}

/// Ticket key such as `PROJ-123` at the start of a PR title.
pub fn extract_ticket_marker(title: &str) -> Option<&str> {
    TICKET_RE
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Short PR state marker appended to the PR badge.
pub fn pr_status_suffix(pr: &PrInfo) -> &'static str {
    if pr.is_draft {
        return " (D)";
    }
    match pr.state {
        Some(PrState::Merged) => " (M)",
        Some(PrState::Closed) => " (C)",
        Some(PrState::Open) if pr.merge_state_status.as_deref() == Some("CLEAN") => " (✅)",
        Some(PrState::Open) => " (O)",
        Some(PrState::Unknown) | None => "",
    }
}
