use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::Deserialize;

use crate::session::LearningStatus;

static LOG_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## (\d{4}-\d{2}-\d{2})").expect("valid regex"));

/// Without a known session start, a recall this recent still counts.
const RECENT_RECALL_SECS: i64 = 5 * 60;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LearningMode {
    auto: Option<bool>,
}

fn recalled(claude_dir: &Path, session_start: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    let Some(ts) = std::fs::read_to_string(claude_dir.join(".last-recall"))
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
    else {
        return false;
    };
    match session_start {
        Some(start) => ts.saturating_mul(1000) >= start.timestamp_millis(),
        None => now.timestamp().saturating_sub(ts) < RECENT_RECALL_SECS,
    }
}

/// "today", "yesterday", or "Nd ago" for a log date relative to `today`.
pub fn describe_learned_date(date: NaiveDate, today: NaiveDate) -> String {
    match (today - date).num_days() {
        days if days <= 0 => "today".to_string(),
        1 => "yesterday".to_string(),
        days => format!("{}d ago", days),
    }
}

/// Date of the newest entry in a learning log: its first `## YYYY-MM-DD`
/// heading.
pub fn last_log_date(log: &str) -> Option<NaiveDate> {
    let caps = LOG_HEADING_RE.captures(log)?;
    NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()
}

/// Read the learning-loop markers under `claude_dir` (normally `~/.claude`).
pub fn learning_status(
    claude_dir: &Path,
    session_start: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> LearningStatus {
    let auto_learn = std::fs::read_to_string(claude_dir.join("learning-mode.json"))
        .ok()
        .and_then(|s| serde_json::from_str::<LearningMode>(&s).ok())
        .and_then(|m| m.auto)
        .unwrap_or(false);

    let last_learned_date = std::fs::read_to_string(claude_dir.join("learning-log.md"))
        .ok()
        .as_deref()
        .and_then(last_log_date)
        .map(|date| describe_learned_date(date, today));

    LearningStatus {
        recalled_this_session: recalled(claude_dir, session_start, now),
        learning_pending: claude_dir.join(".learning-pending").exists(),
        auto_learn,
        last_learned_date,
        instinct_status: None,
    }
}
