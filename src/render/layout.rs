use std::collections::HashMap;

use crate::config::schema::{BadgeGroup, RowSpec, StatuslineConfig};
use crate::session::Snapshot;

use super::ansi::{fg_rgb, ERASE_TO_EOL, RESET};
use super::badge::{Badge, RULE_GRAY};
use super::groups;

/// Longest horizontal rule drawn for a separator row.
const RULE_MAX: usize = 60;

/// Join badges left to right, one space after each, breaking onto a new
/// line before a badge that would push the line past `max_width`. A line
/// always takes at least one badge. `max_width == 0` never wraps.
pub fn join_with_wrap(badges: &[Badge], max_width: usize) -> String {
    let mut out = String::new();
    let mut line_width = 0;
    for badge in badges {
        let width = badge.width();
        if max_width > 0 && line_width > 0 && line_width + width > max_width {
            out.push_str(RESET);
            out.push_str(ERASE_TO_EOL);
            out.push('\n');
            line_width = 0;
        }
        out.push_str(badge.as_str());
        out.push_str(RESET);
        out.push(' ');
        line_width += width + 1;
    }
    out
}

fn rule(max_width: usize) -> String {
    let len = if max_width == 0 {
        RULE_MAX
    } else {
        max_width.min(RULE_MAX)
    };
    format!("{}{}{}", fg_rgb(RULE_GRAY), "─".repeat(len), RESET)
}

/// Render every configured row. Rows whose groups produce no badges are
/// skipped; a group listed more than once is built only once.
pub fn build_rows(snapshot: &Snapshot, config: &StatuslineConfig, max_width: usize) -> Vec<String> {
    let mut built: HashMap<BadgeGroup, Vec<Badge>> = HashMap::new();
    let mut lines = Vec::new();

    for row in &config.rows {
        let groups = match row {
            RowSpec::Separator => {
                lines.push(rule(max_width));
                continue;
            }
            RowSpec::Groups(groups) => groups,
        };

        let mut badges = Vec::new();
        for &group in groups {
            let group_badges = built
                .entry(group)
                .or_insert_with(|| groups::build(group, snapshot, config));
            badges.extend(group_badges.iter().cloned());
        }
        if !badges.is_empty() {
            lines.push(join_with_wrap(&badges, max_width));
        }
    }
    lines
}
