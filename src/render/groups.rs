//! One builder per badge group. Each maps a slice of the snapshot to zero
//! or more badges and never fails: missing data means no badges.

use crate::config::schema::{BadgeGroup, StatuslineConfig};
use crate::session::{
    AgentEntry, AgentStatus, ConfigCounts, GitRepoInfo, LearningStatus, PrInfo, Snapshot,
    TodoItem, TodoStatus, ToolActivity, UsageData,
};

use super::ansi::fg_rgb;
use super::badge::{
    split_fill, Badge, BadgeColor, COST_GRADIENT, CONTEXT_THRESHOLDS, DURATION_GRADIENT,
    FG_ADDED, FG_REMOVED, USAGE_THRESHOLDS,
};
use super::format::{
    ellipsize, extract_ticket_marker, format_cost, format_duration, format_file_stats,
    format_time_until, format_token_count, make_relative_path, pr_status_suffix, short_mcp_name,
    tool_display_name,
};

/// Build the badges of `group`. Feature-gated groups yield nothing while
/// their feature is off.
pub fn build(group: BadgeGroup, snapshot: &Snapshot, config: &StatuslineConfig) -> Vec<Badge> {
    let transcript = snapshot.transcript.as_ref();
    match group {
        BadgeGroup::Identity => identity(snapshot),
        BadgeGroup::Context => context(snapshot),
        BadgeGroup::Usage if config.features.usage => {
            usage(snapshot.usage.as_ref(), snapshot)
        }
        BadgeGroup::Usage => Vec::new(),
        BadgeGroup::Git => snapshot
            .git
            .as_ref()
            .map_or_else(Vec::new, |git| git_badges(git, snapshot)),
        BadgeGroup::Config => snapshot.config_counts.map_or_else(Vec::new, config_badges),
        BadgeGroup::Pr => snapshot.pr.as_ref().map_or_else(Vec::new, pr_badges),
        BadgeGroup::Learning if config.features.learning => snapshot
            .learning
            .as_ref()
            .map_or_else(Vec::new, learning_badges),
        BadgeGroup::Learning => Vec::new(),
        BadgeGroup::RemoteControl if config.features.remote_control => {
            remote_control(transcript.is_some_and(|t| t.remote_control_active))
        }
        BadgeGroup::RemoteControl => Vec::new(),
        BadgeGroup::Transcript => transcript_link(&snapshot.input.transcript_path),
        BadgeGroup::Tools => {
            transcript.map_or_else(Vec::new, |t| tool_badges(&t.tools, snapshot))
        }
        BadgeGroup::Agents => {
            transcript.map_or_else(Vec::new, |t| agent_badges(&t.agents, snapshot))
        }
        BadgeGroup::Todos => transcript.map_or_else(Vec::new, |t| todo_badges(&t.todos)),
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

fn identity(snapshot: &Snapshot) -> Vec<Badge> {
    let input = &snapshot.input;
    let model = &input.model.display_name;
    let label = match snapshot.usage.as_ref().and_then(|u| u.plan_name.as_deref()) {
        Some(plan) if !plan.is_empty() => format!("{} | {}", model, plan),
        _ => model.clone(),
    };

    let duration_ms = input.cost.total_duration_ms;
    let minutes = duration_ms as f64 / 60_000.0;
    let duration = format_duration(i64::try_from(duration_ms).unwrap_or(i64::MAX));
    let cost = input.cost.total_cost_usd;

    vec![
        Badge::solid(BadgeColor::Blue, &label),
        Badge::gradient(
            DURATION_GRADIENT.color_at(minutes),
            &format!("⏲ {}", duration),
        ),
        Badge::gradient(
            COST_GRADIENT.color_at(cost),
            &format!("💸 {}", format_cost(cost)),
        ),
    ]
}

fn context(snapshot: &Snapshot) -> Vec<Badge> {
    let input = &snapshot.input;
    let percent = input.percent_used();
    let text = format!(" {}k={}% ", input.current_tokens() / 1000, percent);
    let bar = split_fill(percent, &text, CONTEXT_THRESHOLDS);

    let mut badges = vec![Badge::rich(BadgeColor::Cyan, &format!(" 🧠{}", bar))];
    if let Some(usage) = input.context_window.current_usage {
        badges.push(Badge::solid(
            BadgeColor::Cyan,
            &format!(
                "🔥 {}r·{}w·{}u",
                format_token_count(usage.cache_read_input_tokens),
                format_token_count(usage.cache_creation_input_tokens),
                format_token_count(usage.input_tokens),
            ),
        ));
    }
    badges
}

fn usage(usage: Option<&UsageData>, snapshot: &Snapshot) -> Vec<Badge> {
    let Some(usage) = usage else {
        return Vec::new();
    };
    let Some(percent) = usage.five_hour else {
        return Vec::new();
    };
    let reset = format_time_until(usage.five_hour_reset_at, snapshot.now);
    let reset = if reset.is_empty() {
        String::new()
    } else {
        format!(" ({} / 5h)", reset)
    };
    let text = format!(" {}%{} ", percent, reset);
    let bar = split_fill(percent, &text, USAGE_THRESHOLDS);
    vec![Badge::rich(BadgeColor::Orange, &format!(" ⚡{}", bar))]
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

fn git_badges(git: &GitRepoInfo, snapshot: &Snapshot) -> Vec<Badge> {
    if git.repo.is_empty() {
        return Vec::new();
    }
    let mut badges = vec![Badge::solid(BadgeColor::Green, &git.repo)];

    if let Some(worktree) = git.worktree.as_deref().filter(|w| !w.is_empty()) {
        badges.push(Badge::solid(
            BadgeColor::Cyan,
            &format!("🌳 {}", ellipsize(worktree, 25, 24)),
        ));
    } else if let Some(branch) = git.branch.as_deref().filter(|b| !b.is_empty()) {
        let color = if branch == "main" || branch == "master" {
            BadgeColor::Purple
        } else {
            BadgeColor::Green
        };
        badges.push(Badge::solid(
            color,
            &format!("🌿 {}", ellipsize(branch, 25, 24)),
        ));
    }

    let stats = format_file_stats(&git.file_stats);
    if !stats.is_empty() {
        badges.push(Badge::solid(BadgeColor::Green, &stats));
    }

    let mut ahead_behind = String::new();
    if git.ahead > 0 {
        ahead_behind.push_str(&format!("↑{}", git.ahead));
    }
    if git.behind > 0 {
        ahead_behind.push_str(&format!("↓{}", git.behind));
    }
    if !ahead_behind.is_empty() {
        badges.push(Badge::solid(BadgeColor::Green, &ahead_behind));
    }

    let added = snapshot.input.cost.total_lines_added;
    let removed = snapshot.input.cost.total_lines_removed;
    if added > 0 || removed > 0 {
        badges.push(Badge::rich(
            BadgeColor::Olive,
            &format!(
                " 📊 {}+{}{}-{} ",
                fg_rgb(FG_ADDED),
                added,
                fg_rgb(FG_REMOVED),
                removed
            ),
        ));
    }
    badges
}

fn config_badges(counts: ConfigCounts) -> Vec<Badge> {
    let mut parts = Vec::new();
    if counts.claude_md_count > 0 {
        parts.push(format!("{} CLAUDE.md", counts.claude_md_count));
    }
    if counts.mcp_count > 0 {
        parts.push(format!("{} MCPs", counts.mcp_count));
    }
    if counts.hooks_count > 0 {
        parts.push(format!("{} hooks", counts.hooks_count));
    }
    if parts.is_empty() {
        return Vec::new();
    }
    vec![Badge::solid(
        BadgeColor::Purple,
        &format!("📋 {}", parts.join(" | ")),
    )]
}

fn pr_badges(pr: &PrInfo) -> Vec<Badge> {
    let mut badges = Vec::new();
    if let Some(ticket) = pr.title.as_deref().and_then(extract_ticket_marker) {
        badges.push(Badge::solid(BadgeColor::Purple, &format!("🎫 {}", ticket)));
    }
    let text = format!("🔗 PR#{}{}", pr.number, pr_status_suffix(pr));
    badges.push(Badge::solid(BadgeColor::Blue, &text).linked(&pr.url));
    badges
}

// ---------------------------------------------------------------------------
// Learning loop and remote control
// ---------------------------------------------------------------------------

fn learning_badges(status: &LearningStatus) -> Vec<Badge> {
    let mut badges = vec![if status.recalled_this_session {
        Badge::solid(BadgeColor::Green, "🧩 ✓")
    } else {
        Badge::solid(BadgeColor::Steel, "🧩 ✗")
    }];

    let observations = status
        .instinct_status
        .map_or(0, |i| i.unprocessed_observations);
    let suffix = if observations > 0 {
        format!(" {}", observations)
    } else {
        " ✓".to_string()
    };

    badges.push(if status.learning_pending {
        Badge::solid(BadgeColor::Rose, &format!("📚 ⚠{}", suffix))
    } else if let Some(date) = status.last_learned_date.as_deref() {
        let color = if observations > 0 {
            BadgeColor::Gold
        } else {
            BadgeColor::Green
        };
        Badge::solid(color, &format!("📚 {}{}", date, suffix))
    } else {
        Badge::solid(BadgeColor::Steel, &format!("📚{}", suffix))
    });

    if let Some(instinct) = status.instinct_status {
        let mut text = format!("🧬 {}", instinct.active_count);
        let mut color = BadgeColor::Steel;
        if instinct.promotable_count > 0 {
            text.push_str(&format!(" ▲{}", instinct.promotable_count));
            color = BadgeColor::Gold;
        }
        if instinct.corrections_this_session > 0 {
            text.push_str(" !");
            color = BadgeColor::Rose;
        }
        badges.push(Badge::solid(color, &text));
    }
    badges
}

fn remote_control(active: bool) -> Vec<Badge> {
    if active {
        vec![Badge::solid(BadgeColor::Cyan, "📱 RC")]
    } else {
        vec![Badge::solid(BadgeColor::Steel, "📱 local")]
    }
}

// ---------------------------------------------------------------------------
// Transcript activity
// ---------------------------------------------------------------------------

fn transcript_link(path: &str) -> Vec<Badge> {
    if path.is_empty() {
        return Vec::new();
    }
    let name = path.rsplit('/').next().filter(|n| !n.is_empty()).unwrap_or(path);
    let short = if name.chars().count() > 20 {
        let head: String = name.chars().take(8).collect();
        format!("{}…jsonl", head)
    } else {
        name.to_string()
    };
    vec![Badge::solid(BadgeColor::Steel, &format!("📝 {}", short))
        .linked(&format!("file://{}", path))]
}

fn tool_color(name: &str) -> BadgeColor {
    match name {
        "Read" | "Write" | "Edit" | "NotebookEdit" => BadgeColor::Green,
        "Grep" | "Glob" => BadgeColor::Purple,
        "Bash" => BadgeColor::Orange,
        "Task" | "Skill" | "AskUserQuestion" => BadgeColor::Blue,
        "TaskCreate" | "TaskUpdate" | "TaskList" | "TaskGet" | "TodoWrite" => BadgeColor::Gold,
        "WebFetch" | "WebSearch" | "ToolSearch" => BadgeColor::Cyan,
        _ => BadgeColor::Charcoal,
    }
}

fn tool_badges(tools: &ToolActivity, snapshot: &Snapshot) -> Vec<Badge> {
    let cwd = &snapshot.input.workspace.current_dir;
    let home = snapshot.home_dir.as_deref();
    let mut badges = Vec::new();

    for tool in &tools.running {
        let target = tool
            .target
            .as_deref()
            .map(|t| format!(": {}", make_relative_path(t, cwd, home)))
            .unwrap_or_default();
        badges.push(Badge::solid(
            BadgeColor::Cyan,
            &format!("◐ {}{}", tool_display_name(&tool.name), target),
        ));
    }

    // MCP tools collapse per server; insertion order is kept.
    let mut mcp: Vec<(String, u32)> = Vec::new();
    for (name, count) in &tools.completed {
        if name.starts_with("mcp__") {
            let server = short_mcp_name(name);
            match mcp.iter_mut().find(|(s, _)| *s == server) {
                Some((_, total)) => *total += count,
                None => mcp.push((server, *count)),
            }
        } else {
            badges.push(Badge::solid(tool_color(name), &format!("{}×{}", name, count)));
        }
    }
    for (server, total) in mcp {
        badges.push(Badge::solid(
            BadgeColor::Steel,
            &format!("🔌{}×{}", server, total),
        ));
    }
    badges
}

fn agent_badges(agents: &[AgentEntry], snapshot: &Snapshot) -> Vec<Badge> {
    fn short_type(agent_type: &str) -> &str {
        agent_type.split('-').next().unwrap_or(agent_type)
    }
    fn description(agent: &AgentEntry) -> String {
        agent
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| format!(" {}", ellipsize(d, 25, 25)))
            .unwrap_or_default()
    }

    let mut badges = Vec::new();
    for agent in agents.iter().filter(|a| a.status == AgentStatus::Running) {
        let elapsed = (snapshot.now - agent.start_time).num_milliseconds();
        badges.push(Badge::solid(
            BadgeColor::Cyan,
            &format!(
                "◐ {}{} ({})",
                short_type(&agent.agent_type),
                description(agent),
                format_duration(elapsed)
            ),
        ));
    }

    let completed: Vec<&AgentEntry> = agents
        .iter()
        .filter(|a| a.status == AgentStatus::Completed)
        .collect();
    for agent in &completed[completed.len().saturating_sub(2)..] {
        let duration = agent
            .end_time
            .map(|end| format!(" {}", format_duration((end - agent.start_time).num_milliseconds())))
            .unwrap_or_default();
        badges.push(Badge::solid(
            BadgeColor::Steel,
            &format!(
                "✓ {}{}{}",
                short_type(&agent.agent_type),
                description(agent),
                duration
            ),
        ));
    }
    badges
}

fn todo_badges(todos: &[TodoItem]) -> Vec<Badge> {
    if todos.is_empty() {
        return Vec::new();
    }
    let total = todos.len();
    let completed = todos
        .iter()
        .filter(|t| t.status == TodoStatus::Completed)
        .count();
    let progress = format!("({}/{})", completed, total);

    let badge = if let Some(todo) = todos.iter().find(|t| t.status == TodoStatus::InProgress) {
        Badge::solid(BadgeColor::Cyan, &format!("▸ {} {}", todo.subject, progress))
    } else if let Some(todo) = todos.iter().find(|t| t.status == TodoStatus::Pending) {
        Badge::solid(
            BadgeColor::Charcoal,
            &format!("▹ {} {}", todo.subject, progress),
        )
    } else {
        Badge::solid(BadgeColor::Green, &format!("✓ All done {}", progress))
    };
    vec![badge]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ansi::visible_width;
    use crate::session::{
        CurrentUsage, GitFileStats, InstinctStatus, PrState, RunningTool, TranscriptData,
    };
    use chrono::{Duration, TimeZone, Utc};

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn bare() -> Snapshot {
        Snapshot::new(Default::default(), now())
    }

    fn texts(badges: &[Badge]) -> Vec<String> {
        badges.iter().map(|b| b.to_string()).collect()
    }

    fn all_features() -> StatuslineConfig {
        let mut config = StatuslineConfig::default();
        config.features.usage = true;
        config.features.learning = true;
        config.features.remote_control = true;
        config
    }

    #[test]
    fn test_identity_badges() {
        let mut snapshot = bare();
        snapshot.input.model.display_name = "Opus".to_string();
        snapshot.input.cost.total_cost_usd = 12.7;
        snapshot.input.cost.total_duration_ms = 90_000;
        let badges = build(BadgeGroup::Identity, &snapshot, &StatuslineConfig::default());
        assert_eq!(badges.len(), 3);
        let all = texts(&badges).join("");
        assert!(all.contains(" Opus "));
        assert!(all.contains("⏲ 1m 30s"));
        assert!(all.contains("💸 $12"));
    }

    #[test]
    fn test_identity_includes_plan() {
        let mut snapshot = bare();
        snapshot.input.model.display_name = "Opus".to_string();
        snapshot.usage = Some(UsageData {
            plan_name: Some("Max".to_string()),
            ..Default::default()
        });
        let badges = build(BadgeGroup::Identity, &snapshot, &StatuslineConfig::default());
        assert!(badges[0].as_str().contains("Opus | Max"));
    }

    #[test]
    fn test_context_badges() {
        let mut snapshot = bare();
        snapshot.input.context_window.context_window_size = 200_000;
        snapshot.input.context_window.current_usage = Some(CurrentUsage {
            input_tokens: 28_000,
            cache_creation_input_tokens: 45_000,
            cache_read_input_tokens: 22_000,
        });
        let badges = build(BadgeGroup::Context, &snapshot, &StatuslineConfig::default());
        assert_eq!(badges.len(), 2);
        assert!(badges[0].as_str().contains("=47% "));
        assert!(badges[0].as_str().contains(" 95k"));
        assert!(badges[1].as_str().contains("🔥 22kr·45kw·28ku"));
    }

    #[test]
    fn test_context_without_usage_has_single_badge() {
        let badges = build(BadgeGroup::Context, &bare(), &StatuslineConfig::default());
        assert_eq!(badges.len(), 1);
        assert!(badges[0].as_str().contains("0k=0%"));
    }

    #[test]
    fn test_extreme_counters_render() {
        let mut snapshot = bare();
        snapshot.input.cost.total_duration_ms = u64::MAX;
        snapshot.input.context_window.context_window_size = 200_000;
        snapshot.input.context_window.current_usage = Some(CurrentUsage {
            input_tokens: u64::MAX,
            cache_creation_input_tokens: u64::MAX,
            cache_read_input_tokens: 1,
        });
        let config = StatuslineConfig::default();
        let identity = texts(&build(BadgeGroup::Identity, &snapshot, &config)).join("");
        assert!(identity.contains("⏲ "));
        assert!(!identity.contains("⏲ 0s"));
        let context = build(BadgeGroup::Context, &snapshot, &config);
        assert!(context[0].as_str().contains(&format!("={}%", u32::MAX)));
    }

    #[test]
    fn test_feature_gated_groups_off_by_default() {
        let snapshot = Snapshot::sample(now());
        let config = StatuslineConfig::default();
        for group in [BadgeGroup::Usage, BadgeGroup::Learning, BadgeGroup::RemoteControl] {
            assert!(build(group, &snapshot, &config).is_empty(), "{:?}", group);
        }
    }

    #[test]
    fn test_usage_badge() {
        let mut snapshot = bare();
        snapshot.usage = Some(UsageData {
            five_hour: Some(34),
            five_hour_reset_at: Some(now() + Duration::minutes(125)),
            ..Default::default()
        });
        let badges = build(BadgeGroup::Usage, &snapshot, &all_features());
        assert_eq!(badges.len(), 1);
        let sgr = regex::Regex::new(r"\x1b\[[0-9;]*m").unwrap();
        let plain = sgr.replace_all(badges[0].as_str(), "");
        assert_eq!(plain, " ⚡ 34% (2h 5m / 5h) ");
    }

    #[test]
    fn test_usage_without_five_hour_is_empty() {
        let mut snapshot = bare();
        snapshot.usage = Some(UsageData::default());
        assert!(build(BadgeGroup::Usage, &snapshot, &all_features()).is_empty());
    }

    #[test]
    fn test_git_badges() {
        let mut snapshot = bare();
        snapshot.input.cost.total_lines_added = 10;
        snapshot.git = Some(GitRepoInfo {
            repo: "app".to_string(),
            worktree: None,
            branch: Some("main".to_string()),
            ahead: 0,
            behind: 3,
            file_stats: GitFileStats {
                modified: 3,
                added: 1,
                deleted: 0,
                untracked: 2,
            },
        });
        let badges = build(BadgeGroup::Git, &snapshot, &StatuslineConfig::default());
        let all = texts(&badges);
        assert_eq!(all.len(), 5);
        assert!(all[1].starts_with(&crate::render::ansi::bg_rgb(BadgeColor::Purple.rgb())));
        assert!(all[1].contains("🌿 main"));
        assert!(all[2].contains("!3+1?2"));
        assert!(all[3].contains(" ↓3 "));
        assert!(all[4].contains("+10"));
        assert!(all[4].contains("-0"));
    }

    #[test]
    fn test_git_worktree_replaces_branch() {
        let mut snapshot = bare();
        snapshot.git = Some(GitRepoInfo {
            repo: "app".to_string(),
            worktree: Some("a-very-long-worktree-name-here".to_string()),
            branch: Some("feature".to_string()),
            ..Default::default()
        });
        let all = texts(&build(BadgeGroup::Git, &snapshot, &StatuslineConfig::default()));
        assert_eq!(all.len(), 2);
        assert!(all[1].contains("🌳 a-very-long-worktree-nam…"));
        assert!(!all.join("").contains("feature"));
    }

    #[test]
    fn test_config_badge() {
        let mut snapshot = bare();
        snapshot.config_counts = Some(ConfigCounts {
            claude_md_count: 2,
            mcp_count: 0,
            hooks_count: 4,
        });
        let badges = build(BadgeGroup::Config, &snapshot, &StatuslineConfig::default());
        assert!(badges[0].as_str().contains("📋 2 CLAUDE.md | 4 hooks"));

        snapshot.config_counts = Some(ConfigCounts::default());
        assert!(build(BadgeGroup::Config, &snapshot, &StatuslineConfig::default()).is_empty());
    }

    #[test]
    fn test_pr_badges() {
        let mut snapshot = bare();
        snapshot.pr = Some(PrInfo {
            url: "https://example.com/pull/7".to_string(),
            number: "7".to_string(),
            title: Some("ABC-42 Fix login".to_string()),
            is_draft: false,
            state: Some(PrState::Merged),
            merge_state_status: None,
        });
        let badges = build(BadgeGroup::Pr, &snapshot, &StatuslineConfig::default());
        assert_eq!(badges.len(), 2);
        assert!(badges[0].as_str().contains("🎫 ABC-42"));
        assert!(badges[1].as_str().starts_with("\x1b]8;;https://example.com/pull/7\x07"));
        assert!(badges[1].as_str().contains("🔗 PR#7 (M)"));
    }

    #[test]
    fn test_learning_badges() {
        let mut snapshot = bare();
        snapshot.learning = Some(LearningStatus {
            recalled_this_session: false,
            learning_pending: false,
            auto_learn: false,
            last_learned_date: Some("yesterday".to_string()),
            instinct_status: Some(InstinctStatus {
                active_count: 5,
                promotable_count: 1,
                corrections_this_session: 2,
                unprocessed_observations: 3,
            }),
        });
        let badges = build(BadgeGroup::Learning, &snapshot, &all_features());
        let all = texts(&badges);
        assert_eq!(all.len(), 3);
        assert!(all[0].contains("🧩 ✗"));
        assert!(all[1].starts_with(&crate::render::ansi::bg_rgb(BadgeColor::Gold.rgb())));
        assert!(all[1].contains("📚 yesterday 3"));
        assert!(all[2].starts_with(&crate::render::ansi::bg_rgb(BadgeColor::Rose.rgb())));
        assert!(all[2].contains("🧬 5 ▲1 !"));
    }

    #[test]
    fn test_learning_pending_without_instincts() {
        let mut snapshot = bare();
        snapshot.learning = Some(LearningStatus {
            recalled_this_session: true,
            learning_pending: true,
            ..Default::default()
        });
        let all = texts(&build(BadgeGroup::Learning, &snapshot, &all_features()));
        assert_eq!(all.len(), 2);
        assert!(all[0].contains("🧩 ✓"));
        assert!(all[1].contains("📚 ⚠ ✓"));
    }

    #[test]
    fn test_remote_control_badge() {
        let mut snapshot = bare();
        let badges = build(BadgeGroup::RemoteControl, &snapshot, &all_features());
        assert!(badges[0].as_str().contains("📱 local"));

        snapshot.transcript = Some(TranscriptData {
            remote_control_active: true,
            ..Default::default()
        });
        let badges = build(BadgeGroup::RemoteControl, &snapshot, &all_features());
        assert!(badges[0].as_str().contains("📱 RC"));
    }

    #[test]
    fn test_transcript_link() {
        let mut snapshot = bare();
        assert!(build(BadgeGroup::Transcript, &snapshot, &StatuslineConfig::default()).is_empty());

        snapshot.input.transcript_path =
            "/home/dev/.claude/projects/x/0f3c2a9e-1111-2222.jsonl".to_string();
        let badges = build(BadgeGroup::Transcript, &snapshot, &StatuslineConfig::default());
        assert!(badges[0].as_str().contains("📝 0f3c2a9e…jsonl"));
        assert!(badges[0].as_str().contains("file:///home/dev/.claude/projects/x/"));

        snapshot.input.transcript_path = "/tmp/short.jsonl".to_string();
        let badges = build(BadgeGroup::Transcript, &snapshot, &StatuslineConfig::default());
        assert!(badges[0].as_str().contains("📝 short.jsonl"));
    }

    #[test]
    fn test_tool_badges() {
        let mut snapshot = bare();
        snapshot.input.workspace.current_dir = "/w/app".to_string();
        snapshot.transcript = Some(TranscriptData {
            tools: ToolActivity {
                running: vec![RunningTool {
                    name: "Edit".to_string(),
                    target: Some("/w/app/src/lib.rs".to_string()),
                }],
                completed: vec![
                    ("Read".to_string(), 3),
                    ("mcp__github__list_prs".to_string(), 2),
                    ("Mystery".to_string(), 1),
                    ("mcp__github__get_pr".to_string(), 1),
                ],
            },
            ..Default::default()
        });
        let all = texts(&build(BadgeGroup::Tools, &snapshot, &StatuslineConfig::default()));
        assert_eq!(all.len(), 4);
        assert!(all[0].contains("◐ Edit: src/lib.rs"));
        assert!(all[1].contains("Read×3"));
        assert!(all[2].starts_with(&crate::render::ansi::bg_rgb(BadgeColor::Charcoal.rgb())));
        assert!(all[3].contains("🔌github×3"));
    }

    #[test]
    fn test_agent_badges_show_last_two_completed() {
        let mut snapshot = bare();
        let agent = |id: &str, status: AgentStatus, desc: Option<&str>| AgentEntry {
            id: id.to_string(),
            agent_type: "code-reviewer".to_string(),
            model: None,
            description: desc.map(str::to_string),
            status,
            start_time: now() - Duration::seconds(90),
            end_time: (status == AgentStatus::Completed).then(|| now() - Duration::seconds(30)),
        };
        snapshot.transcript = Some(TranscriptData {
            agents: vec![
                agent("1", AgentStatus::Completed, Some("first")),
                agent("2", AgentStatus::Completed, Some("second")),
                agent("3", AgentStatus::Running, Some("An extremely long description text")),
                agent("4", AgentStatus::Completed, None),
            ],
            ..Default::default()
        });
        let all = texts(&build(BadgeGroup::Agents, &snapshot, &StatuslineConfig::default()));
        assert_eq!(all.len(), 3);
        assert!(all[0].contains("◐ code An extremely long descrip… (1m 30s)"));
        assert!(all[1].contains("✓ code second 1m "));
        assert!(all[2].contains("✓ code 1m "));
        assert!(!all.join("").contains("first"));
    }

    #[test]
    fn test_todo_badges() {
        let todo = |subject: &str, status: TodoStatus| TodoItem {
            subject: subject.to_string(),
            status,
        };
        let mut snapshot = bare();
        snapshot.transcript = Some(TranscriptData {
            todos: vec![
                todo("a", TodoStatus::Completed),
                todo("b", TodoStatus::Pending),
                todo("c", TodoStatus::InProgress),
            ],
            ..Default::default()
        });
        let config = StatuslineConfig::default();
        assert!(build(BadgeGroup::Todos, &snapshot, &config)[0]
            .as_str()
            .contains("▸ c (1/3)"));

        snapshot.transcript.as_mut().unwrap().todos.pop();
        assert!(build(BadgeGroup::Todos, &snapshot, &config)[0]
            .as_str()
            .contains("▹ b (1/2)"));

        snapshot.transcript.as_mut().unwrap().todos.pop();
        assert!(build(BadgeGroup::Todos, &snapshot, &config)[0]
            .as_str()
            .contains("✓ All done (1/1)"));

        snapshot.transcript.as_mut().unwrap().todos.clear();
        assert!(build(BadgeGroup::Todos, &snapshot, &config).is_empty());
    }

    #[test]
    fn test_missing_enrichment_yields_nothing() {
        let snapshot = bare();
        let config = all_features();
        for group in [
            BadgeGroup::Git,
            BadgeGroup::Config,
            BadgeGroup::Pr,
            BadgeGroup::Usage,
            BadgeGroup::Learning,
            BadgeGroup::Transcript,
            BadgeGroup::Tools,
            BadgeGroup::Agents,
            BadgeGroup::Todos,
        ] {
            assert!(build(group, &snapshot, &config).is_empty(), "{:?}", group);
        }
    }

    #[test]
    fn test_sample_badges_have_positive_width() {
        let snapshot = Snapshot::sample(now());
        let config = all_features();
        for group in BadgeGroup::ALL {
            for badge in build(group, &snapshot, &config) {
                assert!(visible_width(badge.as_str()) > 0, "{:?}", group);
            }
        }
    }
}
