//! The session snapshot: host-supplied session JSON plus the optional
//! enrichment gathered by the collectors. Rendering only ever reads it.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Host input
// ---------------------------------------------------------------------------

/// Session metadata piped in on stdin for each statusline tick.
/// Absent fields fall back to defaults; only unparseable JSON is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionInput {
    pub model: ModelInfo,
    pub workspace: Workspace,
    #[allow(dead_code)] // Deserialized for forward-compatibility; not rendered.
    pub version: String,
    pub transcript_path: String,
    #[allow(dead_code)] // Deserialized for forward-compatibility; not rendered.
    pub output_style: Option<OutputStyle>,
    pub cost: CostInfo,
    pub context_window: ContextWindow,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    pub display_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Workspace {
    pub current_dir: String,
    pub project_dir: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputStyle {
    #[allow(dead_code)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CostInfo {
    pub total_cost_usd: f64,
    pub total_duration_ms: u64,
    pub total_lines_added: u64,
    pub total_lines_removed: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContextWindow {
    #[allow(dead_code)]
    pub total_input_tokens: u64,
    #[allow(dead_code)]
    pub total_output_tokens: u64,
    pub context_window_size: u64,
    pub current_usage: Option<CurrentUsage>,
}

/// Token counters of the most recent request.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct CurrentUsage {
    pub input_tokens: u64,
    pub cache_creation_input_tokens: u64,
    pub cache_read_input_tokens: u64,
}

impl SessionInput {
    /// Directory the collectors inspect: the current dir, else the project dir.
    pub fn project_dir(&self) -> &str {
        if self.workspace.current_dir.is_empty() {
            &self.workspace.project_dir
        } else {
            &self.workspace.current_dir
        }
    }

    /// Tokens currently occupying the context window.
    pub fn current_tokens(&self) -> u64 {
        self.context_window.current_usage.map_or(0, |u| {
            u.input_tokens
                .saturating_add(u.cache_creation_input_tokens)
                .saturating_add(u.cache_read_input_tokens)
        })
    }

    /// Whole percent of the context window in use; 0 when the size is unknown.
    pub fn percent_used(&self) -> u32 {
        let size = self.context_window.context_window_size;
        if size == 0 {
            return 0;
        }
        let percent = u128::from(self.current_tokens()) * 100 / u128::from(size);
        u32::try_from(percent).unwrap_or(u32::MAX)
    }
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GitFileStats {
    pub modified: u32,
    pub added: u32,
    pub deleted: u32,
    pub untracked: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitRepoInfo {
    pub repo: String,
    /// Set for linked worktrees; the branch is not shown then.
    pub worktree: Option<String>,
    pub branch: Option<String>,
    pub ahead: u32,
    pub behind: u32,
    pub file_stats: GitFileStats,
}

/// Pull request state as reported by `gh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrState {
    Open,
    Closed,
    Merged,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrInfo {
    pub url: String,
    pub number: String,
    pub title: Option<String>,
    pub is_draft: bool,
    pub state: Option<PrState>,
    pub merge_state_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningTool {
    pub name: String,
    pub target: Option<String>,
}

/// Tool calls seen in the transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolActivity {
    pub running: Vec<RunningTool>,
    /// Completion counts per exact tool name, in first-completion order.
    pub completed: Vec<(String, u32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentStatus {
    Running,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentEntry {
    #[allow(dead_code)]
    pub id: String,
    pub agent_type: String,
    #[allow(dead_code)] // Captured for forward-compatibility; not rendered.
    pub model: Option<String>,
    pub description: Option<String>,
    pub status: AgentStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub subject: String,
    pub status: TodoStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptData {
    pub tools: ToolActivity,
    pub agents: Vec<AgentEntry>,
    pub todos: Vec<TodoItem>,
    pub session_start: Option<DateTime<Utc>>,
    pub remote_control_active: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigCounts {
    pub claude_md_count: u32,
    pub mcp_count: u32,
    pub hooks_count: u32,
}

/// Rate-limit usage, in the shape stored by the usage cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsageData {
    pub plan_name: Option<String>,
    pub five_hour: Option<u32>,
    pub seven_day: Option<u32>,
    pub five_hour_reset_at: Option<DateTime<Utc>>,
    pub seven_day_reset_at: Option<DateTime<Utc>>,
    pub api_unavailable: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstinctStatus {
    pub active_count: u32,
    pub promotable_count: u32,
    pub corrections_this_session: u32,
    pub unprocessed_observations: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LearningStatus {
    pub recalled_this_session: bool,
    pub learning_pending: bool,
    #[allow(dead_code)] // Read from learning-mode.json; not rendered yet.
    pub auto_learn: bool,
    pub last_learned_date: Option<String>,
    pub instinct_status: Option<InstinctStatus>,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything one render needs, fully materialized up front.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub input: SessionInput,
    pub git: Option<GitRepoInfo>,
    pub pr: Option<PrInfo>,
    pub transcript: Option<TranscriptData>,
    pub config_counts: Option<ConfigCounts>,
    pub usage: Option<UsageData>,
    pub learning: Option<LearningStatus>,
    /// The render instant; elapsed times and reset countdowns use it.
    pub now: DateTime<Utc>,
    /// Paths under it are shown with a leading `~`.
    pub home_dir: Option<PathBuf>,
}

impl Snapshot {
    /// A bare snapshot with no enrichment.
    pub fn new(input: SessionInput, now: DateTime<Utc>) -> Self {
        Self {
            input,
            now,
            ..Default::default()
        }
    }

    /// A fully populated demo session for previews.
    pub fn sample(now: DateTime<Utc>) -> Self {
        let input = SessionInput {
            model: ModelInfo {
                display_name: "Opus".to_string(),
            },
            workspace: Workspace {
                current_dir: "/Users/dev/my-project".to_string(),
                project_dir: "/Users/dev/my-project".to_string(),
            },
            version: "1.0.80".to_string(),
            transcript_path: "/tmp/transcript-abc123.jsonl".to_string(),
            output_style: None,
            cost: CostInfo {
                total_cost_usd: 4.82,
                total_duration_ms: 1_854_000,
                total_lines_added: 284,
                total_lines_removed: 67,
            },
            context_window: ContextWindow {
                total_input_tokens: 95_000,
                total_output_tokens: 18_000,
                context_window_size: 200_000,
                current_usage: Some(CurrentUsage {
                    input_tokens: 28_000,
                    cache_creation_input_tokens: 45_000,
                    cache_read_input_tokens: 22_000,
                }),
            },
        };

        let completed = [
            ("Read", 7),
            ("Edit", 5),
            ("Grep", 4),
            ("Glob", 3),
            ("Write", 2),
            ("Bash", 6),
            ("Task", 2),
        ];
        let todos = [
            ("Extract types into separate module", TodoStatus::Completed),
            ("Refactor render pipeline", TodoStatus::Completed),
            ("Add rate limiting", TodoStatus::InProgress),
            ("Write unit tests", TodoStatus::Pending),
            ("Update documentation", TodoStatus::Pending),
        ];

        Self {
            input,
            git: Some(GitRepoInfo {
                repo: "my-project".to_string(),
                worktree: None,
                branch: Some("feature/user-auth".to_string()),
                ahead: 2,
                behind: 0,
                file_stats: GitFileStats {
                    modified: 3,
                    added: 1,
                    deleted: 0,
                    untracked: 2,
                },
            }),
            pr: Some(PrInfo {
                url: "https://github.com/user/my-project/pull/42".to_string(),
                number: "42".to_string(),
                title: Some("PROJ-123 Add user authentication".to_string()),
                is_draft: false,
                state: Some(PrState::Open),
                merge_state_status: Some("CLEAN".to_string()),
            }),
            transcript: Some(TranscriptData {
                tools: ToolActivity {
                    running: vec![RunningTool {
                        name: "Bash".to_string(),
                        target: Some("npm test --coverage".to_string()),
                    }],
                    completed: completed
                        .iter()
                        .map(|(name, n)| (name.to_string(), *n))
                        .collect(),
                },
                agents: vec![
                    AgentEntry {
                        id: "a1".to_string(),
                        agent_type: "code-reviewer".to_string(),
                        model: None,
                        description: Some("Review auth implementation".to_string()),
                        status: AgentStatus::Completed,
                        start_time: now - Duration::seconds(45),
                        end_time: Some(now - Duration::seconds(12)),
                    },
                    AgentEntry {
                        id: "a2".to_string(),
                        agent_type: "general-purpose".to_string(),
                        model: None,
                        description: Some("Generate test fixtures".to_string()),
                        status: AgentStatus::Running,
                        start_time: now - Duration::seconds(8),
                        end_time: None,
                    },
                ],
                todos: todos
                    .iter()
                    .map(|(subject, status)| TodoItem {
                        subject: subject.to_string(),
                        status: *status,
                    })
                    .collect(),
                session_start: Some(now - Duration::milliseconds(1_854_000)),
                remote_control_active: false,
            }),
            config_counts: Some(ConfigCounts {
                claude_md_count: 3,
                mcp_count: 5,
                hooks_count: 4,
            }),
            usage: Some(UsageData {
                plan_name: Some("Max".to_string()),
                five_hour: Some(34),
                seven_day: Some(12),
                five_hour_reset_at: Some(now + Duration::hours(4)),
                seven_day_reset_at: Some(now + Duration::days(5)),
                api_unavailable: false,
            }),
            learning: Some(LearningStatus {
                recalled_this_session: true,
                learning_pending: false,
                auto_learn: true,
                last_learned_date: Some("yesterday".to_string()),
                instinct_status: Some(InstinctStatus {
                    active_count: 12,
                    promotable_count: 2,
                    corrections_this_session: 0,
                    unprocessed_observations: 3,
                }),
            }),
            now,
            home_dir: Some(PathBuf::from("/Users/dev")),
        }
    }
}
