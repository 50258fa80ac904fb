//! Folds the session transcript (JSONL) into tool, agent, and todo
//! aggregates.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::session::{
    AgentEntry, AgentStatus, RunningTool, TodoItem, TodoStatus, ToolActivity, TranscriptData,
};

/// Only the most recent sub-agents are kept.
const MAX_AGENTS: usize = 10;
const BASH_TARGET_CHARS: usize = 30;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Line {
    timestamp: Option<String>,
    message: Option<Message>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Message {
    content: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    id: Option<String>,
    name: Option<String>,
    input: Value,
    tool_use_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Todo {
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    content: Option<String>,
    status: TodoStatus,
}

/// What a running tool is working on, by tool kind.
fn tool_target(name: &str, input: &Value) -> Option<String> {
    let field = |key: &str| input.get(key).and_then(Value::as_str);
    match name {
        "Read" | "Write" | "Edit" => field("file_path").or_else(|| field("path")).map(str::to_string),
        "Glob" | "Grep" => field("pattern").map(str::to_string),
        "Bash" => field("command").map(|cmd| {
            if cmd.chars().count() > BASH_TARGET_CHARS {
                let head: String = cmd.chars().take(BASH_TARGET_CHARS).collect();
                format!("{}...", head)
            } else {
                cmd.to_string()
            }
        }),
        _ => None,
    }
}

fn parse_todos(input: &Value) -> Option<Vec<TodoItem>> {
    let todos = input.get("todos")?.as_array()?;
    Some(
        todos
            .iter()
            .filter_map(|t| Todo::deserialize(t).ok())
            .map(|t| TodoItem {
                subject: t.subject.or(t.content).unwrap_or_default(),
                status: t.status,
            })
            .collect(),
    )
}

struct PendingTool {
    name: String,
    target: Option<String>,
}

/// Accumulator for one pass over the transcript.
#[derive(Default)]
struct Fold {
    session_start: Option<DateTime<Utc>>,
    /// Open tool calls by id, in call order.
    pending: Vec<(String, PendingTool)>,
    completed: Vec<(String, u32)>,
    agents: Vec<AgentEntry>,
    agent_index: HashMap<String, usize>,
    todos: Vec<TodoItem>,
}

impl Fold {
    fn tool_use(&mut self, block: ContentBlock, at: DateTime<Utc>) {
        let (Some(id), Some(name)) = (block.id, block.name) else {
            return;
        };
        match name.as_str() {
            "Task" => {
                let text = |key: &str| block.input.get(key).and_then(Value::as_str).map(str::to_string);
                let agent = AgentEntry {
                    id: id.clone(),
                    agent_type: text("subagent_type").unwrap_or_else(|| "unknown".to_string()),
                    model: text("model"),
                    description: text("description"),
                    status: AgentStatus::Running,
                    start_time: at,
                    end_time: None,
                };
                // A re-sent call replaces the earlier entry and keeps its slot.
                match self.agent_index.get(&id) {
                    Some(&idx) => self.agents[idx] = agent,
                    None => {
                        self.agent_index.insert(id, self.agents.len());
                        self.agents.push(agent);
                    }
                }
            }
            "TodoWrite" => {
                if let Some(todos) = parse_todos(&block.input) {
                    self.todos = todos;
                }
            }
            _ => {
                let tool = PendingTool {
                    target: tool_target(&name, &block.input),
                    name,
                };
                match self.pending.iter_mut().find(|(pending_id, _)| *pending_id == id) {
                    Some((_, slot)) => *slot = tool,
                    None => self.pending.push((id, tool)),
                }
            }
        }
    }

    fn tool_result(&mut self, tool_use_id: &str, at: DateTime<Utc>) {
        if let Some(pos) = self.pending.iter().position(|(id, _)| id == tool_use_id) {
            let (_, tool) = self.pending.remove(pos);
            match self.completed.iter_mut().find(|(name, _)| *name == tool.name) {
                Some((_, count)) => *count += 1,
                None => self.completed.push((tool.name, 1)),
            }
        }
        if let Some(&idx) = self.agent_index.get(tool_use_id) {
            let agent = &mut self.agents[idx];
            agent.status = AgentStatus::Completed;
            agent.end_time = Some(at);
        }
    }

    fn line(&mut self, line: Line, now: DateTime<Utc>) {
        let stamp = line
            .timestamp
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc));
        if self.session_start.is_none() {
            self.session_start = stamp;
        }
        let at = stamp.unwrap_or(now);

        let Some(Value::Array(blocks)) = line.message.map(|m| m.content) else {
            return;
        };
        for block in &blocks {
            let Ok(block) = ContentBlock::deserialize(block) else {
                continue;
            };
            match block.kind.as_str() {
                "tool_use" => self.tool_use(block, at),
                "tool_result" => {
                    if let Some(id) = block.tool_use_id.as_deref() {
                        self.tool_result(id, at);
                    }
                }
                _ => {}
            }
        }
    }

    fn finish(self) -> TranscriptData {
        let skip = self.agents.len().saturating_sub(MAX_AGENTS);
        TranscriptData {
            tools: ToolActivity {
                running: self
                    .pending
                    .into_iter()
                    .map(|(_, t)| RunningTool {
                        name: t.name,
                        target: t.target,
                    })
                    .collect(),
                completed: self.completed,
            },
            agents: self.agents.into_iter().skip(skip).collect(),
            todos: self.todos,
            session_start: self.session_start,
            remote_control_active: false,
        }
    }
}

/// Fold a transcript stream. Blank and malformed lines are skipped; lines
/// without a timestamp are stamped with `now`.
pub fn parse_transcript<R: BufRead>(reader: R, now: DateTime<Utc>) -> TranscriptData {
    let mut fold = Fold::default();
    for line in reader.lines() {
        let Ok(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        if let Ok(parsed) = serde_json::from_str::<Line>(&line) {
            fold.line(parsed, now);
        }
    }
    fold.finish()
}

pub fn read_transcript(path: &Path, now: DateTime<Utc>) -> Option<TranscriptData> {
    match File::open(path) {
        Ok(file) => Some(parse_transcript(BufReader::new(file), now)),
        Err(e) => {
            tracing::debug!("cannot open transcript {}: {}", path.display(), e);
            None
        }
    }
}
