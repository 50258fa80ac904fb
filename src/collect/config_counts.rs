use std::collections::BTreeSet;
use std::path::Path;

use serde_json::Value;

use crate::session::ConfigCounts;

fn read_json(path: &Path) -> Option<Value> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("ignoring malformed {}: {}", path.display(), e);
            None
        }
    }
}

fn object_keys(path: &Path, key: &str) -> BTreeSet<String> {
    read_json(path)
        .and_then(|v| v.get(key)?.as_object().map(|o| o.keys().cloned().collect()))
        .unwrap_or_default()
}

fn string_list(path: &Path, key: &str) -> BTreeSet<String> {
    read_json(path)
        .and_then(|v| {
            v.get(key)?.as_array().map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
        })
        .unwrap_or_default()
}

fn mcp_servers(path: &Path) -> BTreeSet<String> {
    object_keys(path, "mcpServers")
}

fn hook_events(path: &Path) -> u32 {
    object_keys(path, "hooks").len() as u32
}

/// Count CLAUDE.md files, enabled MCP servers, and hook events visible to a
/// session in `cwd`, across user and project scopes.
pub fn count_configs(home: &Path, cwd: Option<&Path>) -> ConfigCounts {
    let claude_dir = home.join(".claude");
    let mut counts = ConfigCounts::default();

    if claude_dir.join("CLAUDE.md").exists() {
        counts.claude_md_count += 1;
    }

    let user_settings = claude_dir.join("settings.json");
    let user_claude_json = home.join(".claude.json");
    let mut user_mcp = mcp_servers(&user_settings);
    user_mcp.extend(mcp_servers(&user_claude_json));
    for name in string_list(&user_claude_json, "disabledMcpServers") {
        user_mcp.remove(&name);
    }
    counts.hooks_count += hook_events(&user_settings);

    let mut project_mcp = BTreeSet::new();
    if let Some(cwd) = cwd {
        for file in [
            cwd.join("CLAUDE.md"),
            cwd.join("CLAUDE.local.md"),
            cwd.join(".claude").join("CLAUDE.md"),
            cwd.join(".claude").join("CLAUDE.local.md"),
        ] {
            if file.exists() {
                counts.claude_md_count += 1;
            }
        }

        let project_settings = cwd.join(".claude").join("settings.json");
        let local_settings = cwd.join(".claude").join("settings.local.json");
        project_mcp.extend(mcp_servers(&project_settings));
        project_mcp.extend(mcp_servers(&local_settings));
        counts.hooks_count += hook_events(&project_settings);
        counts.hooks_count += hook_events(&local_settings);

        let mut mcp_json = mcp_servers(&cwd.join(".mcp.json"));
        for name in string_list(&local_settings, "disabledMcpjsonServers") {
            mcp_json.remove(&name);
        }
        project_mcp.extend(mcp_json);
    }

    counts.mcp_count = (user_mcp.len() + project_mcp.len()) as u32;
    counts
}
