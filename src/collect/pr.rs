use serde::Deserialize;
use tokio::process::Command;

use super::command_stdout;
use crate::session::{PrInfo, PrState};

const GH_FIELDS: &str = "--json=number,url,title,isDraft,state,mergeStateStatus";

/// Shape of `gh pr view --json ...` output.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhPullRequest {
    number: u64,
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    is_draft: bool,
    #[serde(default)]
    state: Option<PrState>,
    #[serde(default)]
    merge_state_status: Option<String>,
}

pub fn parse_pr_json(json: &str) -> Option<PrInfo> {
    match serde_json::from_str::<GhPullRequest>(json) {
        Ok(pr) => Some(PrInfo {
            url: pr.url,
            number: pr.number.to_string(),
            title: pr.title,
            is_draft: pr.is_draft,
            state: pr.state,
            merge_state_status: pr.merge_state_status,
        }),
        Err(e) => {
            tracing::debug!("unexpected gh output: {}", e);
            None
        }
    }
}

/// Pull request for the branch checked out in `dir`, via the GitHub CLI.
pub async fn pr_info(dir: &str) -> Option<PrInfo> {
    if which::which("gh").is_err() {
        tracing::debug!("gh not on PATH; skipping PR lookup");
        return None;
    }
    let mut cmd = Command::new("gh");
    cmd.args(["pr", "view", GH_FIELDS]);
    if !dir.is_empty() {
        cmd.current_dir(dir);
    }
    let stdout = command_stdout(cmd).await?;
    parse_pr_json(&stdout)
}
