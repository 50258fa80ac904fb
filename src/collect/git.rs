use std::path::{Path, PathBuf};

use tokio::process::Command;

use super::command_stdout;
use crate::session::{GitFileStats, GitRepoInfo};

async fn git(dir: &str, args: &[&str]) -> Option<String> {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(dir).args(args);
    command_stdout(cmd).await
}

/// Classify `git status --porcelain` lines by their two-letter status code.
pub fn parse_porcelain(stdout: &str) -> GitFileStats {
    let mut stats = GitFileStats::default();
    for line in stdout.lines().filter(|l| !l.is_empty()) {
        let code: String = line.chars().take(2).collect();
        if code.contains('?') {
            stats.untracked += 1;
        } else if code.contains('A') {
            stats.added += 1;
        } else if code.contains('D') {
            stats.deleted += 1;
        } else if code.contains(['M', 'R', 'C']) {
            stats.modified += 1;
        }
    }
    stats
}

fn last_component(path: &str) -> Option<String> {
    path.trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Repository name for a linked worktree, from the shared `.git` directory.
pub fn repo_name_from_common_dir(common_dir: &str) -> Option<String> {
    let trimmed = common_dir.trim().trim_end_matches('/');
    let parent = trimmed.strip_suffix(".git")?;
    last_component(parent.strip_suffix('/').unwrap_or(parent))
}

async fn file_stats(dir: &str) -> GitFileStats {
    git(dir, &["status", "--porcelain"])
        .await
        .map(|out| parse_porcelain(&out))
        .unwrap_or_default()
}

async fn ahead_behind(dir: &str) -> (u32, u32) {
    let (ahead, behind) = tokio::join!(
        git(dir, &["rev-list", "--count", "@{u}..HEAD"]),
        git(dir, &["rev-list", "--count", "HEAD..@{u}"]),
    );
    match (ahead, behind) {
        (Some(a), Some(b)) => (a.parse().unwrap_or(0), b.parse().unwrap_or(0)),
        _ => (0, 0),
    }
}

/// `git rev-parse` prints some paths relative to `dir`; anchor and
/// canonicalize them so they compare equal whatever subdirectory `dir` is.
fn resolve_against(dir: &str, path: &str) -> PathBuf {
    let joined = Path::new(dir).join(path.trim());
    std::fs::canonicalize(&joined).unwrap_or(joined)
}

/// The shared git dir when `dir` is inside a linked worktree.
async fn linked_common_dir(dir: &str) -> Option<String> {
    let (git_dir, common_dir) = tokio::join!(
        git(dir, &["rev-parse", "--git-dir"]),
        git(dir, &["rev-parse", "--git-common-dir"]),
    );
    let git_dir = resolve_against(dir, &git_dir?);
    let common_dir = resolve_against(dir, &common_dir?);
    (git_dir != common_dir).then(|| common_dir.to_string_lossy().into_owned())
}

/// Inspect the repository containing `dir`. `None` outside a repository.
pub async fn repo_info(dir: &str) -> Option<GitRepoInfo> {
    let toplevel = git(dir, &["rev-parse", "--show-toplevel"]).await?;

    let (file_stats, (ahead, behind), common_dir, branch) = tokio::join!(
        file_stats(dir),
        ahead_behind(dir),
        linked_common_dir(dir),
        git(dir, &["rev-parse", "--abbrev-ref", "HEAD"]),
    );

    if let Some(repo) = common_dir.as_deref().and_then(repo_name_from_common_dir) {
        return Some(GitRepoInfo {
            repo,
            worktree: last_component(&toplevel),
            branch: None,
            ahead,
            behind,
            file_stats,
        });
    }

    Some(GitRepoInfo {
        repo: last_component(&toplevel)?,
        worktree: None,
        branch: branch.filter(|b| !b.is_empty()),
        ahead,
        behind,
        file_stats,
    })
}
