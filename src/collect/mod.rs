//! Enrichment collectors. Each one resolves to `Option<T>`: failures are
//! logged at debug level and simply leave the matching badges out.

pub mod config_counts;
pub mod git;
pub mod learning;
pub mod pr;
pub mod terminal;
pub mod transcript;
pub mod usage;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use tokio::process::Command;

use crate::config::schema::Features;
use crate::session::{SessionInput, Snapshot};

/// Upper bound for any single external command.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

/// Run `cmd` and return its trimmed stdout, or `None` if it fails to spawn,
/// exits non-zero, or outlives [`COMMAND_TIMEOUT`].
pub(crate) async fn command_stdout(mut cmd: Command) -> Option<String> {
    let program = format!("{:?}", cmd.as_std().get_program());
    cmd.stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::null())
        .kill_on_drop(true);

    match tokio::time::timeout(COMMAND_TIMEOUT, cmd.output()).await {
        Ok(Ok(output)) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
        }
        Ok(Ok(output)) => {
            tracing::debug!("{} exited with {}", program, output.status);
            None
        }
        Ok(Err(e)) => {
            tracing::debug!("failed to run {}: {}", program, e);
            None
        }
        Err(_) => {
            tracing::debug!("{} timed out after {:?}", program, COMMAND_TIMEOUT);
            None
        }
    }
}

/// Run a blocking file reader on the blocking pool; a panicked task counts
/// as "no data".
async fn blocking<T, F>(what: &'static str, f: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> Option<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("{} collector failed: {}", what, e);
            None
        }
    }
}

/// Gather every enrichment concurrently and assemble the render snapshot.
pub async fn enrich(
    input: SessionInput,
    features: Features,
    home: Option<PathBuf>,
    now: DateTime<Utc>,
) -> Snapshot {
    let project_dir = input.project_dir().to_string();
    let transcript_path = input.transcript_path.clone();

    let git_dir = project_dir.clone();
    let git_task = async move {
        if git_dir.is_empty() {
            return None;
        }
        git::repo_info(&git_dir).await
    };

    let transcript_task = blocking("transcript", move || {
        if transcript_path.is_empty() {
            return None;
        }
        transcript::read_transcript(Path::new(&transcript_path), now)
    });

    let counts_home = home.clone();
    let counts_dir = project_dir.clone();
    let counts_task = blocking("config counts", move || {
        let home = counts_home?;
        let cwd = (!counts_dir.is_empty()).then(|| PathBuf::from(&counts_dir));
        Some(config_counts::count_configs(&home, cwd.as_deref()))
    });

    let usage_home = home.clone();
    let usage_task = blocking("usage", move || {
        usage::read_usage_cache(&usage::cache_path(&usage_home?), now)
    });

    let (git, transcript, config_counts, usage) =
        tokio::join!(git_task, transcript_task, counts_task, usage_task);

    let pr = match &git {
        Some(_) => pr::pr_info(&project_dir).await,
        None => None,
    };

    let learning = match (&home, features.learning) {
        (Some(home), true) => {
            let claude_dir = home.join(".claude");
            let session_start = transcript.as_ref().and_then(|t| t.session_start);
            let today = now.with_timezone(&Local).date_naive();
            blocking("learning", move || {
                Some(learning::learning_status(&claude_dir, session_start, now, today))
            })
            .await
        }
        _ => None,
    };

    Snapshot {
        git,
        pr,
        transcript,
        config_counts,
        usage,
        learning,
        home_dir: home,
        ..Snapshot::new(input, now)
    }
}

/// Blocking entry point: spins up a runtime and runs [`enrich`].
pub fn gather(input: SessionInput, features: Features) -> Result<Snapshot> {
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    Ok(rt.block_on(enrich(input, features, dirs::home_dir(), Utc::now())))
}
