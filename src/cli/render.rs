use std::io::{IsTerminal, Read, Write};

use anyhow::{Context, Result};

use crate::cli::output;
use crate::collect::{self, terminal};
use crate::config::{self, schema::FALLBACK_TERMINAL_WIDTH};
use crate::error::StatuslineError;
use crate::render::build_statusline_output;
use crate::session::SessionInput;

/// Upper bound on session JSON read from stdin.
const MAX_INPUT_BYTES: u64 = 1024 * 1024;

/// Read at most [`MAX_INPUT_BYTES`] from `reader` and parse the session.
pub fn read_session(reader: impl Read) -> Result<SessionInput, StatuslineError> {
    let mut buf = Vec::new();
    reader.take(MAX_INPUT_BYTES).read_to_end(&mut buf)?;
    serde_json::from_slice(&buf).map_err(StatuslineError::InvalidSession)
}

/// Render mode: session JSON on stdin, statusline on stdout.
pub fn run(width: Option<usize>) -> Result<()> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        output::info("ccsl reads session JSON on stdin; configure it as your statusLine command.");
        output::info("Run `ccsl preview` to see a demo or `ccsl setup --help` to configure it.");
        return Ok(());
    }

    let input = read_session(stdin.lock())?;
    let config = config::load();
    let snapshot = collect::gather(input, config.features)?;

    let term_width = terminal::detect_width(width).unwrap_or(FALLBACK_TERMINAL_WIDTH);
    let percent = snapshot.input.percent_used();
    let max_width = config.max_width(term_width, percent);
    tracing::info!(
        "terminal width {}, row budget {}, context {}%",
        term_width,
        max_width,
        percent
    );

    let rendered = build_statusline_output(&snapshot, &config, max_width, term_width);
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|()| stdout.flush())
        .context("failed to write statusline")?;
    Ok(())
}
