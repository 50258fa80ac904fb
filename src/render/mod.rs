//! Turns a [`Snapshot`] into terminal-ready statusline text. Everything in
//! here is pure: no clocks, files, or environment.

pub mod ansi;
pub mod badge;
pub mod format;
pub mod groups;
pub mod layout;

use crate::config::schema::StatuslineConfig;
use crate::session::Snapshot;

use ansi::{
    harden_spaces, strip_emojis, CLEAR_LINE_WITH_DEFAULT_BG, ERASE_TO_EOL, RESET, RESET_BG,
    RESET_FG,
};

/// Terminals narrower than this get ASCII stand-ins for emoji.
const NARROW_TERMINAL: usize = 80;

/// Render the full statusline.
///
/// `max_width` is the per-row column budget (0 disables wrapping) and
/// `term_width` the detected terminal width (0 when unknown). The result
/// always ends with a newline.
pub fn build_statusline_output(
    snapshot: &Snapshot,
    config: &StatuslineConfig,
    max_width: usize,
    term_width: usize,
) -> String {
    let narrow = term_width > 0 && term_width < NARROW_TERMINAL;
    let lines: Vec<String> = layout::build_rows(snapshot, config, max_width)
        .into_iter()
        .map(|line| {
            let line = if narrow { strip_emojis(&line) } else { line };
            let line = format!("{}{}{}", line, RESET, ERASE_TO_EOL);
            format!("{}{}", RESET, harden_spaces(&line))
        })
        .collect();

    let mut output = format!(
        "{}{}{}{}{}",
        CLEAR_LINE_WITH_DEFAULT_BG,
        lines.join("\n"),
        RESET,
        RESET_BG,
        RESET_FG
    );
    if !output.contains('\n') {
        output.push('\n');
    }
    output
}
