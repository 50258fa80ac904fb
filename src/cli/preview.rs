use anyhow::Result;
use chrono::Utc;
use clap::Args as ClapArgs;

use crate::cli::output;
use crate::collect::terminal;
use crate::config::schema::{LayoutPreset, FALLBACK_TERMINAL_WIDTH};
use crate::config::{self, StatuslineConfig};
use crate::render::ansi::{truncate_to_width, CLEAR_LINE_WITH_DEFAULT_BG};
use crate::render::badge::{block_bar, CONTEXT_THRESHOLDS, USAGE_THRESHOLDS};
use crate::render::build_statusline_output;
use crate::session::Snapshot;

/// Widest frame drawn around the preview.
const MAX_FRAME_WIDTH: usize = 130;
const LEGEND_BAR_WIDTH: usize = 10;

/// Arguments for the `ccsl preview` subcommand.
#[derive(ClapArgs)]
pub struct Args {
    /// Preview a built-in layout instead of the configured rows
    #[arg(long, value_enum)]
    pub preset: Option<LayoutPreset>,
}

/// The configuration to preview: the user's, with its rows swapped for
/// `preset` when one is given.
pub fn preview_config(mut config: StatuslineConfig, preset: Option<LayoutPreset>) -> StatuslineConfig {
    if let Some(preset) = preset {
        config.layout = preset;
        config.rows = preset.rows();
    }
    config
}

/// Preview lines: the rendered demo statusline, indented and clipped to the
/// frame.
pub fn preview_lines(snapshot: &Snapshot, config: &StatuslineConfig, term_width: usize) -> Vec<String> {
    let frame = term_width.min(MAX_FRAME_WIDTH);
    let max_width = config.max_width(term_width, snapshot.input.percent_used());
    let rendered = build_statusline_output(snapshot, config, max_width, term_width);
    rendered
        .strip_prefix(CLEAR_LINE_WITH_DEFAULT_BG)
        .unwrap_or(&rendered)
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(|line| {
            let clipped = if frame > 2 {
                truncate_to_width(line, frame - 2)
            } else {
                line.to_string()
            };
            format!("  {}", clipped)
        })
        .collect()
}

fn legend(snapshot: &Snapshot) -> String {
    let context = snapshot.input.percent_used();
    let mut legend = format!(
        "  context {} {}%",
        block_bar(context, LEGEND_BAR_WIDTH, CONTEXT_THRESHOLDS),
        context
    );
    if let Some(five_hour) = snapshot.usage.as_ref().and_then(|u| u.five_hour) {
        legend.push_str(&format!(
            "   5h limit {} {}%",
            block_bar(five_hour, LEGEND_BAR_WIDTH, USAGE_THRESHOLDS),
            five_hour
        ));
    }
    legend
}

pub fn run(args: Args, width: Option<usize>) -> Result<()> {
    let config = preview_config(config::load(), args.preset);
    let snapshot = Snapshot::sample(Utc::now());
    let term_width = terminal::detect_width(width)
        .filter(|w| *w > 0)
        .unwrap_or(FALLBACK_TERMINAL_WIDTH);
    let frame = term_width.min(MAX_FRAME_WIDTH);

    output::rule_stdout(frame);
    output::label_stdout(&format!("  Preview ({} layout):", config.layout.name()));
    println!();
    for line in preview_lines(&snapshot, &config, term_width) {
        println!("{}", line);
    }
    println!();
    println!("{}", legend(&snapshot));
    output::rule_stdout(frame);
    Ok(())
}
