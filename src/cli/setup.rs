use anyhow::{Context, Result};
use clap::Args as ClapArgs;

use crate::cli::output;
use crate::config::schema::{FlexMode, LayoutPreset};
use crate::config::{self, StatuslineConfig};

/// Arguments for the `ccsl setup` subcommand. Options left out keep their
/// current value.
#[derive(ClapArgs, Default)]
pub struct Args {
    /// Replace the rows with a built-in layout
    #[arg(long, value_enum)]
    pub preset: Option<LayoutPreset>,

    /// Show the 5-hour rate-limit badge
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub usage: Option<bool>,

    /// Show learning-loop badges
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub learning: Option<bool>,

    /// Show the remote-control badge
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub remote_control: Option<bool>,

    /// How rows adapt to the terminal width
    #[arg(long, value_enum)]
    pub flex_mode: Option<FlexMode>,

    /// Context percentage at which full-until-compact switches padding
    #[arg(long, value_parser = clap::value_parser!(i64).range(60..=99))]
    pub compact_threshold: Option<i64>,

    /// Columns reserved once the compact threshold is reached
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=200))]
    pub flex_padding: Option<i64>,

    /// Print the resulting configuration instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

/// Apply the requested changes on top of `config`.
pub fn apply(mut config: StatuslineConfig, args: &Args) -> StatuslineConfig {
    if let Some(preset) = args.preset {
        config.layout = preset;
        config.rows = preset.rows();
    }
    if let Some(usage) = args.usage {
        config.features.usage = usage;
    }
    if let Some(learning) = args.learning {
        config.features.learning = learning;
    }
    if let Some(remote_control) = args.remote_control {
        config.features.remote_control = remote_control;
    }
    if let Some(flex_mode) = args.flex_mode {
        config.flex_mode = Some(flex_mode);
    }
    if let Some(threshold) = args.compact_threshold {
        config.compact_threshold = threshold;
    }
    if let Some(padding) = args.flex_padding {
        config.flex_padding = padding;
    }
    config
}

pub fn run(args: Args) -> Result<()> {
    let path = config::config_path().context("could not determine the home directory")?;
    let current = config::load_from(&path);
    let updated = apply(current, &args);

    if args.dry_run {
        println!("{}", config::to_json(&updated)?);
        return Ok(());
    }

    config::save(&updated, &path)?;
    output::success(&format!("Wrote {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: Args,
    }

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["setup"];
        full.extend_from_slice(argv);
        Harness::try_parse_from(full).unwrap().args
    }

    #[test]
    fn test_no_flags_keep_config() {
        let config = StatuslineConfig::from_preset(LayoutPreset::Semantic);
        assert_eq!(apply(config.clone(), &Args::default()), config);
    }

    #[test]
    fn test_flags_apply() {
        let args = parse(&[
            "--preset",
            "adaptive",
            "--usage",
            "--learning",
            "false",
            "--flex-mode",
            "full-minus-40",
            "--compact-threshold",
            "70",
        ]);
        let mut start = StatuslineConfig::default();
        start.features.learning = true;
        let config = apply(start, &args);
        assert_eq!(config.layout, LayoutPreset::Adaptive);
        assert_eq!(config.rows, LayoutPreset::Adaptive.rows());
        assert!(config.features.usage);
        assert!(!config.features.learning);
        assert!(!config.features.remote_control);
        assert_eq!(config.flex_mode, Some(FlexMode::FullMinus40));
        assert_eq!(config.compact_threshold, 70);
        assert_eq!(config.flex_padding, 50);
    }

    #[test]
    fn test_ranges_validated() {
        let harness = |argv: &[&str]| {
            let mut full = vec!["setup"];
            full.extend_from_slice(argv);
            Harness::try_parse_from(full)
        };
        assert!(harness(&["--compact-threshold", "59"]).is_err());
        assert!(harness(&["--compact-threshold", "100"]).is_err());
        assert!(harness(&["--flex-padding", "201"]).is_err());
        assert!(harness(&["--flex-padding", "0"]).is_ok());
        assert!(harness(&["--flex-mode", "sideways"]).is_err());
    }
}
