pub mod output;
pub mod preview;
pub mod render;
pub mod setup;

use clap::{Parser, Subcommand, ValueEnum};

/// Multi-row terminal statusline for coding-assistant sessions.
///
/// With no subcommand, reads the session JSON from stdin and prints the
/// statusline.
#[derive(Parser)]
#[command(name = "ccsl", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Override the detected terminal width (0 disables wrapping)
    #[arg(long, global = true)]
    pub width: Option<usize>,

    /// Logging verbosity for stderr
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Off)]
    pub log_level: LogLevel,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a demo session with your configuration
    Preview(preview::Args),

    /// Write the statusline configuration
    Setup(setup::Args),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    fn filter(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

/// Initialize tracing to stderr. Stdout belongs to the statusline itself.
pub fn init_logging(level: LogLevel) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(level.filter())
        .try_init();
}
