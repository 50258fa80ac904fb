mod cli;
mod collect;
mod config;
mod error;
mod render;
mod session;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.log_level);

    match cli.command {
        None => cli::render::run(cli.width),
        Some(Command::Preview(args)) => cli::preview::run(args, cli.width),
        Some(Command::Setup(args)) => cli::setup::run(args),
    }
}
