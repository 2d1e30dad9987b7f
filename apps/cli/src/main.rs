#![allow(clippy::print_stdout)]

mod args;
mod commands;

use crate::args::{Cli, Command};
use anyhow::Result;
use clap::Parser;
use gauge_logger::{LevelFilter, Logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let mut logger = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level);
    if let Some(dir) = &cli.log_dir {
        logger = logger.path(dir);
    }
    let _log = logger.init()?;

    match cli.command {
        Command::Check { config } => commands::check(config.as_deref()),
        Command::Show { config } => commands::show(config.as_deref()),
        Command::Migrate { header, output, force } => {
            commands::migrate(&header, output.as_deref(), force)
        },
    }
}
