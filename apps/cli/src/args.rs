//! # CLI Argument Definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gauge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Validate, inspect and migrate follower gauge device configuration")]
pub(crate) struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write rolling log files into this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Load and validate a configuration file (GAUGE__* variables override it)
    Check {
        /// Configuration file; defaults to `device.*` in the working directory
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
    /// Print the effective configuration with secrets redacted
    Show {
        /// Configuration file; defaults to `device.*` in the working directory
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
    /// Convert a legacy `user_config.h` header into a TOML configuration
    Migrate {
        /// Header with `#define` constants
        header: PathBuf,

        /// Write the TOML here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Overwrite the output file if it exists
        #[arg(long, requires = "output")]
        force: bool,
    },
}
