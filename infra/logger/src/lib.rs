//! # Logger
//!
//! Installs the process-wide `tracing` subscriber used by the gauge tools.
//!
//! * Console output goes to **stderr**, so command output on stdout stays pipeable.
//! * An optional log directory adds a rolling file (`<name>.<date>.log`) written
//!   through a non-blocking worker, optionally as JSON lines.
//! * `RUST_LOG` overrides the programmatic level.
//! * Colours are only used when stderr is a terminal.
//!
//! ## Example
//!
//! ```rust
//! # use gauge_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder()
//!     .name("gauge")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const DEFAULT_MAX_FILES: usize = 7;
const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug)]
struct LoggerConfig {
    name: String,
    console: bool,
    level: LevelFilter,
    path: Option<PathBuf>,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

/// A builder for configuring and initializing the global tracing subscriber.
#[must_use = "The builder must be configured before it can be used to initialize the logger."]
#[derive(Debug)]
pub struct LoggerBuilder {
    config: LoggerConfig,
}

impl LoggerBuilder {
    /// Sets the logger name, used as the log file prefix.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Sets the default level; `RUST_LOG` still takes precedence.
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Enables or disables console output on stderr.
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Writes rolling log files into `path` (created if missing).
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = Some(path.into());
        self
    }

    /// Log file rotation strategy (daily by default).
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Maximum number of rotated files to keep.
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    /// Writes file output as JSON lines.
    pub const fn json(mut self, enabled: bool) -> Self {
        self.config.json = enabled;
        self
    }

    /// Consumes the builder and installs the global subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle. Keep it alive for the duration of the program: it owns
    /// the worker that flushes file output.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, zero `max_files`,
    ///   or when neither console nor file output is enabled.
    /// * [`LoggerError::Io`] / [`LoggerError::Appender`] if the log directory is unusable.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already set.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let config = self.config;
        validate(&config)?;

        let filter =
            EnvFilter::builder().with_default_directive(config.level.into()).from_env_lossy();

        let mut layers = Vec::new();

        if config.console {
            let ansi = std::io::stderr().is_terminal();
            let console = fmt::layer().compact().with_ansi(ansi).with_writer(std::io::stderr);
            layers.push(console.boxed());
        }

        let guard = if let Some(path) = &config.path {
            fs::create_dir_all(path)
                .context(format!("Failed to create log directory {}", path.display()))?;

            let appender = RollingFileAppender::builder()
                .rotation(config.rotation.clone())
                .filename_prefix(&config.name)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(config.max_files)
                .build(path)?;

            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false);
            layers.push(if config.json { file_layer.json().boxed() } else { file_layer.boxed() });
            Some(guard)
        } else {
            None
        };

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

fn validate(config: &LoggerConfig) -> Result<(), LoggerError> {
    let problem = if config.name.trim().is_empty() {
        "Logger name cannot be empty"
    } else if config.max_files == 0 {
        "max_files must be greater than zero"
    } else if !config.console && config.path.is_none() {
        "No logging output enabled. Enable console or file output."
    } else {
        return Ok(());
    };

    Err(LoggerError::InvalidConfiguration { message: problem.into(), context: None })
}

/// A handle to the initialized logging system.
#[must_use = "Dropping this handle stops the background file writer."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`] with console output at `INFO`.
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder {
            config: LoggerConfig {
                name: env!("CARGO_PKG_NAME").to_owned(),
                console: true,
                level: LevelFilter::INFO,
                path: None,
                rotation: Rotation::DAILY,
                max_files: DEFAULT_MAX_FILES,
                json: false,
            },
        }
    }

    /// Whether a file writer is attached.
    #[must_use]
    pub const fn has_file_output(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Logging system shutting down, flushing buffers");
        }
    }
}
