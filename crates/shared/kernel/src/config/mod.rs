mod raw;

pub use raw::RawDeviceConfig;

use crate::{ConfigError, ConfigErrorExt};
use config::{Config, Environment, File, FileFormat, Map, Value};
use gauge_domain::DeviceConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File looked up when no path is given; the extension is resolved by the `config` crate.
pub const DEFAULT_CONFIG_FILE: &str = "device";

/// Prefix of environment overrides, e.g. `GAUGE__MQTT_PORT=8883`.
pub const ENV_PREFIX: &str = "GAUGE";

const ENV_SEPARATOR: &str = "__";

/// Document format of an in-memory source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Toml,
    Json,
    Yaml,
}

impl From<SourceFormat> for FileFormat {
    fn from(format: SourceFormat) -> Self {
        match format {
            SourceFormat::Toml => Self::Toml,
            SourceFormat::Json => Self::Json,
            SourceFormat::Yaml => Self::Yaml,
        }
    }
}

/// Layered loader for the device configuration.
///
/// Sources are merged in this order, later ones overriding earlier keys:
/// 1. **File**: a document on disk (`device.toml`, `device.yaml`, ...).
/// 2. **Inline**: an in-memory document, mostly useful in tests and tooling.
/// 3. **Environment**: variables prefixed with `GAUGE__` (disable with
///    [`ConfigLoader::without_env`]).
///
/// The merged document is validated as a whole; see [`RawDeviceConfig::validate`].
#[must_use = "loaders do nothing unless you call .load()"]
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    inline: Option<(String, SourceFormat)>,
    env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self { file: None, inline: None, env: true }
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a required configuration file.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Adds an in-memory document.
    pub fn inline(mut self, document: impl Into<String>, format: SourceFormat) -> Self {
        self.inline = Some((document.into(), format));
        self
    }

    /// Ignores the process environment entirely.
    pub fn without_env(mut self) -> Self {
        self.env = false;
        self
    }

    /// Merges the sources and validates the result.
    ///
    /// # Errors
    /// * [`ConfigError::Source`] if the file is missing or a document cannot be parsed.
    /// * [`ConfigError::MissingField`] / [`ConfigError::InvalidValue`] from validation.
    pub fn load(&self) -> Result<DeviceConfig, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = &self.file {
            info!(path = %path.display(), "Loading device configuration");
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }

        if let Some((document, format)) = &self.inline {
            debug!(?format, "Adding inline configuration source");
            builder = builder.add_source(File::from_str(document, FileFormat::from(*format)));
        }

        if self.env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR),
            );
        }

        let merged = builder.build().context("Failed to build configuration sources")?;
        warn_unknown_keys(&merged);

        let raw = merged.try_deserialize::<RawDeviceConfig>().map_err(document_error)?;

        let config = raw.validate()?;

        debug!(
            broker = %config.broker_address(),
            topic = %config.mqtt_topic,
            interval_seconds = config.report_interval_seconds,
            "Device configuration loaded"
        );

        Ok(config)
    }
}

fn warn_unknown_keys(merged: &Config) {
    let Ok(table) = merged.clone().try_deserialize::<Map<String, Value>>() else {
        return;
    };

    for key in table.keys().filter(|key| RawDeviceConfig::field_name(key).is_none()) {
        warn!(key = %key, "Ignoring unknown configuration key");
    }
}

/// Maps a type mismatch on a known key to that field; anything else is a source error.
fn document_error(err: config::ConfigError) -> ConfigError {
    if let config::ConfigError::Type { key: Some(key), unexpected, expected, .. } = &err
        && let Some(field) = RawDeviceConfig::field_name(key)
    {
        return ConfigError::invalid(field, format!("expected {expected}, found {unexpected}"));
    }

    let context = Some("Failed to read configuration document".into());
    ConfigError::Source { source: err, context }
}

/// Loads the device configuration from a file plus `GAUGE__*` environment overrides.
///
/// If no path is provided, it defaults to `device` in the working directory.
///
/// # Errors
/// This function will return an error if:
/// * The specified (or default) configuration file cannot be found or parsed.
/// * A required field is absent ([`ConfigError::MissingField`]).
/// * A field fails validation ([`ConfigError::InvalidValue`]).
///
/// # Example
/// ```rust,no_run
/// use gauge_kernel::config::load_config;
///
/// let cfg = load_config(Some("config/device.toml"))?;
/// assert!(cfg.report_interval_seconds > 0);
/// # Ok::<(), gauge_kernel::ConfigError>(())
/// ```
pub fn load_config(path: Option<impl AsRef<Path>>) -> Result<DeviceConfig, ConfigError> {
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    ConfigLoader::new().file(effective_path).load()
}
