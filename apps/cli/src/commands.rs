use anyhow::{Context, Result, bail};
use gauge_kernel::config::load_config;
use gauge_kernel::legacy;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::info;

pub(crate) fn check(config: Option<&Path>) -> Result<()> {
    let cfg = load_config(config).context("Configuration is invalid")?;

    info!(
        broker = %cfg.broker_address(),
        topic = %cfg.mqtt_topic,
        interval = cfg.report_interval_seconds,
        "configuration is valid"
    );
    Ok(())
}

pub(crate) fn show(config: Option<&Path>) -> Result<()> {
    let cfg = load_config(config).context("Configuration is invalid")?;
    println!("{cfg}");
    Ok(())
}

pub(crate) fn migrate(header: &Path, output: Option<&Path>, force: bool) -> Result<()> {
    let raw = legacy::import_header(header)?;

    // Refuse to emit a document that would not load.
    raw.clone().validate().context("Legacy header does not describe a valid configuration")?;
    let document = raw.to_toml()?;

    match output {
        Some(path) => {
            write_new(path, &document, force)?;
            info!(from = %header.display(), to = %path.display(), "legacy header migrated");
        },
        None => print!("{document}"),
    }

    Ok(())
}

fn write_new(path: &Path, document: &str, force: bool) -> Result<()> {
    let mut options = OpenOptions::new();
    if force {
        options.write(true).create(true).truncate(true);
    } else {
        options.write(true).create_new(true);
    }

    let mut file = match options.open(path) {
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            bail!("{} already exists (pass --force to overwrite)", path.display());
        },
        opened => opened.with_context(|| format!("Failed to create {}", path.display()))?,
    };

    file.write_all(document.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))
}
