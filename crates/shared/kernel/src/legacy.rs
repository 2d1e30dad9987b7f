//! Import of the `user_config.h` format used by the original firmware sketch.
//!
//! The header is a list of `#define NAME value` lines where `value` is either a
//! C string literal or a bare token:
//!
//! ```c
//! #define WIFI_SSID     "home"
//! #define MQTT_PORT     1883
//! #define DHTPIN        D4
//! ```
//!
//! Comments and preprocessor lines other than `#define` are ignored. Unknown names
//! are skipped with a warning so that sketch-specific extras do not block an import.

use crate::config::RawDeviceConfig;
use crate::{ConfigError, ConfigErrorExt};
use std::path::Path;
use tracing::{debug, info, warn};

const HEADER: &str = "header";

/// Reads a legacy header file.
///
/// # Errors
/// * [`ConfigError::Io`] if the file cannot be read.
/// * [`ConfigError::InvalidValue`] (field `header`) for a malformed `#define`.
pub fn import_header(path: impl AsRef<Path>) -> Result<RawDeviceConfig, ConfigError> {
    let path = path.as_ref();
    info!(path = %path.display(), "Importing legacy header");

    let text = std::fs::read_to_string(path)
        .context(format!("Failed to read legacy header {}", path.display()))?;
    parse_header(&text)
}

/// Parses the text of a legacy header.
///
/// The result is not validated; call [`RawDeviceConfig::validate`] on it.
///
/// # Errors
/// Returns [`ConfigError::InvalidValue`] (field `header`) for a `#define` that lacks a
/// name, has an unterminated string literal, or has trailing text after the literal.
pub fn parse_header(text: &str) -> Result<RawDeviceConfig, ConfigError> {
    let mut raw = RawDeviceConfig::default();

    for (index, line) in strip_comments(text).lines().enumerate() {
        let line_no = index + 1;
        let Some(rest) = line.trim().strip_prefix("#define") else {
            continue;
        };

        if !rest.starts_with(char::is_whitespace) {
            return Err(malformed(line_no, "expected whitespace after #define"));
        }

        let rest = rest.trim();
        let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if name.is_empty() {
            return Err(malformed(line_no, "missing macro name"));
        }

        let value = parse_value(value.trim()).map_err(|reason| malformed(line_no, reason))?;
        assign(&mut raw, name, value, line_no)?;
    }

    Ok(raw)
}

fn assign(
    raw: &mut RawDeviceConfig,
    name: &str,
    value: String,
    line_no: usize,
) -> Result<(), ConfigError> {
    let slot = match name {
        "WIFI_SSID" => &mut raw.wifi_ssid,
        "INSTAGRAM_FINGERPRINT" => &mut raw.instagram_fingerprint,
        "USER_ID" => &mut raw.user_id,
        "USER_NAME" => &mut raw.user_name,
        "MQTT_SERVER" => &mut raw.mqtt_server,
        "MQTT_PORT" => &mut raw.mqtt_port,
        "MQTT_USER" => &mut raw.mqtt_user,
        "MQTT_TOPIC" => &mut raw.mqtt_topic,
        "DHTPIN" => &mut raw.dht_pin,
        "DHTTYPE" => &mut raw.dht_type,
        "REPORT_INTERVAL" => &mut raw.report_interval_seconds,
        "WIFI_PASSWORD" => return assign_secret(&mut raw.wifi_password, name, value, line_no),
        "API_ACCESS_TOKEN" => {
            return assign_secret(&mut raw.api_access_token, name, value, line_no);
        },
        "MQTT_PASSWORD" => return assign_secret(&mut raw.mqtt_password, name, value, line_no),
        _ => {
            warn!(line = line_no, name, "Skipping unknown define");
            return Ok(());
        },
    };

    if value.is_empty() {
        return Err(malformed(line_no, format!("{name} has no value")));
    }
    if slot.replace(value).is_some() {
        warn!(line = line_no, name, "Define repeated; the last value wins");
    }
    debug!(line = line_no, name, "Imported define");
    Ok(())
}

fn assign_secret(
    slot: &mut Option<gauge_domain::Secret>,
    name: &str,
    value: String,
    line_no: usize,
) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(malformed(line_no, format!("{name} has no value")));
    }
    if slot.replace(value.into()).is_some() {
        warn!(line = line_no, name, "Define repeated; the last value wins");
    }
    debug!(line = line_no, name, "Imported define");
    Ok(())
}

/// Decodes a C string literal or returns a bare token as-is.
fn parse_value(value: &str) -> Result<String, String> {
    let Some(body) = value.strip_prefix('"') else {
        return Ok(value.to_owned());
    };

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                let trailing = chars.as_str().trim();
                if !trailing.is_empty() {
                    return Err(format!("unexpected `{trailing}` after string literal"));
                }
                return Ok(out);
            },
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => break,
            },
            other => out.push(other),
        }
    }

    Err("unterminated string literal".to_owned())
}

/// Removes `//` and `/* */` comments outside string literals, keeping line breaks.
fn strip_comments(text: &str) -> String {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum State {
        Code,
        Str,
        Escape,
        Line,
        Block,
    }

    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        state = match (state, c) {
            (State::Code, '/') if chars.peek() == Some(&'/') => {
                chars.next();
                State::Line
            },
            (State::Code, '/') if chars.peek() == Some(&'*') => {
                chars.next();
                State::Block
            },
            (State::Code, '"') => {
                out.push(c);
                State::Str
            },
            (State::Str, '\\') => {
                out.push(c);
                State::Escape
            },
            (State::Str, '"') | (State::Escape, _) => {
                out.push(c);
                if state == State::Escape { State::Str } else { State::Code }
            },
            (State::Line | State::Block, '\n') => {
                out.push('\n');
                if state == State::Line { State::Code } else { State::Block }
            },
            (State::Block, '*') if chars.peek() == Some(&'/') => {
                chars.next();
                out.push(' ');
                State::Code
            },
            (State::Line | State::Block, _) => state,
            (State::Code | State::Str, _) => {
                out.push(c);
                state
            },
        };
    }

    out
}

fn malformed(line_no: usize, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::invalid(HEADER, format!("line {line_no}: {reason}"))
}
