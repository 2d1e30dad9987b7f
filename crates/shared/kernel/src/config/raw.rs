use crate::ConfigError;
use gauge_domain::{DEFAULT_MQTT_PORT, DeviceConfig, DeviceConfigInner, Secret};
use serde::{Deserialize, Serialize};
use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

/// The configuration document as found in a source, before validation.
///
/// Every key is optional here; numbers are kept as text so that a malformed value
/// surfaces as [`ConfigError::InvalidValue`] for its own field instead of a
/// document-level parse failure.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawDeviceConfig {
    pub wifi_ssid: Option<String>,
    pub wifi_password: Option<Secret>,
    pub instagram_fingerprint: Option<String>,
    pub api_access_token: Option<Secret>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub mqtt_server: Option<String>,
    pub mqtt_port: Option<String>,
    pub mqtt_user: Option<String>,
    pub mqtt_password: Option<Secret>,
    pub mqtt_topic: Option<String>,
    pub dht_pin: Option<String>,
    pub dht_type: Option<String>,
    pub report_interval_seconds: Option<String>,
}

impl RawDeviceConfig {
    /// Keys understood by the loader, in validation order.
    pub const FIELDS: [&'static str; 14] = [
        "wifi_ssid",
        "wifi_password",
        "instagram_fingerprint",
        "api_access_token",
        "user_id",
        "user_name",
        "mqtt_server",
        "mqtt_port",
        "mqtt_user",
        "mqtt_password",
        "mqtt_topic",
        "dht_pin",
        "dht_type",
        "report_interval_seconds",
    ];

    /// Resolves a source key (possibly a nested path) to the field it belongs to.
    #[must_use]
    pub fn field_name(key: &str) -> Option<&'static str> {
        let head = key.split(['.', '[']).next()?;
        Self::FIELDS.into_iter().find(|field| field.eq_ignore_ascii_case(head))
    }

    /// Checks every field in declaration order and builds the immutable record.
    ///
    /// # Errors
    /// * [`ConfigError::MissingField`] for the first required key that is absent.
    /// * [`ConfigError::InvalidValue`] for the first key that is empty, malformed or
    ///   out of range.
    pub fn validate(self) -> Result<DeviceConfig, ConfigError> {
        let inner = DeviceConfigInner {
            wifi_ssid: required("wifi_ssid", self.wifi_ssid)?,
            wifi_password: required_secret("wifi_password", self.wifi_password)?,
            instagram_fingerprint: parsed("instagram_fingerprint", self.instagram_fingerprint)?,
            api_access_token: required_secret("api_access_token", self.api_access_token)?,
            user_id: required("user_id", self.user_id)?,
            user_name: self.user_name.filter(|name| !name.trim().is_empty()),
            mqtt_server: required("mqtt_server", self.mqtt_server)?,
            mqtt_port: port(self.mqtt_port)?,
            mqtt_user: required("mqtt_user", self.mqtt_user)?,
            mqtt_password: required_secret("mqtt_password", self.mqtt_password)?,
            mqtt_topic: required("mqtt_topic", self.mqtt_topic)?,
            dht_pin: parsed("dht_pin", self.dht_pin)?,
            dht_type: parsed("dht_type", self.dht_type)?,
            report_interval_seconds: interval(self.report_interval_seconds)?,
        };

        Ok(DeviceConfig::new(inner))
    }

    /// Renders the document as TOML, numbers as integers where they parse.
    ///
    /// Secret values are written in clear: the output is meant for a local,
    /// untracked `device.toml`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Render`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let document = TomlDocument {
            wifi_ssid: self.wifi_ssid.as_deref(),
            wifi_password: self.wifi_password.as_ref().map(Secret::expose),
            instagram_fingerprint: self.instagram_fingerprint.as_deref(),
            api_access_token: self.api_access_token.as_ref().map(Secret::expose),
            user_id: self.user_id.as_deref(),
            user_name: self.user_name.as_deref(),
            mqtt_server: self.mqtt_server.as_deref(),
            mqtt_port: self.mqtt_port.as_deref().map(TomlScalar::from),
            mqtt_user: self.mqtt_user.as_deref(),
            mqtt_password: self.mqtt_password.as_ref().map(Secret::expose),
            mqtt_topic: self.mqtt_topic.as_deref(),
            dht_pin: self.dht_pin.as_deref(),
            dht_type: self.dht_type.as_deref(),
            report_interval_seconds: self.report_interval_seconds.as_deref().map(TomlScalar::from),
        };

        Ok(toml::to_string(&document)?)
    }
}

#[derive(Serialize)]
struct TomlDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    wifi_ssid: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wifi_password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instagram_fingerprint: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_access_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mqtt_server: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mqtt_port: Option<TomlScalar<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mqtt_user: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mqtt_password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mqtt_topic: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dht_pin: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dht_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report_interval_seconds: Option<TomlScalar<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum TomlScalar<'a> {
    Integer(i64),
    Text(&'a str),
}

impl<'a> From<&'a str> for TomlScalar<'a> {
    fn from(value: &'a str) -> Self {
        value.trim().parse().map_or(Self::Text(value), Self::Integer)
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    let value = value.ok_or_else(|| ConfigError::missing(field))?;
    if value.trim().is_empty() {
        return Err(ConfigError::invalid(field, "must not be empty"));
    }
    Ok(value)
}

fn required_secret(field: &'static str, value: Option<Secret>) -> Result<Secret, ConfigError> {
    let value = value.ok_or_else(|| ConfigError::missing(field))?;
    if value.expose().trim().is_empty() {
        return Err(ConfigError::invalid(field, "must not be empty"));
    }
    Ok(value)
}

fn parsed<T>(field: &'static str, value: Option<String>) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = required(field, value)?;
    value.trim().parse().map_err(|e: T::Err| ConfigError::invalid(field, e.to_string()))
}

fn integer(field: &'static str, value: &str) -> Result<i128, ConfigError> {
    let text = value.trim();
    text.parse().map_err(|e: ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ConfigError::invalid(field, format!("`{text}` is out of range"))
        },
        _ => ConfigError::invalid(field, format!("`{text}` is not an integer")),
    })
}

fn port(value: Option<String>) -> Result<u16, ConfigError> {
    const FIELD: &str = "mqtt_port";

    let Some(value) = value else {
        return Ok(DEFAULT_MQTT_PORT);
    };

    let number = integer(FIELD, &value)?;
    u16::try_from(number).ok().filter(|port| *port != 0).ok_or_else(|| {
        ConfigError::invalid(FIELD, format!("must be between 1 and 65535, got {number}"))
    })
}

fn interval(value: Option<String>) -> Result<u64, ConfigError> {
    const FIELD: &str = "report_interval_seconds";

    let value = required(FIELD, value)?;
    let number = integer(FIELD, &value)?;
    if number <= 0 {
        return Err(ConfigError::invalid(FIELD, format!("must be greater than zero, got {number}")));
    }
    u64::try_from(number).map_err(|_| {
        ConfigError::invalid(FIELD, format!("must be at most {}, got {number}", u64::MAX))
    })
}
