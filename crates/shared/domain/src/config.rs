use crate::{Fingerprint, Secret, SensorModel, SensorPin};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

/// Broker port used when the source does not name one.
pub const DEFAULT_MQTT_PORT: u16 = 1883;

/// Every setting the device needs at startup, already validated.
///
/// The typed fields enforce value formats; record-level rules such as non-empty
/// strings, a non-zero port and a positive interval are checked by the loader in
/// `gauge-kernel`. A record assembled by hand through [`DeviceConfig::new`] is
/// taken as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfigInner {
    pub wifi_ssid: String,
    pub wifi_password: Secret,
    pub instagram_fingerprint: Fingerprint,
    pub api_access_token: Secret,
    pub user_id: String,
    pub user_name: Option<String>,
    pub mqtt_server: String,
    pub mqtt_port: u16,
    pub mqtt_user: String,
    pub mqtt_password: Secret,
    pub mqtt_topic: String,
    pub dht_pin: SensorPin,
    pub dht_type: SensorModel,
    pub report_interval_seconds: u64,
}

impl DeviceConfigInner {
    #[must_use]
    pub const fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_seconds)
    }

    /// `host:port` of the MQTT broker.
    #[must_use]
    pub fn broker_address(&self) -> String {
        format!("{}:{}", self.mqtt_server, self.mqtt_port)
    }
}

/// Read-only, cheaply clonable handle to the device configuration.
///
/// There is no mutable access: the record is fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    inner: Arc<DeviceConfigInner>,
}

impl DeviceConfig {
    #[must_use]
    pub fn new(inner: DeviceConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

impl From<DeviceConfigInner> for DeviceConfig {
    fn from(inner: DeviceConfigInner) -> Self {
        Self::new(inner)
    }
}

impl Deref for DeviceConfig {
    type Target = DeviceConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl fmt::Display for DeviceConfigInner {
    /// One `key = value` line per field; secrets stay redacted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "wifi_ssid               = {}", self.wifi_ssid)?;
        writeln!(f, "wifi_password           = {}", self.wifi_password)?;
        writeln!(f, "instagram_fingerprint   = {}", self.instagram_fingerprint)?;
        writeln!(f, "api_access_token        = {}", self.api_access_token)?;
        writeln!(f, "user_id                 = {}", self.user_id)?;
        writeln!(f, "user_name               = {}", self.user_name.as_deref().unwrap_or("-"))?;
        writeln!(f, "mqtt_server             = {}", self.mqtt_server)?;
        writeln!(f, "mqtt_port               = {}", self.mqtt_port)?;
        writeln!(f, "mqtt_user               = {}", self.mqtt_user)?;
        writeln!(f, "mqtt_password           = {}", self.mqtt_password)?;
        writeln!(f, "mqtt_topic              = {}", self.mqtt_topic)?;
        writeln!(f, "dht_pin                 = {} (GPIO {})", self.dht_pin, self.dht_pin.gpio())?;
        writeln!(f, "dht_type                = {}", self.dht_type)?;
        write!(f, "report_interval_seconds = {}", self.report_interval_seconds)
    }
}

impl fmt::Display for DeviceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}
