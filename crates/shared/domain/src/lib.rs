//! # Domain Models
//!
//! Typed device configuration for the follower gauge: Wi-Fi credentials, the pinned
//! HTTPS fingerprint, follower API access, MQTT broker settings, the DHT sensor wiring
//! and the report cadence.
//!
//! Keep it lean: no I/O or loading logic here, just data and the parsing rules of
//! individual values. Loading and validation of whole records lives in `gauge-kernel`.

pub mod config;
pub mod fingerprint;
pub mod secret;
pub mod sensor;

pub use config::{DEFAULT_MQTT_PORT, DeviceConfig, DeviceConfigInner};
pub use fingerprint::{Fingerprint, FingerprintError};
pub use secret::Secret;
pub use sensor::{PinError, SensorModel, SensorPin};
