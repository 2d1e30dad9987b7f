//! Temperature/humidity sensor wiring.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// GPIO numbers behind the NodeMCU board labels `D0`..`D8`.
const BOARD_GPIO: [u8; 9] = [16, 5, 4, 0, 2, 14, 12, 13, 15];

/// Highest GPIO number accepted for raw pin identifiers.
pub const MAX_GPIO: u8 = 39;

/// DHT sensor family member, which selects the wire protocol timing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    EnumIter,
    IntoStaticStr,
    strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum SensorModel {
    #[strum(to_string = "DHT11")]
    Dht11,
    #[strum(to_string = "DHT21", serialize = "AM2301")]
    Dht21,
    #[strum(to_string = "DHT22", serialize = "AM2302")]
    Dht22,
}

impl Serialize for SensorModel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let name: &'static str = self.into();
        serializer.serialize_str(name)
    }
}

impl<'de> Deserialize<'de> for SensorModel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("unknown sensor model `{raw}`")))
    }
}

/// Errors produced while parsing a [`SensorPin`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PinError {
    #[error("board pin D{0} does not exist (expected D0..D8)")]
    UnknownBoardPin(u8),

    #[error("GPIO {0} is out of range (expected 0..=39)")]
    GpioOutOfRange(u8),

    #[error("`{0}` is not a pin identifier (expected D<n>, GPIO<n> or a GPIO number)")]
    Unrecognized(String),
}

/// Data pin the sensor is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorPin {
    /// NodeMCU silkscreen label, e.g. `D4`.
    Board(u8),
    /// Raw GPIO number, e.g. `GPIO2` or `2`.
    Gpio(u8),
}

impl SensorPin {
    /// Resolves the pin to the GPIO number a driver addresses.
    #[must_use]
    pub fn gpio(self) -> u8 {
        match self {
            // Board pins are range-checked on construction.
            Self::Board(label) => BOARD_GPIO.get(usize::from(label)).copied().unwrap_or(label),
            Self::Gpio(number) => number,
        }
    }
}

impl FromStr for SensorPin {
    type Err = PinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ident = s.trim().to_ascii_uppercase();
        let unrecognized = || PinError::Unrecognized(s.trim().to_owned());

        if let Some(label) = ident.strip_prefix("GPIO") {
            let number: u8 = label.parse().map_err(|_| unrecognized())?;
            return gpio(number);
        }

        if let Some(label) = ident.strip_prefix('D') {
            let number: u8 = label.parse().map_err(|_| unrecognized())?;
            return if usize::from(number) < BOARD_GPIO.len() {
                Ok(Self::Board(number))
            } else {
                Err(PinError::UnknownBoardPin(number))
            };
        }

        ident.parse().map_err(|_| unrecognized()).and_then(gpio)
    }
}

fn gpio(number: u8) -> Result<SensorPin, PinError> {
    if number > MAX_GPIO {
        return Err(PinError::GpioOutOfRange(number));
    }
    Ok(SensorPin::Gpio(number))
}

impl fmt::Display for SensorPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Board(label) => write!(f, "D{label}"),
            Self::Gpio(number) => write!(f, "GPIO{number}"),
        }
    }
}

impl Serialize for SensorPin {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SensorPin {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
