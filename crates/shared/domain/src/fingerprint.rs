//! TLS certificate fingerprints used to pin the follower API endpoint.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of bytes in a SHA-1 certificate fingerprint.
pub const FINGERPRINT_LEN: usize = 20;

/// Errors produced while parsing a [`Fingerprint`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FingerprintError {
    #[error("expected 20 colon-separated byte pairs, found {0}")]
    Length(usize),

    #[error("byte pair {index} (`{pair}`) is not two hex digits")]
    Pair { index: usize, pair: String },
}

/// A 20-byte certificate fingerprint written as `5E:30:4C:...:4D`.
///
/// Parsing accepts either hex case; [`Display`](fmt::Display) always renders
/// uppercase pairs.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Compares against a certificate digest computed by the TLS client.
    ///
    /// The comparison does not short-circuit on the first differing byte.
    #[must_use]
    pub fn matches(&self, digest: &[u8]) -> bool {
        digest.len() == FINGERPRINT_LEN
            && self.0.iter().zip(digest).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pairs: Vec<&str> = s.trim().split(':').collect();
        if pairs.len() != FINGERPRINT_LEN {
            return Err(FingerprintError::Length(pairs.len()));
        }

        let mut bytes = [0u8; FINGERPRINT_LEN];
        for (index, (pair, byte)) in pairs.iter().zip(bytes.iter_mut()).enumerate() {
            // Each pair is exactly two digits.
            if pair.len() != 2 {
                return Err(FingerprintError::Pair { index, pair: (*pair).to_owned() });
            }
            hex::decode_to_slice(pair, std::slice::from_mut(byte))
                .map_err(|_| FingerprintError::Pair { index, pair: (*pair).to_owned() })?;
        }

        Ok(Self(bytes))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

impl Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
