// ── MAC address identity key ──

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
///
/// [`MacAddress::new`] only normalizes and never fails, which is what the
/// listing parser needs: whatever the terminal prints is kept. User input
/// goes through [`MacAddress::parse`], which insists on six hex octets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not a MAC address (expected xx:xx:xx:xx:xx:xx)")]
pub struct MacParseError {
    pub input: String,
}

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Dashes become colons; nothing is validated.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw.as_ref().trim().to_lowercase().replace('-', ":");
        Self(normalized)
    }

    /// Parse and validate a 6-octet MAC address.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, MacParseError> {
        let raw = raw.as_ref();
        let err = || MacParseError {
            input: raw.to_owned(),
        };
        let trimmed = raw.trim();

        let octets: Vec<&str> = if trimmed.contains([':', '-']) {
            trimmed.split([':', '-']).collect()
        } else if trimmed.len() == 12 {
            (0..12)
                .step_by(2)
                .map(|i| trimmed.get(i..i + 2).ok_or_else(err))
                .collect::<Result<_, _>>()?
        } else {
            return Err(err());
        };

        if octets.len() != 6
            || !octets
                .iter()
                .all(|o| o.len() == 2 && o.bytes().all(|b| b.is_ascii_hexdigit()))
        {
            return Err(err());
        }

        Ok(Self(octets.join(":").to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Uppercase form used for display (AA:BB:CC:DD:EE:FF).
    pub fn to_display_upper(&self) -> String {
        self.0.to_uppercase()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
