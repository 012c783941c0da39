// ── Connection profile ──

use std::fmt;
use std::str::FromStr;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use wmac_session::Credentials;

/// Which SSID's MAC filter table the commands target (1..=8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FilterIndex(u8);

impl FilterIndex {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    pub fn new(n: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&n).then_some(Self(n))
    }

    /// Numeric suffix used on the wire (`... filter index 1 ...`).
    pub fn number(self) -> u8 {
        self.0
    }

    /// Every selectable index, in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl Default for FilterIndex {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for FilterIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SSID-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a filter index (expected SSID-1 .. SSID-8)")]
pub struct FilterIndexParseError(String);

impl FromStr for FilterIndex {
    type Err = FilterIndexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .get(..5)
            .filter(|prefix| prefix.eq_ignore_ascii_case("ssid-"))
            .map_or(trimmed, |_| &trimmed[5..]);
        digits
            .parse::<u8>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| FilterIndexParseError(s.to_owned()))
    }
}

impl TryFrom<String> for FilterIndex {
    type Error = FilterIndexParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FilterIndex> for String {
    fn from(value: FilterIndex) -> Self {
        value.to_string()
    }
}

/// Everything needed to reach one terminal's filter table.
#[derive(Debug, Clone)]
pub struct ConnectionProfile {
    pub credentials: Credentials,
    pub filter_index: FilterIndex,
}

impl ConnectionProfile {
    pub fn new(credentials: Credentials, filter_index: FilterIndex) -> Self {
        Self {
            credentials,
            filter_index,
        }
    }

    /// Host, user and password are all non-empty.
    pub fn is_complete(&self) -> bool {
        !self.credentials.host.is_empty()
            && !self.credentials.user.is_empty()
            && !self.credentials.password.expose_secret().is_empty()
    }
}
