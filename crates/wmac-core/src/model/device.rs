// ── Device domain types ──

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use super::mac::MacAddress;

/// User-assigned device category. Purely local; the terminal has no notion of it.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum DeviceType {
    Notebook,
    Desktop,
    Phone,
    Tablet,
    #[serde(rename = "TV")]
    #[strum(serialize = "TV")]
    Tv,
    #[default]
    Other,
}

/// A device known to the local registry.
///
/// `id` and `mac_address` are fixed at construction; everything else is
/// mutable metadata. `enabled_at` is `Some` exactly when `is_enabled` is
/// true; use [`Device::set_enabled`] to change either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "DeviceRecord")]
pub struct Device {
    id: Uuid,
    mac_address: MacAddress,
    pub user_label: String,
    pub is_enabled: bool,
    pub device_type: DeviceType,
    pub enabled_at: Option<DateTime<Utc>>,
}

impl Device {
    /// A freshly observed device: new id, no label, enabled as of now.
    pub fn new(mac_address: MacAddress) -> Self {
        Self {
            id: Uuid::new_v4(),
            mac_address,
            user_label: String::new(),
            is_enabled: true,
            device_type: DeviceType::Other,
            enabled_at: Some(Utc::now()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mac_address(&self) -> &MacAddress {
        &self.mac_address
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.user_label = label.into();
        self
    }

    pub fn with_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = device_type;
        self
    }

    /// Flip admission state, stamping or clearing `enabled_at`.
    pub fn set_enabled(&mut self, enabled: bool, now: DateTime<Utc>) {
        self.is_enabled = enabled;
        self.enabled_at = enabled.then_some(now);
    }

    /// Label for display; empty labels read as "Unnamed".
    pub fn display_label(&self) -> &str {
        if self.user_label.is_empty() {
            "Unnamed"
        } else {
            &self.user_label
        }
    }

    pub fn status_text(&self) -> &'static str {
        if self.is_enabled { "Allowed" } else { "Blocked" }
    }

    /// "N minutes ago"-style text since the device was enabled, if it is.
    pub fn enabled_since_text(&self, now: DateTime<Utc>) -> Option<String> {
        match (self.is_enabled, self.enabled_at) {
            (true, Some(at)) => Some(elapsed_since(at, now)),
            _ => None,
        }
    }
}

/// Human wording for the time between `then` and `now`, in the largest
/// whole unit (seconds, minutes, hours, days). Future instants read as 0 seconds.
pub fn elapsed_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    let (value, unit) = match secs {
        s if s < 60 => (s, "second"),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s => (s / 86_400, "day"),
    };
    if value == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{value} {unit}s ago")
    }
}

// ── Persisted shape ─────────────────────────────────────────────────

/// On-disk record, tolerant of the older schema that lacked
/// `deviceType` and `enabledAt` (or carried values we no longer know).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeviceRecord {
    id: Uuid,
    mac_address: MacAddress,
    #[serde(default)]
    user_label: String,
    is_enabled: bool,
    #[serde(default, deserialize_with = "lenient")]
    device_type: Option<DeviceType>,
    #[serde(default, deserialize_with = "lenient")]
    enabled_at: Option<DateTime<Utc>>,
}

impl DeviceRecord {
    /// Enabled but without a timestamp; conversion will stamp "now".
    pub(crate) fn needs_repair(&self) -> bool {
        self.is_enabled && self.enabled_at.is_none()
    }
}

impl From<DeviceRecord> for Device {
    fn from(r: DeviceRecord) -> Self {
        let enabled_at = match r.enabled_at {
            Some(at) => Some(at),
            None if r.is_enabled => Some(Utc::now()),
            None => None,
        };
        Self {
            id: r.id,
            mac_address: r.mac_address,
            user_label: r.user_label,
            is_enabled: r.is_enabled,
            device_type: r.device_type.unwrap_or_default(),
            enabled_at,
        }
    }
}

/// Decode a field, treating anything undecodable as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
