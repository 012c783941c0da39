// ── Domain model ──
//
// Devices as the local registry knows them, the MAC address identity key,
// and the connection profile the sync service hands to the session layer.

pub mod device;
pub mod mac;
pub mod profile;

pub use device::{Device, DeviceType, elapsed_since};
pub use mac::{MacAddress, MacParseError};
pub use profile::{ConnectionProfile, FilterIndex, FilterIndexParseError};
