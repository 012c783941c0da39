#![allow(clippy::unwrap_used)]
// Registry behaviour through its public API: persistence, reconciliation
// laws and change notification.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_stream::StreamExt;
use uuid::Uuid;

use wmac_core::{Device, DeviceRegistry, DeviceType, JsonFileStore, MacAddress, MemoryStore};

// ── Helpers ─────────────────────────────────────────────────────────

fn dev(mac: &str) -> Device {
    Device::new(MacAddress::new(mac))
}

fn fetched(macs: &[&str]) -> Vec<Device> {
    macs.iter().map(|m| dev(m)).collect()
}

fn mac_set(devices: &[Device]) -> HashSet<String> {
    devices.iter().map(|d| d.mac_address().to_string()).collect()
}

fn seeded_registry() -> (Arc<MemoryStore>, DeviceRegistry) {
    let store = Arc::new(MemoryStore::new());
    let registry = DeviceRegistry::new(Arc::clone(&store));
    registry.merge_fetched(fetched(&[
        "aa:aa:aa:aa:aa:01",
        "aa:aa:aa:aa:aa:02",
        "aa:aa:aa:aa:aa:03",
    ]));
    (store, registry)
}

// ── Load / persistence ──────────────────────────────────────────────

#[test]
fn absent_store_loads_empty() {
    let registry = DeviceRegistry::open(MemoryStore::new());
    assert!(registry.is_empty());
}

#[test]
fn garbage_store_loads_empty() {
    let registry = DeviceRegistry::open(MemoryStore::with_contents("{not json"));
    assert!(registry.is_empty());
}

#[test]
fn mutations_survive_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devices.json");

    let registry = DeviceRegistry::open(JsonFileStore::new(&path));
    registry.merge_fetched(fetched(&["aa:aa:aa:aa:aa:01", "aa:aa:aa:aa:aa:02"]));
    let mut laptop = registry
        .get_by_mac(&MacAddress::new("aa:aa:aa:aa:aa:01"))
        .unwrap()
        .with_label("Laptop")
        .with_type(DeviceType::Notebook);
    laptop.set_enabled(false, Utc::now());
    assert!(registry.update(laptop));

    let reopened = DeviceRegistry::open(JsonFileStore::new(&path));
    assert_eq!(*reopened.snapshot(), *registry.snapshot());
}

#[test]
fn legacy_records_are_repaired_and_written_back() {
    let id = Uuid::new_v4();
    let legacy = json!([{
        "id": id,
        "macAddress": "aa:aa:aa:aa:aa:01",
        "userLabel": "Phone",
        "isEnabled": true
    }]);
    let store = Arc::new(MemoryStore::with_contents(legacy.to_string()));
    let registry = DeviceRegistry::open(Arc::clone(&store));

    let device = registry.get_by_id(id).unwrap();
    assert_eq!(device.device_type, DeviceType::Other);
    assert!(device.enabled_at.is_some());

    let written: serde_json::Value = serde_json::from_str(&store.contents().unwrap()).unwrap();
    assert_eq!(written[0]["deviceType"], "Other");
    assert!(written[0]["enabledAt"].is_string());
}

#[test]
fn clean_records_are_not_rewritten_on_load() {
    let mut device = dev("aa:aa:aa:aa:aa:01");
    device.set_enabled(true, Utc::now());
    let original = serde_json::to_string(&vec![device]).unwrap();

    let store = Arc::new(MemoryStore::with_contents(original.clone()));
    let _registry = DeviceRegistry::open(Arc::clone(&store));
    assert_eq!(store.contents().unwrap(), original);
}

// ── Point mutations ─────────────────────────────────────────────────

#[test]
fn update_status_stamps_and_clears() {
    let (_, registry) = seeded_registry();
    let mac = MacAddress::new("aa:aa:aa:aa:aa:02");

    assert!(registry.update_status(&mac, false));
    let d = registry.get_by_mac(&mac).unwrap();
    assert!(!d.is_enabled);
    assert!(d.enabled_at.is_none());

    assert!(registry.update_status(&mac, true));
    assert!(registry.get_by_mac(&mac).unwrap().enabled_at.is_some());
}

#[test]
fn unknown_targets_are_no_ops() {
    let (store, registry) = seeded_registry();
    let before = store.contents();

    assert!(!registry.update_status(&MacAddress::new("ff:ff:ff:ff:ff:ff"), false));
    assert!(!registry.update(dev("ff:ff:ff:ff:ff:ff")));
    assert!(!registry.remove(&MacAddress::new("ff:ff:ff:ff:ff:ff")));

    assert_eq!(registry.len(), 3);
    assert_eq!(store.contents(), before);
}

#[test]
fn insert_refuses_known_mac() {
    let (_, registry) = seeded_registry();
    assert!(!registry.insert(dev("aa:aa:aa:aa:aa:01")));
    assert!(registry.insert(dev("aa:aa:aa:aa:aa:09")));
    assert_eq!(registry.len(), 4);
}

#[test]
fn remove_persists() {
    let (store, registry) = seeded_registry();
    assert!(registry.remove(&MacAddress::new("aa:aa:aa:aa:aa:01")));

    let reopened = DeviceRegistry::open(store);
    assert_eq!(reopened.len(), 2);
    assert!(reopened.get_by_mac(&MacAddress::new("aa:aa:aa:aa:aa:01")).is_none());
}

// ── Reconciliation laws ─────────────────────────────────────────────

#[test]
fn merge_is_idempotent() {
    let (_, registry) = seeded_registry();
    let listing = ["aa:aa:aa:aa:aa:02", "aa:aa:aa:aa:aa:03", "aa:aa:aa:aa:aa:04"];

    let once = registry.merge_fetched(fetched(&listing));
    let twice = registry.merge_fetched(fetched(&listing));
    assert_eq!(*once, *twice);
}

#[test]
fn membership_follows_the_listing() {
    let (_, registry) = seeded_registry();
    let listing = ["aa:aa:aa:aa:aa:03", "aa:aa:aa:aa:aa:05", "aa:aa:aa:aa:aa:05"];

    let merged = registry.merge_fetched(fetched(&listing));
    let expected: HashSet<String> = listing.iter().map(|s| (*s).to_owned()).collect();
    assert_eq!(mac_set(&merged), expected);
    assert_eq!(merged.len(), 2);
}

#[test]
fn metadata_survives_a_merge() {
    let (_, registry) = seeded_registry();
    let mac = MacAddress::new("aa:aa:aa:aa:aa:01");
    let then = Utc::now() - Duration::days(3);

    let mut tv = registry
        .get_by_mac(&mac)
        .unwrap()
        .with_label("Living Room")
        .with_type(DeviceType::Tv);
    tv.set_enabled(false, then);
    registry.update(tv.clone());

    registry.merge_fetched(fetched(&["aa:aa:aa:aa:aa:01", "aa:aa:aa:aa:aa:02"]));
    assert_eq!(registry.get_by_mac(&mac).unwrap(), tv);
}

#[test]
fn merge_from_empty_listing_clears_everything() {
    let (_, registry) = seeded_registry();
    let merged = registry.merge_fetched(Vec::new());
    assert!(merged.is_empty());
}

// ── Change notification ─────────────────────────────────────────────

#[tokio::test]
async fn subscribers_see_committed_mutations() {
    let registry = DeviceRegistry::new(MemoryStore::new());
    let mut rx = registry.subscribe();

    registry.merge_fetched(fetched(&["aa:aa:aa:aa:aa:01"]));
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().len(), 1);

    // No-op mutations do not wake subscribers.
    registry.remove(&MacAddress::new("ff:ff:ff:ff:ff:ff"));
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn stream_yields_current_then_updates() {
    let registry = DeviceRegistry::new(MemoryStore::new());
    let mut stream = registry.stream();

    assert!(stream.next().await.unwrap().is_empty());
    registry.insert(dev("aa:aa:aa:aa:aa:01"));
    assert_eq!(stream.next().await.unwrap().len(), 1);
}
