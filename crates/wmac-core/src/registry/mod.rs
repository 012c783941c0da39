// ── Device registry ──
//
// Sole owner of the local device collection. The collection lives in a
// `watch` channel: readers take cheap `Arc` snapshots or subscribe, and
// every mutation runs inside `send_modify`/`send_if_modified`, which
// serializes writers and lets the persistence write happen under the
// same lock. Persistence failures are logged and absorbed; the
// in-memory change stands.

mod merge;
mod store;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::model::device::DeviceRecord;
use crate::model::{Device, MacAddress};

pub use store::{DeviceStore, JsonFileStore, MemoryStore, StoreError};

/// Point-in-time view of the registry.
pub type DeviceSnapshot = Arc<Vec<Device>>;

pub struct DeviceRegistry {
    devices: watch::Sender<DeviceSnapshot>,
    store: Box<dyn DeviceStore>,
}

impl DeviceRegistry {
    /// An empty registry backed by `store`. Nothing is read until [`load`](Self::load).
    pub fn new(store: impl DeviceStore + 'static) -> Self {
        let (devices, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            devices,
            store: Box::new(store),
        }
    }

    /// Construct and immediately [`load`](Self::load).
    pub fn open(store: impl DeviceStore + 'static) -> Self {
        let registry = Self::new(store);
        registry.load();
        registry
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> DeviceSnapshot {
        self.devices.borrow().clone()
    }

    pub fn get_by_mac(&self, mac: &MacAddress) -> Option<Device> {
        self.devices
            .borrow()
            .iter()
            .find(|d| d.mac_address() == mac)
            .cloned()
    }

    pub fn get_by_id(&self, id: Uuid) -> Option<Device> {
        self.devices.borrow().iter().find(|d| d.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.devices.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.borrow().is_empty()
    }

    /// Receiver that observes every committed mutation.
    pub fn subscribe(&self) -> watch::Receiver<DeviceSnapshot> {
        self.devices.subscribe()
    }

    /// [`subscribe`](Self::subscribe) as a `Stream`, yielding the current snapshot first.
    pub fn stream(&self) -> WatchStream<DeviceSnapshot> {
        WatchStream::new(self.devices.subscribe())
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Replace the collection with what the store holds.
    ///
    /// A missing or undecodable document leaves the collection empty.
    /// Enabled records lacking `enabledAt` are stamped now and written back.
    pub fn load(&self) {
        let (devices, repaired) = match self.store.load() {
            Ok(Some(raw)) => decode(&raw),
            Ok(None) => (Vec::new(), 0),
            Err(e) => {
                warn!(error = %e, "could not read device store; starting empty");
                (Vec::new(), 0)
            }
        };
        debug!(count = devices.len(), repaired, "device registry loaded");

        self.devices.send_modify(|current| {
            *current = Arc::new(devices);
            if repaired > 0 {
                self.persist(current);
            }
        });
    }

    /// Replace the record with the same id. No-op if absent.
    pub fn update(&self, device: Device) -> bool {
        self.devices.send_if_modified(|current| {
            let Some(slot) = Arc::make_mut(current)
                .iter_mut()
                .find(|d| d.id() == device.id())
            else {
                return false;
            };
            *slot = device;
            self.persist(current);
            true
        })
    }

    /// Set admission state for a MAC, stamping or clearing `enabledAt`.
    /// No-op if the MAC is unknown.
    pub fn update_status(&self, mac: &MacAddress, enabled: bool) -> bool {
        let now = Utc::now();
        self.devices.send_if_modified(|current| {
            let Some(device) = Arc::make_mut(current)
                .iter_mut()
                .find(|d| d.mac_address() == mac)
            else {
                return false;
            };
            device.set_enabled(enabled, now);
            self.persist(current);
            true
        })
    }

    /// Reconcile against a fresh remote listing. The listing decides membership;
    /// known MACs keep their local record, new ones arrive enabled.
    pub fn merge_fetched(&self, fetched: Vec<Device>) -> DeviceSnapshot {
        let now = Utc::now();
        self.devices.send_modify(|current| {
            let merged = merge::merge_fetched(current, fetched, now);
            debug!(before = current.len(), after = merged.len(), "merged remote listing");
            *current = Arc::new(merged);
            self.persist(current);
        });
        self.snapshot()
    }

    /// Add a record unless its MAC is already present.
    pub fn insert(&self, device: Device) -> bool {
        self.devices.send_if_modified(|current| {
            if current.iter().any(|d| d.mac_address() == device.mac_address()) {
                return false;
            }
            Arc::make_mut(current).push(device);
            self.persist(current);
            true
        })
    }

    /// Delete every record with this MAC.
    pub fn remove(&self, mac: &MacAddress) -> bool {
        self.devices.send_if_modified(|current| {
            let before = current.len();
            Arc::make_mut(current).retain(|d| d.mac_address() != mac);
            if current.len() == before {
                return false;
            }
            self.persist(current);
            true
        })
    }

    // ── Persistence ──────────────────────────────────────────────────

    fn persist(&self, devices: &[Device]) {
        let result = serde_json::to_string_pretty(devices)
            .map_err(StoreError::from)
            .and_then(|json| self.store.save(&json));
        if let Err(e) = result {
            warn!(error = %e, "failed to persist device registry");
        }
    }
}

impl std::fmt::Debug for DeviceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceRegistry")
            .field("devices", &self.len())
            .finish_non_exhaustive()
    }
}

/// Decode a stored document, returning the devices and how many needed repair.
fn decode(raw: &str) -> (Vec<Device>, usize) {
    match serde_json::from_str::<Vec<DeviceRecord>>(raw) {
        Ok(records) => {
            let repaired = records.iter().filter(|r| r.needs_repair()).count();
            (records.into_iter().map(Device::from).collect(), repaired)
        }
        Err(e) => {
            warn!(error = %e, "device store is not decodable; starting empty");
            (Vec::new(), 0)
        }
    }
}
