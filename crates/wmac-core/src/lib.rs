// wmac-core: device registry and filter-table sync between wmac-session and consumers.

pub mod command;
pub mod error;
pub mod gateway;
pub mod model;
pub mod registry;
pub mod scraper;
pub mod service;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::RemoteCommand;
pub use error::CoreError;
pub use gateway::{detect_gateway, parse_default_gateway};
pub use registry::{
    DeviceRegistry, DeviceSnapshot, DeviceStore, JsonFileStore, MemoryStore, StoreError,
};
pub use scraper::{clean_output, parse_device_list, reports_success};
pub use service::{DeviceEdit, FilterSyncService, NewDevice, RemoteExecutor};

pub use model::{
    ConnectionProfile, Device, DeviceType, FilterIndex, FilterIndexParseError, MacAddress,
    MacParseError, elapsed_since,
};

// Session-layer types consumers need alongside the service.
pub use wmac_session::{
    ConnectivityResult, Credentials, RemoteFailure, RemoteSession, ScriptSource, SessionConfig,
    SessionOutcome, is_valid_ipv4,
};
