// ── Filter sync service ──
//
// Orchestrates remote commands against one terminal and reflects their
// results in the shared `DeviceRegistry`. Each operation is a short,
// fixed sequence; nothing is retried here.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use wmac_session::{ConnectivityResult, Credentials, RemoteSession, SessionOutcome};

use crate::command::RemoteCommand;
use crate::error::CoreError;
use crate::model::{ConnectionProfile, Device, DeviceType, MacAddress};
use crate::registry::{DeviceRegistry, DeviceSnapshot};
use crate::scraper::{clean_output, parse_device_list, reports_success};

// ── RemoteExecutor ───────────────────────────────────────────────

/// The seam between orchestration and process spawning.
pub trait RemoteExecutor: Send + Sync {
    fn execute(
        &self,
        credentials: &Credentials,
        command: &str,
    ) -> impl Future<Output = Result<SessionOutcome, wmac_session::Error>> + Send;

    fn test_connection(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<ConnectivityResult, wmac_session::Error>> + Send;
}

impl RemoteExecutor for RemoteSession {
    fn execute(
        &self,
        credentials: &Credentials,
        command: &str,
    ) -> impl Future<Output = Result<SessionOutcome, wmac_session::Error>> + Send {
        RemoteSession::execute(self, credentials, command)
    }

    fn test_connection(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<ConnectivityResult, wmac_session::Error>> + Send {
        RemoteSession::test_connection(self, credentials)
    }
}

// ── Requests ─────────────────────────────────────────────────────

/// A device the user wants admitted, with its local annotations.
#[derive(Debug, Clone)]
pub struct NewDevice {
    pub mac: String,
    pub label: String,
    pub device_type: DeviceType,
}

/// Local-only changes to a known device. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct DeviceEdit {
    pub label: Option<String>,
    pub device_type: Option<DeviceType>,
}

// ── FilterSyncService ────────────────────────────────────────────

pub struct FilterSyncService<E = RemoteSession> {
    executor: E,
    registry: Arc<DeviceRegistry>,
}

impl<E: RemoteExecutor> FilterSyncService<E> {
    pub fn new(executor: E, registry: Arc<DeviceRegistry>) -> Self {
        Self { executor, registry }
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    // ── Remote operations ────────────────────────────────────────

    /// Fetch the filter table and reconcile the registry against it.
    pub async fn list_devices(
        &self,
        profile: &ConnectionProfile,
    ) -> Result<DeviceSnapshot, CoreError> {
        let output = self.run(profile, &RemoteCommand::ListFilter).await?;
        let fetched = parse_device_list(&output);
        debug!(fetched = fetched.len(), "parsed filter listing");
        Ok(self.registry.merge_fetched(fetched))
    }

    /// Add a MAC to the filter table and mark it enabled locally.
    pub async fn admit(
        &self,
        profile: &ConnectionProfile,
        mac: &str,
    ) -> Result<MacAddress, CoreError> {
        let mac = MacAddress::parse(mac)?;
        let command = RemoteCommand::Admit {
            index: profile.filter_index,
            mac: mac.clone(),
        };
        let output = self.run(profile, &command).await?;
        if !reports_success(&output) {
            return Err(CoreError::AddFailed {
                mac: mac.to_string(),
            });
        }
        self.registry.update_status(&mac, true);
        info!(%mac, index = %profile.filter_index, "device admitted");
        Ok(mac)
    }

    /// Remove a MAC from the filter table and mark it disabled locally.
    pub async fn revoke(
        &self,
        profile: &ConnectionProfile,
        mac: &str,
    ) -> Result<MacAddress, CoreError> {
        let mac = MacAddress::parse(mac)?;
        let command = RemoteCommand::Revoke {
            index: profile.filter_index,
            mac: mac.clone(),
        };
        let output = self.run(profile, &command).await?;
        if !reports_success(&output) {
            return Err(CoreError::DeleteFailed {
                mac: mac.to_string(),
            });
        }
        self.registry.update_status(&mac, false);
        info!(%mac, index = %profile.filter_index, "device revoked");
        Ok(mac)
    }

    pub async fn set_enabled(
        &self,
        profile: &ConnectionProfile,
        mac: &str,
        enabled: bool,
    ) -> Result<MacAddress, CoreError> {
        if enabled {
            self.admit(profile, mac).await
        } else {
            self.revoke(profile, mac).await
        }
    }

    /// Admit a new device, refresh the listing, then apply its annotations.
    ///
    /// A failed refresh is not fatal: the device is recorded locally as
    /// enabled so the label and type survive until the next listing.
    pub async fn add_device(
        &self,
        profile: &ConnectionProfile,
        request: NewDevice,
    ) -> Result<Device, CoreError> {
        let mac = self.admit(profile, &request.mac).await?;

        if let Err(e) = self.list_devices(profile).await {
            warn!(error = %e, %mac, "refresh after admit failed");
        }

        let device = match self.registry.get_by_mac(&mac) {
            Some(existing) => {
                let device = existing
                    .with_label(request.label)
                    .with_type(request.device_type);
                self.registry.update(device.clone());
                device
            }
            None => {
                let mut device = Device::new(mac)
                    .with_label(request.label)
                    .with_type(request.device_type);
                device.set_enabled(true, Utc::now());
                self.registry.insert(device.clone());
                device
            }
        };
        Ok(device)
    }

    /// Forget a device, revoking it on the terminal first if it is enabled.
    /// A failed revoke leaves the registry untouched.
    pub async fn delete_device(
        &self,
        profile: &ConnectionProfile,
        mac: &str,
    ) -> Result<Device, CoreError> {
        let mac = MacAddress::parse(mac)?;
        let device = self
            .registry
            .get_by_mac(&mac)
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: mac.to_string(),
            })?;

        if device.is_enabled {
            self.revoke(profile, mac.as_str()).await?;
        }
        self.registry.remove(&mac);
        info!(%mac, "device removed from registry");
        Ok(device)
    }

    /// Run an arbitrary command and return its cleaned output.
    pub async fn run_raw(
        &self,
        profile: &ConnectionProfile,
        line: &str,
    ) -> Result<String, CoreError> {
        self.run(profile, &RemoteCommand::Raw(line.to_owned())).await
    }

    pub async fn test_connection(
        &self,
        profile: &ConnectionProfile,
    ) -> Result<ConnectivityResult, CoreError> {
        if !profile.is_complete() {
            return Err(CoreError::IncompleteProfile);
        }
        Ok(self.executor.test_connection(&profile.credentials).await?)
    }

    // ── Local operations ─────────────────────────────────────────

    /// Look a device up by MAC address or registry id.
    pub fn find_device(&self, selector: &str) -> Result<Device, CoreError> {
        let found = if let Ok(id) = Uuid::parse_str(selector) {
            self.registry.get_by_id(id)
        } else {
            let mac = MacAddress::parse(selector)?;
            self.registry.get_by_mac(&mac)
        };
        found.ok_or_else(|| CoreError::DeviceNotFound {
            identifier: selector.to_owned(),
        })
    }

    /// Change a device's label and/or type. Never touches the terminal.
    pub fn edit_device(&self, selector: &str, edit: DeviceEdit) -> Result<Device, CoreError> {
        let mut device = self.find_device(selector)?;
        if let Some(label) = edit.label {
            device.user_label = label;
        }
        if let Some(device_type) = edit.device_type {
            device.device_type = device_type;
        }
        self.registry.update(device.clone());
        Ok(device)
    }

    // ── Plumbing ─────────────────────────────────────────────────

    async fn run(
        &self,
        profile: &ConnectionProfile,
        command: &RemoteCommand,
    ) -> Result<String, CoreError> {
        if !profile.is_complete() {
            return Err(CoreError::IncompleteProfile);
        }
        let line = command.line();
        let raw = self
            .executor
            .execute(&profile.credentials, &line)
            .await?
            .into_result()?;
        Ok(clean_output(&raw, &line))
    }
}
