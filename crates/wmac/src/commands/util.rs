//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use wmac_core::{DeviceType, FilterSyncService, MacAddress, RemoteExecutor};

use crate::cli::{DeviceKind, GlobalOpts};
use crate::error::CliError;

/// Resolve a device selector (UUID or MAC) to the MAC the terminal knows.
///
/// A UUID must name a registered device. Anything else is handed on as a
/// MAC, so devices the registry has never seen can still be targeted.
pub fn resolve_device_mac<E: RemoteExecutor>(
    service: &FilterSyncService<E>,
    selector: &str,
) -> Result<MacAddress, CliError> {
    if let Ok(id) = selector.parse() {
        return service
            .registry()
            .get_by_id(id)
            .map(|d| d.mac_address().clone())
            .ok_or_else(|| CliError::NotFound {
                resource_type: "device".into(),
                identifier: selector.into(),
                list_command: "devices list".into(),
            });
    }
    Ok(MacAddress::new(selector))
}

pub fn device_type(kind: DeviceKind) -> DeviceType {
    match kind {
        DeviceKind::Notebook => DeviceType::Notebook,
        DeviceKind::Desktop => DeviceType::Desktop,
        DeviceKind::Phone => DeviceType::Phone,
        DeviceKind::Tablet => DeviceType::Tablet,
        DeviceKind::Tv => DeviceType::Tv,
        DeviceKind::Other => DeviceType::Other,
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Await a remote call behind a stderr spinner when a human is watching.
pub async fn with_spinner<T>(global: &GlobalOpts, message: &str, fut: impl Future<Output = T>) -> T {
    if global.quiet || !std::io::stderr().is_terminal() {
        return fut.await;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = fut.await;
    spinner.finish_and_clear();
    out
}
