//! Device command handlers.

use chrono::Utc;
use tabled::Tabled;
use wmac_core::{Device, DeviceEdit, NewDevice};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{Terminal, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Enabled")]
    since: String,
}

impl DeviceRow {
    fn new(d: &Device, color: bool) -> Self {
        Self {
            mac: d.mac_address().to_display_upper(),
            label: d.display_label().to_owned(),
            dtype: d.device_type.to_string(),
            status: output::status_cell(d.is_enabled, d.status_text(), color),
            since: d.enabled_since_text(Utc::now()).unwrap_or_else(|| "-".into()),
        }
    }
}

fn detail(d: &Device) -> String {
    [
        format!("ID:      {}", d.id()),
        format!("MAC:     {}", d.mac_address().to_display_upper()),
        format!("Label:   {}", d.display_label()),
        format!("Type:    {}", d.device_type),
        format!("Status:  {}", d.status_text()),
        format!(
            "Enabled: {}",
            d.enabled_since_text(Utc::now()).as_deref().unwrap_or("-")
        ),
    ]
    .join("\n")
}

fn mac_id(d: &Device) -> String {
    d.mac_address().to_string()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    terminal: &Terminal<'_>,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let service = &terminal.service;
    let color = output::should_color(global.color);

    match args.command {
        DevicesCommand::List { cached } => {
            let snap = if cached {
                service.registry().snapshot()
            } else {
                let profile = terminal.connect().await?;
                util::with_spinner(global, "Reading filter table", service.list_devices(&profile))
                    .await?
            };
            let out = output::render_list(
                global.output,
                snap.as_slice(),
                |d| DeviceRow::new(d, color),
                mac_id,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Add { mac, label, kind } => {
            let profile = terminal.connect().await?;
            let request = NewDevice {
                mac,
                label,
                device_type: util::device_type(kind),
            };
            let device =
                util::with_spinner(global, "Admitting device", service.add_device(&profile, request))
                    .await?;
            let out = output::render_single(global.output, &device, detail, mac_id)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Enable { device } => set_enabled(terminal, &device, true, global).await,
        DevicesCommand::Disable { device } => set_enabled(terminal, &device, false, global).await,

        DevicesCommand::Edit {
            device,
            label,
            kind,
        } => {
            if label.is_none() && kind.is_none() {
                return Err(CliError::Validation {
                    field: "edit".into(),
                    reason: "nothing to change; pass --label and/or --type".into(),
                });
            }
            let edit = DeviceEdit {
                label,
                device_type: kind.map(util::device_type),
            };
            let updated = service.edit_device(&device, edit)?;
            let out = output::render_single(global.output, &updated, detail, mac_id)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Remove { device } => {
            let mac = util::resolve_device_mac(service, &device)?;
            if !util::confirm(&format!("Remove device {mac}?"), global.yes)? {
                return Ok(());
            }
            let profile = terminal.connect().await?;
            let removed = util::with_spinner(
                global,
                "Removing device",
                service.delete_device(&profile, mac.as_str()),
            )
            .await?;
            if !global.quiet {
                eprintln!("Device {} removed", removed.display_label());
            }
            Ok(())
        }
    }
}

async fn set_enabled(
    terminal: &Terminal<'_>,
    selector: &str,
    enabled: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let service = &terminal.service;
    let mac = util::resolve_device_mac(service, selector)?;
    let profile = terminal.connect().await?;
    let message = if enabled { "Admitting device" } else { "Revoking device" };
    let mac = util::with_spinner(
        global,
        message,
        service.set_enabled(&profile, mac.as_str(), enabled),
    )
    .await?;
    if !global.quiet {
        let verb = if enabled { "allowed" } else { "blocked" };
        eprintln!("{} {verb}", mac.to_display_upper());
    }
    Ok(())
}
