//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::SecretString;
use tabled::Tabled;

use wmac_config::{Config, Profile};
use wmac_core::{FilterIndex, detect_gateway};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

#[derive(Clone, Tabled, serde::Serialize)]
struct ProfileRow {
    #[tabled(rename = "")]
    active: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Port")]
    port: u16,
    #[tabled(rename = "Filter")]
    filter: String,
}

fn profile_rows(cfg: &Config, active: &str) -> Vec<ProfileRow> {
    let mut rows: Vec<ProfileRow> = cfg
        .profiles
        .iter()
        .map(|(name, p)| ProfileRow {
            active: if name == active { "*".into() } else { String::new() },
            name: name.clone(),
            host: p.host.clone().unwrap_or_else(|| "(gateway)".into()),
            user: p.username.clone(),
            port: p.port,
            filter: p.filter_index.to_string(),
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

fn parse_field<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, CliError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| invalid(field, e.to_string()))
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_file(global);

    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            eprintln!("wmac configuration wizard");
            eprintln!("   Config path: {}\n", path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let suggested = detect_gateway()
                .await
                .unwrap_or_else(|| wmac_config::FALLBACK_HOST.into());
            let host: String = Input::new()
                .with_prompt("Terminal address")
                .default(suggested)
                .validate_with(|h: &String| {
                    if wmac_core::is_valid_ipv4(h) {
                        Ok(())
                    } else {
                        Err("expected a dotted-quad IPv4 address")
                    }
                })
                .interact_text()
                .map_err(prompt_err)?;

            let username: String = Input::new()
                .with_prompt("SSH user")
                .default("root".into())
                .interact_text()
                .map_err(prompt_err)?;

            let port: u16 = Input::new()
                .with_prompt("SSH port")
                .default(22)
                .interact_text()
                .map_err(prompt_err)?;

            let indices: Vec<FilterIndex> = FilterIndex::all().collect();
            let labels: Vec<String> = indices.iter().map(ToString::to_string).collect();
            let picked = Select::new()
                .with_prompt("Filter table")
                .items(&labels)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            let filter_index = indices.get(picked).copied().unwrap_or_default();

            let pass = rpassword::prompt_password("SSH password: ").map_err(prompt_err)?;
            if pass.is_empty() {
                return Err(invalid("password", "password cannot be empty"));
            }

            let store_choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the password?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let password = if store_selection == 0 {
                wmac_config::store_password(&profile_name, &SecretString::from(pass))?;
                eprintln!("   Password stored in system keyring");
                None
            } else {
                Some(pass)
            };

            let mut cfg = wmac_config::load_config_from(&path).unwrap_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    host: Some(host),
                    username,
                    port,
                    filter_index,
                    password,
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());
            wmac_config::save_config_to(&path, &cfg)?;

            eprintln!("\nConfiguration written to {}", path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: wmac connection test");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = config::load(global)?;
            for profile in cfg.profiles.values_mut() {
                if profile.password.is_some() {
                    profile.password = Some("********".into());
                }
            }
            let out = output::render_single(
                global.output,
                &cfg,
                |c| format!("{c:#?}"),
                |_| path.display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            let cfg = config::load(global)?;
            println!("config:  {}", path.display());
            println!("devices: {}", config::devices_file(&cfg, global).display());
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load(global)?;
            let profile_name = cfg.profile_name(global.profile.as_deref());
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            match key.as_str() {
                "host" => {
                    if !wmac_core::is_valid_ipv4(&value) {
                        return Err(invalid("host", "expected a dotted-quad IPv4 address"));
                    }
                    profile.host = Some(value);
                }
                "username" | "user" => {
                    if value.is_empty() {
                        return Err(invalid("username", "cannot be empty"));
                    }
                    profile.username = value;
                }
                "port" => profile.port = parse_field("port", &value)?,
                "filter_index" | "filter-index" | "index" => {
                    profile.filter_index = parse_field("filter_index", &value)?;
                }
                "password_env" | "password-env" => profile.password_env = Some(value),
                "timeout" => profile.timeout = Some(parse_field("timeout", &value)?),
                _ => {
                    return Err(invalid(
                        "key",
                        format!(
                            "unknown key '{key}' (expected host, username, port, \
                             filter_index, password_env, timeout)"
                        ),
                    ));
                }
            }

            wmac_config::save_config_to(&path, &cfg)?;
            if !global.quiet {
                eprintln!("Set {key} on profile '{profile_name}'");
            }
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load(global)?;
            let active = cfg.profile_name(global.profile.as_deref());
            let rows = profile_rows(&cfg, &active);
            let out = output::render_list(
                global.output,
                &rows,
                Clone::clone,
                |r| r.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load(global)?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }
            cfg.default_profile = Some(name.clone());
            wmac_config::save_config_to(&path, &cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load(global)?;
            let profile_name = profile
                .or_else(|| global.profile.clone())
                .unwrap_or_else(|| cfg.profile_name(None));
            let pass = rpassword::prompt_password(format!("SSH password for '{profile_name}': "))
                .map_err(prompt_err)?;
            if pass.is_empty() {
                return Err(invalid("password", "password cannot be empty"));
            }
            wmac_config::store_password(&profile_name, &SecretString::from(pass))?;
            if !global.quiet {
                eprintln!("Password stored in system keyring for '{profile_name}'");
            }
            Ok(())
        }
    }
}
