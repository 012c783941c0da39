//! Flag-aware wrappers over `wmac_config`.
//!
//! Global flags win over the profile, the profile wins over `[defaults]`.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use wmac_config::{Config, ConfigError, Profile};
use wmac_core::{
    ConnectionProfile, DeviceRegistry, FilterIndex, FilterSyncService, JsonFileStore, RemoteSession,
    detect_gateway,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file in effect: `--config`, else the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(wmac_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(wmac_config::load_config_from(&config_file(global))?)
}

/// The selected profile with `--user`, `--port`, `--index` and `--timeout`
/// applied.
pub fn active_profile(cfg: &Config, global: &GlobalOpts) -> Result<(String, Profile), CliError> {
    let name = cfg.profile_name(global.profile.as_deref());
    let mut profile = cfg.profile(&name).map_err(|e| match e {
        ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
            name,
            available: available_profiles(cfg),
        },
        other => other.into(),
    })?;

    if let Some(ref user) = global.user {
        profile.username.clone_from(user);
    }
    if let Some(port) = global.port {
        profile.port = port;
    }
    if let Some(ref index) = global.index {
        profile.filter_index = index
            .parse::<FilterIndex>()
            .map_err(|e| CliError::Validation {
                field: "index".into(),
                reason: e.to_string(),
            })?;
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    Ok((name, profile))
}

pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}

pub fn devices_file(cfg: &Config, global: &GlobalOpts) -> PathBuf {
    global
        .devices_file
        .clone()
        .unwrap_or_else(|| wmac_config::devices_path(cfg))
}

/// Open the on-disk registry and wire it to a session built from config.
pub fn build_service(
    cfg: &Config,
    profile: &Profile,
    global: &GlobalOpts,
) -> FilterSyncService<RemoteSession> {
    let path = devices_file(cfg, global);
    debug!(path = %path.display(), "opening device registry");
    let registry = Arc::new(DeviceRegistry::open(JsonFileStore::new(path)));
    let session = RemoteSession::new(wmac_config::session_config(&cfg.defaults, profile));
    FilterSyncService::new(session, registry)
}

/// Resolve host and password into something the service can dial.
///
/// Gateway detection only runs when neither `--host` nor the profile names
/// a host. A missing password is prompted for on an interactive terminal.
pub async fn connection_profile(
    name: &str,
    profile: &Profile,
    global: &GlobalOpts,
) -> Result<ConnectionProfile, CliError> {
    let configured = global.host.as_deref().is_some_and(|h| !h.is_empty())
        || profile.host.as_deref().is_some_and(|h| !h.is_empty());
    let detected = if configured {
        None
    } else {
        detect_gateway().await
    };
    let host = wmac_config::resolve_host(global.host.as_deref(), profile, detected);
    debug!(%host, profile = name, "terminal address resolved");

    let password = match wmac_config::resolve_password(profile, name) {
        Ok(pw) => pw,
        Err(ConfigError::NoCredentials { profile: p }) if std::io::stdin().is_terminal() => {
            prompt_password(&profile.username, &host).ok_or(CliError::NoCredentials { profile: p })?
        }
        Err(e) => return Err(e.into()),
    };

    Ok(wmac_config::profile_to_connection(profile, host, password))
}

fn prompt_password(user: &str, host: &str) -> Option<SecretString> {
    let pw = rpassword::prompt_password(format!("SSH password for {user}@{host}: ")).ok()?;
    let pw = SecretString::from(pw);
    (!pw.expose_secret().is_empty()).then_some(pw)
}
