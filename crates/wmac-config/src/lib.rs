//! Shared configuration for the wmac CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! data-file locations, and translation to `wmac_core::ConnectionProfile`.
//! The CLI adds flag-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use wmac_core::{ConnectionProfile, Credentials, FilterIndex, ScriptSource, SessionConfig};

/// Keyring service name; entries are `<profile>/password`.
pub const KEYRING_SERVICE: &str = "wmac";

/// Overrides every other password source when set.
pub const PASSWORD_ENV: &str = "WMAC_PASSWORD";

/// Used when no host is configured and no gateway can be detected.
pub const FALLBACK_HOST: &str = "192.168.1.1";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named terminal profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: explicit choice, then `default_profile`.
    pub fn profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// Look up a profile. The `default` profile is synthesized when absent
    /// so a bare install works against the detected gateway.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == "default" => Ok(Profile::default()),
            None => Err(ConfigError::UnknownProfile { name: name.into() }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Seconds the automation script waits at each prompt.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Interpreter that runs the automation script.
    #[serde(default = "default_interpreter")]
    pub interpreter: PathBuf,

    /// Use this script instead of the bundled one.
    pub script: Option<PathBuf>,

    /// Where the device registry lives. Defaults to the platform data dir.
    pub devices_file: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            interpreter: default_interpreter(),
            script: None,
            devices_file: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_interpreter() -> PathBuf {
    PathBuf::from("expect")
}

/// A named terminal profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Terminal address. Empty means "use the detected gateway".
    pub host: Option<String>,

    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Which SSID's filter table to manage.
    #[serde(default)]
    pub filter_index: FilterIndex,

    /// Plaintext password (prefer keyring).
    pub password: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// Override the default prompt timeout.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            host: None,
            username: default_username(),
            port: default_port(),
            filter_index: FilterIndex::default(),
            password: None,
            password_env: None,
            timeout: None,
        }
    }
}

fn default_username() -> String {
    "root".into()
}
fn default_port() -> u16 {
    22
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("net", "dalirnet", "wmac")
}

fn home_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("wmac");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where the device registry is stored for this config.
pub fn devices_path(cfg: &Config) -> PathBuf {
    if let Some(ref path) = cfg.defaults.devices_file {
        return path.clone();
    }
    project_dirs().map_or_else(
        || home_fallback(".local/share").join("devices.json"),
        |dirs| dirs.data_dir().join("devices.json"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from a specific file, layered over defaults and under `WMAC_` env
/// vars (`WMAC_DEFAULTS__OUTPUT=json`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WMAC_").split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), profiles = config.profiles.len(), "config loaded");
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML at `path`, creating parent directories.
pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the SSH password: `WMAC_PASSWORD`, then the profile's
/// `password_env`, then the system keyring, then plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_password_with(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        keyring_password,
    )
}

/// [`resolve_password`] with injectable env and keyring lookups.
pub fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl FnOnce(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Global override
    if let Some(pw) = env(PASSWORD_ENV).filter(|pw| !pw.is_empty()) {
        return Ok(SecretString::from(pw));
    }

    // 2. Profile's password_env
    if let Some(pw) = profile
        .password_env
        .as_deref()
        .and_then(&env)
        .filter(|pw| !pw.is_empty())
    {
        return Ok(SecretString::from(pw));
    }

    // 3. System keyring
    if let Some(pw) = keyring(profile_name) {
        return Ok(SecretString::from(pw));
    }

    // 4. Plaintext in config
    if let Some(pw) = profile.password.clone().filter(|pw| !pw.is_empty()) {
        return Ok(SecretString::from(pw));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

fn keyring_password(profile_name: &str) -> Option<String> {
    keyring_entry(profile_name)
        .and_then(|entry| entry.get_password())
        .map_err(|e| debug!(error = %e, profile = profile_name, "no keyring password"))
        .ok()
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password.expose_secret())?;
    Ok(())
}

/// Pick the terminal address: explicit flag, then profile, then the
/// detected gateway, then [`FALLBACK_HOST`].
pub fn resolve_host(explicit: Option<&str>, profile: &Profile, detected: Option<String>) -> String {
    explicit
        .filter(|h| !h.is_empty())
        .map(str::to_owned)
        .or_else(|| profile.host.clone().filter(|h| !h.is_empty()))
        .or(detected)
        .unwrap_or_else(|| FALLBACK_HOST.into())
}

// ── Translation to core types ───────────────────────────────────────

/// Build a `ConnectionProfile` for an already-resolved host and password.
pub fn profile_to_connection(
    profile: &Profile,
    host: String,
    password: SecretString,
) -> ConnectionProfile {
    let credentials =
        Credentials::new(host, profile.username.clone(), password).with_port(profile.port);
    ConnectionProfile::new(credentials, profile.filter_index)
}

/// Session settings from the defaults table, with the profile's timeout override.
pub fn session_config(defaults: &Defaults, profile: &Profile) -> SessionConfig {
    SessionConfig {
        interpreter: defaults.interpreter.clone(),
        script: defaults
            .script
            .clone()
            .map_or(ScriptSource::Bundled, ScriptSource::File),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
    }
}
