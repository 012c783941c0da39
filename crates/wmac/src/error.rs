//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use wmac_config::ConfigError;
use wmac_core::{CoreError, RemoteFailure};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Remote ───────────────────────────────────────────────────────
    #[error("{failure}")]
    #[diagnostic(
        code(wmac::remote),
        help(
            "Check the terminal address, port and credentials.\n\
             Try: wmac connection test"
        )
    )]
    Remote { failure: RemoteFailure },

    #[error("{message}")]
    #[diagnostic(
        code(wmac::connection_failed),
        help("Check the terminal address (--host), port and password.")
    )]
    ConnectionFailed {
        message: String,
        failure: RemoteFailure,
    },

    #[error("The terminal did not confirm: {message}")]
    #[diagnostic(
        code(wmac::rejected),
        help("Check the MAC address and the filter index (--index) and try again.")
    )]
    Rejected { message: String },

    #[error("Could not start the remote session")]
    #[diagnostic(
        code(wmac::launch),
        help(
            "wmac drives ssh through `expect`. Install it (apt install expect,\n\
             brew install expect) or point defaults.interpreter at it.\n\
             Details: {message}"
        )
    )]
    Launch { message: String },

    // ── Credentials ──────────────────────────────────────────────────
    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(wmac::no_credentials),
        help(
            "Store one with: wmac config set-password --profile {profile}\n\
             Or set the WMAC_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    #[error("Connection settings are incomplete")]
    #[diagnostic(
        code(wmac::incomplete_profile),
        help("Host, user and password are required. Run: wmac config init")
    )]
    IncompleteProfile,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(wmac::not_found),
        help("Run: wmac {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("No default gateway found in the routing table")]
    #[diagnostic(
        code(wmac::no_gateway),
        help("Pass --host or set one with: wmac config set host <ADDR>")
    )]
    NoGateway,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wmac::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(wmac::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: wmac config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(wmac::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(wmac::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(wmac::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Remote { failure } | Self::ConnectionFailed { failure, .. } => match failure {
                RemoteFailure::AuthenticationFailed => exit_code::AUTH,
                RemoteFailure::ConnectionRefused | RemoteFailure::HostUnreachable => {
                    exit_code::CONNECTION
                }
                RemoteFailure::CommandTimeout | RemoteFailure::ConnectionTimeout => {
                    exit_code::TIMEOUT
                }
                RemoteFailure::Unknown(_) => exit_code::GENERAL,
            },
            Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } | Self::NoGateway => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::IncompleteProfile
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidMac(e) => CliError::Validation {
                field: "MAC address".into(),
                reason: e.to_string(),
            },
            CoreError::IncompleteProfile => CliError::IncompleteProfile,
            CoreError::Remote(failure) => CliError::Remote { failure },
            e @ (CoreError::AddFailed { .. } | CoreError::DeleteFailed { .. }) => {
                CliError::Rejected {
                    message: e.to_string(),
                }
            }
            CoreError::DeviceNotFound { identifier } => CliError::NotFound {
                resource_type: "device".into(),
                identifier,
                list_command: "devices list".into(),
            },
            CoreError::Launch { message } => CliError::Launch { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(see: wmac config profiles)".into(),
            },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
