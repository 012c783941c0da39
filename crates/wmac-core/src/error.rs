// ── Core error types ──
//
// User-facing errors from wmac-core. Process and script plumbing from
// wmac-session is folded in through `From<wmac_session::Error>`, so
// consumers match on one enum.

use thiserror::Error;
use wmac_session::RemoteFailure;

use crate::model::MacParseError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    #[error(transparent)]
    InvalidMac(#[from] MacParseError),

    #[error("Connection profile is incomplete: host, user and password are required")]
    IncompleteProfile,

    // ── Remote errors ────────────────────────────────────────────────
    /// The terminal exchange ended with a non-zero status.
    #[error("{0}")]
    Remote(RemoteFailure),

    /// The admit command ran but the terminal did not confirm it.
    #[error("Failed to add MAC address {mac}")]
    AddFailed { mac: String },

    /// The revoke command ran but the terminal did not confirm it.
    #[error("Failed to delete MAC address {mac}")]
    DeleteFailed { mac: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("Could not launch the remote session: {message}")]
    Launch { message: String },
}

impl CoreError {
    /// The remote failure kind, when this error came from the terminal.
    pub fn remote_failure(&self) -> Option<RemoteFailure> {
        match self {
            Self::Remote(failure) => Some(*failure),
            _ => None,
        }
    }
}

impl From<RemoteFailure> for CoreError {
    fn from(failure: RemoteFailure) -> Self {
        Self::Remote(failure)
    }
}

// ── Conversion from session-layer errors ─────────────────────────────

impl From<wmac_session::Error> for CoreError {
    fn from(err: wmac_session::Error) -> Self {
        match err {
            wmac_session::Error::MissingField { .. } => Self::IncompleteProfile,
            other @ (wmac_session::Error::Spawn { .. }
            | wmac_session::Error::ScriptUnavailable { .. }) => Self::Launch {
                message: other.to_string(),
            },
        }
    }
}
