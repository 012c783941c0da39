// ── Session outcome classification ──
//
// The automation script reports how the exchange ended through its exit
// status. This module is the single place that turns those integers into
// a closed set of kinds, plus the user-facing wording for each of the two
// call paths (command execution and connectivity test).

use std::fmt;

/// Why a remote exchange did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteFailure {
    /// The terminal rejected the password (exit 2).
    AuthenticationFailed,
    /// Logged in, but the prompt or command output never arrived (exit 3).
    CommandTimeout,
    /// The SSH port actively refused the connection (exit 4).
    ConnectionRefused,
    /// No route to the host (exit 5).
    HostUnreachable,
    /// Nothing answered before the password prompt timed out (exit 6).
    ConnectionTimeout,
    /// Any other exit status. `-1` stands for termination by signal.
    Unknown(i32),
}

impl RemoteFailure {
    /// Classify a non-zero exit status. Returns `None` for `0`.
    pub fn from_exit_code(code: i32) -> Option<Self> {
        match code {
            0 => None,
            2 => Some(Self::AuthenticationFailed),
            3 => Some(Self::CommandTimeout),
            4 => Some(Self::ConnectionRefused),
            5 => Some(Self::HostUnreachable),
            6 => Some(Self::ConnectionTimeout),
            other => Some(Self::Unknown(other)),
        }
    }

    /// Message shown when a device command fails.
    pub fn command_reason(&self) -> String {
        match self {
            Self::AuthenticationFailed => "Authentication failed".into(),
            Self::CommandTimeout => "Command timeout".into(),
            Self::ConnectionRefused => "Connection refused".into(),
            Self::HostUnreachable => "Host unreachable".into(),
            Self::ConnectionTimeout => "Connection timeout".into(),
            Self::Unknown(code) => format!("Command failed with exit code {code}"),
        }
    }

    /// Message shown when a connectivity test fails.
    pub fn connectivity_reason(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "Check user and password",
            Self::CommandTimeout => "Terminal did not respond",
            Self::ConnectionRefused => "Connection was refused",
            Self::HostUnreachable => "Network is not reachable",
            Self::ConnectionTimeout => "Connection timed out",
            Self::Unknown(_) => "Connection could not establish",
        }
    }
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_reason())
    }
}

/// Result of one command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Exit 0, carrying the raw (uncleaned) transcript.
    Success(String),
    Failed(RemoteFailure),
}

impl SessionOutcome {
    /// Build an outcome from an exit status and captured stdout.
    pub fn from_exit(code: i32, stdout: String) -> Self {
        match RemoteFailure::from_exit_code(code) {
            None => Self::Success(stdout),
            Some(failure) => Self::Failed(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Convert into a `Result`, moving the transcript out on success.
    pub fn into_result(self) -> Result<String, RemoteFailure> {
        match self {
            Self::Success(raw) => Ok(raw),
            Self::Failed(failure) => Err(failure),
        }
    }
}

/// Result of a credential / reachability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityResult {
    Connected,
    /// The host was not a dotted-quad IPv4 address; nothing was spawned.
    InvalidAddress,
    Failed(RemoteFailure),
}

impl ConnectivityResult {
    pub fn from_exit_code(code: i32) -> Self {
        RemoteFailure::from_exit_code(code).map_or(Self::Connected, Self::Failed)
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Connected => "Connection successful",
            Self::InvalidAddress => "Invalid IP address format",
            Self::Failed(failure) => failure.connectivity_reason(),
        }
    }
}
