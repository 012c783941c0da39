// wmac-session: Non-interactive driver for password-prompting remote shells.

pub mod error;
pub mod ipv4;
pub mod outcome;
pub mod session;

pub use error::Error;
pub use ipv4::is_valid_ipv4;
pub use outcome::{ConnectivityResult, RemoteFailure, SessionOutcome};
pub use session::{
    Credentials, DEFAULT_PORT, DEFAULT_TIMEOUT, PASSWORD_ENV, RemoteSession, ScriptSource,
    SessionConfig,
};
