// Remote session driver.
//
// Each call spawns one automation process (an `expect` interpreter running
// the bundled script by default), hands it host/user/port/timeout/command on
// the argument vector and the password through the child environment, then
// waits for it on the tokio runtime and classifies the exit status.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

use crate::error::Error;
use crate::ipv4::is_valid_ipv4;
use crate::outcome::{ConnectivityResult, SessionOutcome};

/// Environment variable the automation script reads the password from.
pub const PASSWORD_ENV: &str = "WMAC_SSH_PASSWORD";

/// Bound on the whole interactive exchange, enforced by the script.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_PORT: u16 = 22;

const BUNDLED_SCRIPT: &str = include_str!("../scripts/ssh_command.exp");

/// Where the automation script comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScriptSource {
    /// The script shipped inside this crate, written to a temp file per call.
    #[default]
    Bundled,
    /// A script on disk.
    File(PathBuf),
}

/// How to launch the automation process.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Interpreter binary (`expect` looked up in `PATH` by default).
    pub interpreter: PathBuf,
    pub script: ScriptSource,
    /// Passed to the script, which applies it to every prompt wait.
    pub timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from("expect"),
            script: ScriptSource::Bundled,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Login details for one terminal.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub host: String,
    pub user: String,
    pub password: SecretString,
    pub port: u16,
}

impl Credentials {
    pub fn new(host: impl Into<String>, user: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password,
            port: DEFAULT_PORT,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    fn validate(&self) -> Result<(), Error> {
        if self.host.is_empty() {
            return Err(Error::MissingField {
                field: "IP address",
            });
        }
        if self.user.is_empty() {
            return Err(Error::MissingField { field: "SSH user" });
        }
        if self.password.expose_secret().is_empty() {
            return Err(Error::MissingField {
                field: "SSH password",
            });
        }
        Ok(())
    }
}

/// Spawns automation processes against remote terminals.
///
/// Stateless apart from its configuration: concurrent calls run as
/// independent processes with independent outcomes.
#[derive(Debug, Clone, Default)]
pub struct RemoteSession {
    config: SessionConfig,
}

impl RemoteSession {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run one command on the terminal.
    ///
    /// The host is not checked for IPv4 format here; callers that need
    /// that guarantee use [`test_connection`](Self::test_connection).
    pub async fn execute(
        &self,
        credentials: &Credentials,
        command: &str,
    ) -> Result<SessionOutcome, Error> {
        credentials.validate()?;
        let (code, stdout) = self.run(credentials, command).await?;
        debug!(host = %credentials.host, code, "remote command finished");
        Ok(SessionOutcome::from_exit(code, stdout))
    }

    /// Log in and out again without running anything.
    pub async fn test_connection(
        &self,
        credentials: &Credentials,
    ) -> Result<ConnectivityResult, Error> {
        credentials.validate()?;
        if !is_valid_ipv4(&credentials.host) {
            debug!(host = %credentials.host, "rejecting non-IPv4 host");
            return Ok(ConnectivityResult::InvalidAddress);
        }
        let (code, _) = self.run(credentials, "").await?;
        debug!(host = %credentials.host, code, "connectivity test finished");
        Ok(ConnectivityResult::from_exit_code(code))
    }

    // ── Process plumbing ────────────────────────────────────────────

    async fn run(&self, credentials: &Credentials, command: &str) -> Result<(i32, String), Error> {
        // Must outlive the child: a bundled script is deleted on drop.
        let script = self.materialize_script()?;

        let mut cmd = Command::new(&self.config.interpreter);
        cmd.arg(script.path())
            .arg(&credentials.host)
            .arg(&credentials.user)
            .arg(credentials.port.to_string())
            .arg(self.config.timeout.as_secs().to_string())
            .arg(command)
            .env(PASSWORD_ENV, credentials.password.expose_secret())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            interpreter = %self.config.interpreter.display(),
            host = %credentials.host,
            user = %credentials.user,
            port = credentials.port,
            command,
            "spawning remote session"
        );

        let output = cmd.output().await.map_err(|source| Error::Spawn {
            program: self.config.interpreter.display().to_string(),
            source,
        })?;

        let code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        Ok((code, stdout))
    }

    fn materialize_script(&self) -> Result<ScriptHandle, Error> {
        match &self.config.script {
            ScriptSource::File(path) => {
                std::fs::metadata(path).map_err(|source| Error::ScriptUnavailable {
                    path: path.display().to_string(),
                    source,
                })?;
                Ok(ScriptHandle::File(path.clone()))
            }
            ScriptSource::Bundled => {
                let unavailable = |source| Error::ScriptUnavailable {
                    path: "<bundled>".into(),
                    source,
                };
                let mut file = tempfile::Builder::new()
                    .prefix("wmac-ssh-")
                    .suffix(".exp")
                    .tempfile()
                    .map_err(unavailable)?;
                file.write_all(BUNDLED_SCRIPT.as_bytes())
                    .and_then(|()| file.flush())
                    .map_err(unavailable)?;
                Ok(ScriptHandle::Temp(file))
            }
        }
    }
}

enum ScriptHandle {
    Temp(NamedTempFile),
    File(PathBuf),
}

impl ScriptHandle {
    fn path(&self) -> &Path {
        match self {
            Self::Temp(file) => file.path(),
            Self::File(path) => path,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bundled_script_reads_password_from_env() {
        assert!(BUNDLED_SCRIPT.contains(&format!("env({PASSWORD_ENV})")));
        assert!(BUNDLED_SCRIPT.contains("spawn ssh"));
    }

    #[test]
    fn bundled_script_stops_logging_before_exit() {
        let quiet = BUNDLED_SCRIPT.rfind("log_user 0").unwrap();
        let exit = BUNDLED_SCRIPT.find("send -- \"exit\\r\"").unwrap();
        assert!(quiet < exit);
        assert!(BUNDLED_SCRIPT.contains("LogLevel=ERROR"));
    }

    #[test]
    fn missing_fields_are_reported_in_order() {
        let creds = Credentials::new("", "", SecretString::from(String::new()));
        assert!(matches!(
            creds.validate(),
            Err(Error::MissingField { field: "IP address" })
        ));

        let creds = Credentials::new("10.0.0.1", "", SecretString::from(String::new()));
        assert!(matches!(
            creds.validate(),
            Err(Error::MissingField { field: "SSH user" })
        ));

        let creds = Credentials::new("10.0.0.1", "root", SecretString::from(String::new()));
        assert!(matches!(
            creds.validate(),
            Err(Error::MissingField {
                field: "SSH password"
            })
        ));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("10.0.0.1", "root", SecretString::from("hunter2".to_owned()));
        assert!(!format!("{creds:?}").contains("hunter2"));
    }

    #[test]
    fn default_config_uses_expect_and_ten_seconds() {
        let config = SessionConfig::default();
        assert_eq!(config.interpreter, PathBuf::from("expect"));
        assert_eq!(config.script, ScriptSource::Bundled);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
