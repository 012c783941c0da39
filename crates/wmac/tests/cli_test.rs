//! Integration tests for the `wmac` CLI binary.
//!
//! A shell script stands in for the expect automation: it receives the
//! same positional arguments and prints a terminal-like transcript, so
//! every command runs end to end without a real access terminal.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `wmac` binary with env isolation.
///
/// Clears all `WMAC_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn wmac_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("wmac");
    cmd.env("HOME", "/tmp/wmac-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/wmac-cli-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/wmac-cli-test-nonexistent")
        .env_remove("RUST_LOG")
        .env_remove("WMAC_PROFILE")
        .env_remove("WMAC_HOST")
        .env_remove("WMAC_USER")
        .env_remove("WMAC_PORT")
        .env_remove("WMAC_FILTER_INDEX")
        .env_remove("WMAC_TIMEOUT")
        .env_remove("WMAC_CONFIG")
        .env_remove("WMAC_DEVICES_FILE")
        .env_remove("WMAC_OUTPUT")
        .env_remove("WMAC_PASSWORD");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

const FAKE_TERMINAL: &str = r#"
host="$1"; user="$2"; port="$3"; cmd="$5"
say() { printf '%s\r\n' "$*"; }
say "spawn ssh -o LogLevel=ERROR -p $port $user@$host"
say "$user@$host's password:"
if [ "$WMAC_SSH_PASSWORD" != "secret" ]; then
    say "Permission denied, please try again."
    exit 2
fi
say "WAP>$cmd"
case "$cmd" in
    "display wifi filter")
        say "SSID Index   MAC Address"
        say "----------   -----------------"
        say "1            2a:77:3c:e8:bc:2e"
        say "1            60:a4:b7:11:22:33"
        say "success!"
        ;;
    "add wifi filter"*|"del wifi filter"*)
        echo "$cmd" > "$(dirname "$0")/last_command"
        say "success!"
        ;;
    "")
        ;;
    *)
        say "uptime 42 days"
        ;;
esac
say "WAP>"
say "WAP>exit"
say "Connection to $host closed."
"#;

/// A config directory wired to the fake terminal script.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("terminal.sh");
        std::fs::write(&script, FAKE_TERMINAL).unwrap();
        let config = format!(
            "default_profile = \"home\"\n\n\
             [defaults]\n\
             interpreter = \"/bin/sh\"\n\
             script = \"{}\"\n\
             devices_file = \"{}\"\n\n\
             [profiles.home]\n\
             host = \"127.0.0.1\"\n\
             filter_index = \"SSID-2\"\n",
            script.display(),
            dir.path().join("devices.json").display(),
        );
        std::fs::write(dir.path().join("config.toml"), config).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn config(&self) -> PathBuf {
        self.path().join("config.toml")
    }

    fn devices(&self) -> PathBuf {
        self.path().join("devices.json")
    }

    fn last_command(&self) -> String {
        std::fs::read_to_string(self.path().join("last_command"))
            .unwrap()
            .trim()
            .to_owned()
    }

    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = wmac_cmd();
        cmd.arg("--config")
            .arg(self.config())
            .env("WMAC_PASSWORD", "secret");
        cmd
    }

    fn registry(&self) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(self.devices()).unwrap()).unwrap()
    }
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = wmac_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    wmac_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("MAC filter")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("connection")),
    );
}

#[test]
fn test_version_flag() {
    wmac_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wmac"));
}

#[test]
fn test_completions_bash() {
    wmac_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_unknown_device_type_is_usage_error() {
    wmac_cmd()
        .args(["devices", "add", "2a:77:3c:e8:bc:2e", "--type", "toaster"])
        .assert()
        .code(2);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_reports_both_files() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("config.toml").and(predicate::str::contains("devices.json")),
        );
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_defaults_to_xdg_location() {
    let home = tempfile::tempdir().unwrap();
    wmac_cmd()
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "set", "host", "10.2.2.2"])
        .assert()
        .success();

    let written = std::fs::read_to_string(home.path().join("wmac/config.toml")).unwrap();
    assert!(written.contains("10.2.2.2"));

    wmac_cmd()
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            home.path().join("wmac/config.toml").display().to_string(),
        ));
}

#[test]
fn test_config_set_and_use() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["--profile", "office", "config", "set", "host", "10.1.1.1"])
        .assert()
        .success();
    fx.cmd().args(["config", "use", "office"]).assert().success();

    let output = fx.cmd().args(["-o", "plain", "config", "profiles"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "home\noffice\n");

    let saved = std::fs::read_to_string(fx.config()).unwrap();
    assert!(saved.contains("default_profile = \"office\""), "{saved}");
    assert!(saved.contains("10.1.1.1"), "{saved}");
}

#[test]
fn test_config_set_rejects_bad_values() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["config", "set", "filter_index", "SSID-9"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("filter_index"));
    fx.cmd()
        .args(["config", "set", "host", "terminal.local"])
        .assert()
        .code(2);
    fx.cmd()
        .args(["config", "set", "colour", "red"])
        .assert()
        .code(2);
}

#[test]
fn test_config_use_unknown_profile() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["config", "use", "nowhere"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("home"));
}

#[test]
fn test_config_show_masks_password() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["config", "set", "password_env", "HOME_PW"])
        .assert()
        .success();
    let mut raw = std::fs::read_to_string(fx.config()).unwrap();
    raw = raw.replace("[profiles.home]\n", "[profiles.home]\npassword = \"hunter2\"\n");
    std::fs::write(fx.config(), raw).unwrap();

    fx.cmd()
        .args(["-o", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2").not())
        .stdout(predicate::str::contains("HOME_PW"));
}

// ── Devices ─────────────────────────────────────────────────────────

#[test]
fn test_cached_list_reads_registry_without_terminal() {
    let fx = Fixture::new();
    std::fs::write(
        fx.devices(),
        r#"[{"id":"7f8c0a4e-1f52-4a55-9a0e-6a4e7e0f3b11","macAddress":"2a:77:3c:e8:bc:2e",
            "userLabel":"Laptop","isEnabled":false,"deviceType":"Notebook","enabledAt":null}]"#,
    )
    .unwrap();

    let output = fx
        .cmd()
        .env_remove("WMAC_PASSWORD")
        .args(["-o", "json", "devices", "list", "--cached"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed[0]["userLabel"], "Laptop");
    assert_eq!(listed[0]["isEnabled"], false);
    assert!(!fx.path().join("last_command").exists());
}

#[test]
fn test_list_reconciles_with_terminal() {
    let fx = Fixture::new();
    let output = fx
        .cmd()
        .args(["-o", "plain", "devices", "list"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "2a:77:3c:e8:bc:2e\n60:a4:b7:11:22:33\n"
    );

    let registry = fx.registry();
    assert_eq!(registry.as_array().unwrap().len(), 2);
    assert_eq!(registry[0]["isEnabled"], true);
    assert!(registry[0]["enabledAt"].is_string());
}

#[test]
fn test_repeated_list_ignores_session_close() {
    let fx = Fixture::new();
    for _ in 0..2 {
        fx.cmd().args(["devices", "list"]).assert().success();
    }
    let macs: Vec<String> = fx
        .registry()
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["macAddress"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(macs, ["2a:77:3c:e8:bc:2e", "60:a4:b7:11:22:33"]);
}

#[test]
fn test_add_sends_index_and_keeps_annotations() {
    let fx = Fixture::new();
    fx.cmd()
        .args([
            "-o",
            "json",
            "devices",
            "add",
            "2A-77-3C-E8-BC-2E",
            "--label",
            "Work laptop",
            "--type",
            "notebook",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work laptop"));

    assert_eq!(fx.last_command(), "add wifi filter index 2 mac 2a:77:3c:e8:bc:2e");

    let registry = fx.registry();
    let laptop = registry
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["macAddress"] == "2a:77:3c:e8:bc:2e")
        .unwrap();
    assert_eq!(laptop["userLabel"], "Work laptop");
    assert_eq!(laptop["deviceType"], "Notebook");
}

#[test]
fn test_index_flag_overrides_profile() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["--index", "SSID-5", "devices", "disable", "60:a4:b7:11:22:33"])
        .assert()
        .success();
    assert_eq!(fx.last_command(), "del wifi filter index 5 mac 60:a4:b7:11:22:33");
}

#[test]
fn test_bad_index_flag_is_usage_error() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["--index", "SSID-0", "devices", "list"])
        .assert()
        .code(2);
}

#[test]
fn test_invalid_mac_never_reaches_terminal() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["devices", "enable", "not-a-mac"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not-a-mac"));
    assert!(!fx.path().join("last_command").exists());
}

#[test]
fn test_edit_is_local_only() {
    let fx = Fixture::new();
    fx.cmd().args(["devices", "list"]).assert().success();

    fx.cmd()
        .env_remove("WMAC_PASSWORD")
        .args(["devices", "edit", "60:a4:b7:11:22:33", "--label", "Phone", "--type", "phone"])
        .assert()
        .success();
    let registry = fx.registry();
    assert_eq!(registry[1]["userLabel"], "Phone");
    assert_eq!(registry[1]["deviceType"], "Phone");
}

#[test]
fn test_edit_unknown_device_is_not_found() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["devices", "edit", "aa:bb:cc:dd:ee:ff", "--label", "x"])
        .assert()
        .code(4);
}

#[test]
fn test_remove_requires_yes_when_not_interactive() {
    let fx = Fixture::new();
    fx.cmd().args(["devices", "list"]).assert().success();
    fx.cmd()
        .args(["devices", "remove", "60:a4:b7:11:22:33"])
        .write_stdin("")
        .assert()
        .code(2);

    fx.cmd()
        .args(["--yes", "devices", "remove", "60:a4:b7:11:22:33"])
        .assert()
        .success();
    assert_eq!(fx.last_command(), "del wifi filter index 2 mac 60:a4:b7:11:22:33");
    assert_eq!(fx.registry().as_array().unwrap().len(), 1);
}

// ── Run / connection ────────────────────────────────────────────────

#[test]
fn test_run_prints_cleaned_output() {
    let fx = Fixture::new();
    let output = fx.cmd().args(["run", "display", "uptime"]).output().unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "uptime 42 days\n");
}

#[test]
fn test_run_raw_keeps_transcript() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["run", "--raw", "display", "uptime"])
        .assert()
        .success()
        .stdout(predicate::str::contains("spawn ssh").and(predicate::str::contains("WAP>")));
}

#[test]
fn test_wrong_password_maps_to_auth_exit_code() {
    let fx = Fixture::new();
    fx.cmd()
        .env("WMAC_PASSWORD", "wrong")
        .args(["devices", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Authentication failed"));
}

#[test]
fn test_connection_test_succeeds() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["connection", "test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("root@127.0.0.1:22: Connection successful"));
}

#[test]
fn test_connection_test_rejects_hostname() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["--host", "wap.local", "connection", "test"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid IP address format"));
}

#[test]
fn test_missing_interpreter_is_reported() {
    let fx = Fixture::new();
    let raw = std::fs::read_to_string(fx.config())
        .unwrap()
        .replace("/bin/sh", "/nonexistent/expect");
    std::fs::write(fx.config(), raw).unwrap();
    fx.cmd()
        .args(["devices", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expect"));
}
