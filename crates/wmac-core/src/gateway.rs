// ── Default gateway detection ──
//
// Reads the host routing table (`netstat -nr`) to suggest a terminal
// address when none is configured. Any failure yields `None`.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;
use wmac_session::is_valid_ipv4;

/// Ask the OS for its default IPv4 gateway.
pub async fn detect_gateway() -> Option<String> {
    let output = Command::new("netstat")
        .arg("-nr")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|e| debug!(error = %e, "netstat unavailable"))
        .ok()?;
    let table = String::from_utf8(output.stdout).ok()?;
    parse_default_gateway(&table)
}

/// First default-route row whose second column is an IPv4 address.
pub fn parse_default_gateway(routing_table: &str) -> Option<String> {
    routing_table
        .lines()
        .filter(|row| row.contains("default") || row.starts_with("0.0.0.0"))
        .filter_map(|row| row.split_whitespace().nth(1))
        .find(|candidate| is_valid_ipv4(candidate))
        .map(str::to_owned)
}
