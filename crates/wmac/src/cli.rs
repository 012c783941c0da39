//! Clap derive structures for the `wmac` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Kept free of workspace crates so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wmac -- manage the WiFi MAC filter of an SSH-managed access terminal
#[derive(Debug, Parser)]
#[command(
    name = "wmac",
    version,
    about = "Manage a WiFi terminal's MAC filter from the command line",
    long_about = "Admit, revoke and annotate devices in the MAC filter whitelist of a\n\
        WiFi access terminal that is managed over an interactive SSH shell.\n\n\
        Remote commands are driven through an `expect` script; device labels\n\
        and types are kept in a local registry.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Terminal profile to use
    #[arg(long, short = 'p', env = "WMAC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Terminal IP address (overrides profile and gateway detection)
    #[arg(long, short = 'H', env = "WMAC_HOST", global = true)]
    pub host: Option<String>,

    /// SSH user (overrides profile)
    #[arg(long, short = 'u', env = "WMAC_USER", global = true)]
    pub user: Option<String>,

    /// SSH port (overrides profile)
    #[arg(long, env = "WMAC_PORT", global = true)]
    pub port: Option<u16>,

    /// Filter table to manage, SSID-1 .. SSID-8 (overrides profile)
    #[arg(long, short = 'i', env = "WMAC_FILTER_INDEX", global = true)]
    pub index: Option<String>,

    /// Seconds to wait at each remote prompt (overrides config)
    #[arg(long, env = "WMAC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Config file to use instead of the platform default
    #[arg(long, env = "WMAC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Device registry file (overrides config)
    #[arg(long, env = "WMAC_DEVICES_FILE", global = true)]
    pub devices_file: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "WMAC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Device category as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceKind {
    Notebook,
    Desktop,
    Phone,
    Tablet,
    Tv,
    Other,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage devices in the MAC filter
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Run a raw command on the terminal and print its output
    Run(RunArgs),

    /// Check connectivity and credentials
    #[command(alias = "conn")]
    Connection(ConnectionArgs),

    /// Print the detected default gateway
    Gateway,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// Fetch the filter table and list devices
    #[command(alias = "ls")]
    List {
        /// Show the local registry without contacting the terminal
        #[arg(long)]
        cached: bool,
    },

    /// Admit a new device and record its label and type
    Add {
        /// MAC address (xx:xx:xx:xx:xx:xx)
        #[arg(value_name = "MAC")]
        mac: String,

        /// Human-readable label
        #[arg(long, short = 'l', default_value = "")]
        label: String,

        /// Device category
        #[arg(long = "type", short = 't', value_enum, default_value = "other")]
        kind: DeviceKind,
    },

    /// Admit a device into the filter
    #[command(alias = "allow")]
    Enable {
        /// Device ID (UUID) or MAC address
        device: String,
    },

    /// Revoke a device from the filter
    #[command(alias = "block")]
    Disable {
        /// Device ID (UUID) or MAC address
        device: String,
    },

    /// Change a device's label or type (local only)
    Edit {
        /// Device ID (UUID) or MAC address
        device: String,

        /// New label
        #[arg(long, short = 'l')]
        label: Option<String>,

        /// New category
        #[arg(long = "type", short = 't', value_enum)]
        kind: Option<DeviceKind>,
    },

    /// Forget a device, revoking it first if enabled
    #[command(alias = "rm")]
    Remove {
        /// Device ID (UUID) or MAC address
        device: String,
    },
}

// ── Run ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Command line to send (words are joined with spaces)
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Print the raw transcript instead of the cleaned output
    #[arg(long)]
    pub raw: bool,
}

// ── Connection ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConnectionArgs {
    #[command(subcommand)]
    pub command: ConnectionCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConnectionCommand {
    /// Log in and out without running anything
    Test,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Print the config and device registry paths
    Path,

    /// Set a profile value
    Set {
        /// Key: host, username, port, filter_index, password_env, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the SSH password in the system keyring
    SetPassword {
        /// Profile to store the password for (defaults to active)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
