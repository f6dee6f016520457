//! Clap derive structures for the `espanel` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// espanel -- control panel for a KC868-A8 ESPHome controller
#[derive(Debug, Parser)]
#[command(
    name = "espanel",
    version,
    about = "Control a KC868-A8 relay / RF-learning controller from the command line",
    long_about = "A CLI control panel for KC868-A8 boards running ESPHome.\n\n\
        Talks to the device's built-in web_server REST API: relay toggles,\n\
        input and sensor readout, RF-learning parameters, and the learn /\n\
        transmit / save / clear workflow for the 16 RF code slots.",
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
    /// Device address (IP or host; overrides the saved address)
    #[arg(long, short = 'd', env = "ESPANEL_DEVICE", global = true)]
    pub device: Option<String>,

    /// Output format (defaults to the config file's setting, then table)
    #[arg(long, short = 'o', env = "ESPANEL_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (defaults to the config file's setting, then 10)
    #[arg(long, env = "ESPANEL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// One-shot refresh of the whole panel
    #[command(alias = "st")]
    Status,

    /// Continuously refresh and redraw the panel
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Control the eight relays
    #[command(alias = "r")]
    Relay(RelayArgs),

    /// Show the eight digital inputs
    #[command(alias = "in")]
    Inputs,

    /// Show the analog voltage sensors
    Sensors,

    /// Show the 16 RF code slots and learner status
    Slots,

    /// Read or write RF tuning parameters (numbers)
    #[command(alias = "p")]
    Params(ParamsArgs),

    /// Read or set the RF protocol selection
    Protocol(ProtocolArgs),

    /// RF-learning workflow actions (template buttons)
    Rf(RfArgs),

    /// Manage CLI configuration (saved device address)
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Refresh period in seconds
    #[arg(long, short = 'i', default_value = "5")]
    pub interval: u64,
}

// ── Relays ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RelayArgs {
    #[command(subcommand)]
    pub command: RelayCommand,
}

#[derive(Debug, Subcommand)]
pub enum RelayCommand {
    /// List all relays with their current state
    #[command(alias = "ls")]
    List,

    /// Switch a relay on
    On {
        /// Relay number (1-8) or id (relay1..relay8)
        relay: String,
    },

    /// Switch a relay off
    Off {
        /// Relay number (1-8) or id (relay1..relay8)
        relay: String,
    },

    /// Flip a relay's current state
    Toggle {
        /// Relay number (1-8) or id (relay1..relay8)
        relay: String,
    },
}

// ── Params / Protocol ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ParamsArgs {
    #[command(subcommand)]
    pub command: ParamsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ParamsCommand {
    /// Show RF parameters (all, or one by name)
    Get {
        /// Parameter name (e.g. rf_repeat, rf_pulse_len, slot_select)
        name: Option<String>,
    },

    /// Write one RF parameter
    Set {
        /// Parameter name
        name: String,
        /// New numeric value
        value: f64,
    },
}

#[derive(Debug, Args)]
pub struct ProtocolArgs {
    #[command(subcommand)]
    pub command: ProtocolCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProtocolCommand {
    /// Show the current RF protocol option
    Get,

    /// Select an RF protocol option
    Set {
        /// Option label, exactly as the device lists it
        option: String,
    },
}

// ── RF workflow ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RfArgs {
    #[command(subcommand)]
    pub command: RfCommand,
}

#[derive(Debug, Subcommand)]
pub enum RfCommand {
    /// Put the receiver into learning mode
    StartLearning,

    /// Transmit the most recently learned code
    TxLearned,

    /// Save the learned code into the selected slot
    SaveSlot,

    /// Transmit the code stored in the selected slot
    TxSlot,

    /// Clear the selected slot
    ClearSlot,

    /// Run the learn-then-save-to-slot sequence
    LearnToSlot,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with the given device address
    Init {
        /// Device address to save
        device: String,
    },

    /// Print the effective configuration
    Show,

    /// Save the device address used when --device is not given
    SetDevice {
        /// Device address (IP or host)
        address: String,
    },

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
