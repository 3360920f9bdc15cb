//! Clap derive structures for the `netsim` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! This file is also compiled by `build.rs`, so it may only depend on
//! `clap` and `clap_complete`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netsim -- IOS-style network simulator
#[derive(Debug, Parser)]
#[command(
    name = "netsim",
    version,
    about = "Simulate switches, routers and hosts with an IOS-style console",
    long_about = "Loads a lab topology, opens Cisco-IOS-style consoles on its devices\n\
        and answers reachability questions over the simulated links.",
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
    /// Lab profile from the config file
    #[arg(long, short = 'l', env = "NETSIM_LAB", global = true)]
    pub lab: Option<String>,

    /// Topology file (.json, .yaml, .yml); overrides the lab's file
    #[arg(long, short = 't', env = "NETSIM_TOPOLOGY", global = true)]
    pub topology: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "NETSIM_CONFIG", global = true, hide_env = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
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

#[derive(Debug, Clone, ValueEnum)]
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

#[derive(Debug, Clone, ValueEnum)]
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
    /// Open an IOS-style console on a device
    #[command(alias = "con")]
    Console(ConsoleArgs),

    /// Check reachability between two devices
    Ping(PingArgs),

    /// Inspect devices in the topology
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Inspect and edit links
    Links(LinksArgs),

    /// Show the derived port map of a device
    Ports(PortsArgs),

    /// Classify a proposed connection between two device kinds
    Validate(ValidateArgs),

    /// List the console command catalog
    #[command(alias = "cmds")]
    Commands(CommandsArgs),

    /// Manage CLI configuration and labs
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Console ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConsoleArgs {
    /// Device id, hostname or label
    pub device: String,

    /// Read commands from a file instead of stdin
    #[arg(long, short = 's')]
    pub script: Option<PathBuf>,

    /// Write the mutated topology back to its file on exit
    #[arg(long)]
    pub save: bool,

    /// Disable advisory hints after command errors
    #[arg(long)]
    pub no_hints: bool,
}

// ── Ping ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PingArgs {
    /// Source device (id, hostname or label)
    pub source: String,

    /// Target device (id, hostname or label)
    pub target: String,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List all devices
    #[command(alias = "ls")]
    List,

    /// Show one device in detail
    Show {
        /// Device id, hostname or label
        device: String,

        /// Print the rendered running configuration instead
        #[arg(long)]
        running_config: bool,
    },
}

// ── Links ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LinksArgs {
    #[command(subcommand)]
    pub command: LinksCommand,
}

#[derive(Debug, Subcommand)]
pub enum LinksCommand {
    /// List links with their mapped ports
    #[command(alias = "ls")]
    List,

    /// Cable two devices together
    Add {
        /// Source device (id, hostname or label)
        source: String,

        /// Target device (id, hostname or label)
        target: String,

        /// Write the topology back to its file
        #[arg(long)]
        save: bool,
    },

    /// Remove a link by id
    #[command(alias = "rm")]
    Remove {
        /// Link id
        id: String,

        /// Write the topology back to its file
        #[arg(long)]
        save: bool,
    },
}

// ── Ports ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PortsArgs {
    /// Device id, hostname or label
    pub device: String,
}

// ── Validate ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Kind of the source device (e.g. PC, Router, SwitchL2)
    pub source_kind: String,

    /// Kind of the target device
    pub target_kind: String,
}

// ── Commands catalog ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CommandsArgs {
    /// Only commands available in this mode
    #[arg(long, short = 'm')]
    pub mode: Option<ModeArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// `Router>`
    User,
    /// `Router#`
    Privileged,
    /// `Router(config)#`
    Global,
    /// `Router(config-if)#`
    Interface,
    /// `Router(config-vlan)#`
    Vlan,
    /// `Router(config-line)#`
    Line,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with one lab
    Init {
        /// Topology file the lab points at
        topology: PathBuf,

        /// Lab name
        #[arg(long, default_value = "default")]
        name: String,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
