//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// node-addrs: Node Address Resolver
///
/// Derives a node's ordered address list from a compute server record
/// and its attached interfaces.
#[derive(Debug, Parser)]
#[command(name = "node-addrs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// JSON file with the server record (required for resolve mode)
    #[arg(long, value_name = "FILE")]
    pub server: Option<PathBuf>,

    /// JSON file with the attached interface list
    #[arg(long, value_name = "FILE")]
    pub interfaces: Option<PathBuf>,

    /// Network whose addresses are external (can be specified multiple times)
    #[arg(long = "public-network", value_name = "NAME")]
    pub public_networks: Vec<String>,

    /// Preferred address order, e.g. "external-v4, internal-v4"
    #[arg(long = "address-order", value_name = "SPEC")]
    pub address_order: Option<String>,

    /// Omit all IPv6 addresses
    #[arg(long = "ipv6-disabled")]
    pub ipv6_disabled: bool,

    /// Keep fixed addresses bound only to inactive interfaces
    #[arg(long = "ignore-port-state")]
    pub ignore_port_state: bool,

    /// Metadata key holding the hostname
    #[arg(long = "hostname-key", value_name = "KEY")]
    pub hostname_key: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormatArg>,

    /// Handlebars template for the template output format
    #[arg(long)]
    pub template: Option<String>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for node-addrs
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "node-addrs.toml")]
        output: PathBuf,
    },
}

/// Output format argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// One `TYPE<TAB>ADDRESS` line per address
    Text,
    /// JSON array of `{type, address}` objects
    Json,
    /// Render the Handlebars template given by --template
    Template,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
