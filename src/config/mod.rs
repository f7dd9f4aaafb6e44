//! Configuration layer for node-addrs.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! For the required `server` path, CLI takes precedence over TOML.
//!
//! For public network names, CLI `--public-network` values **replace** the TOML
//! list entirely (not merged). An explicit empty TOML list means "no public
//! networks", which is different from leaving the key out.
//!
//! # Boolean Flag Semantics
//!
//! Boolean flags (`--ipv6-disabled`, `--ignore-port-state`) use OR semantics:
//! - If set `true` in either CLI or TOML, the result is `true`.
//! - Once set `true` in TOML, CLI cannot override to `false` (flags only enable, not disable).
//!
//! # Output Format
//!
//! When no format is configured but a template is, the template format is used.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod cli_tests;

pub use cli::{Cli, Command, OutputFormatArg};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{OutputFormat, ValidatedConfig, write_default_config};
