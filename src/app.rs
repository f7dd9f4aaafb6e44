//! Process plumbing for the `node-addrs` binary.
//!
//! Maps [`ConfigError`] and `RunError` onto exit statuses, points the
//! user at `node-addrs init` when no usable config was found, and wires
//! tracing to stderr so stdout stays reserved for the address list.

use node_addrs::config::{ConfigError, field};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Exit statuses reported by `node-addrs`.
pub mod exit_code {
    use std::process::ExitCode;

    /// Addresses were written to stdout.
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Arguments or config file rejected before any server record was read.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Status 2: the configuration was valid but a `RunError` stopped the run.
    ///
    /// Covers a server or interface document that cannot be read or decoded
    /// (`RunError::Source`), a record whose addresses cannot be derived
    /// (`RunError::Addresses`), and output that fails to serialize as JSON
    /// or render through the configured template.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Suggests `node-addrs init` when the server path is absent or the
/// config file could not be read.
pub fn print_config_hint(error: &ConfigError) {
    let needs_template = match error {
        ConfigError::MissingRequired { field: f, .. } => *f == field::SERVER,
        ConfigError::FileRead { .. } => true,
        _ => false,
    };
    if needs_template {
        eprintln!("\nRun 'node-addrs init' to generate a configuration template.");
    }
}

/// Installs a stderr subscriber at INFO, or DEBUG with `--verbose`.
///
/// `RUST_LOG` overrides the default level, which is how the per-address
/// classification and ordering decisions can be traced without `-v`.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
